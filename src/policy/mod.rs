//! Request policy resolution.
//!
//! Pure functions that merge session defaults with per-request overrides:
//! - headers: request values replace session values key by key
//! - proxy: request proxy, else session proxy, else the environment
//! - redirects: request limit, else [`DEFAULT_REDIRECT_LIMIT`]
//! - timeout: the signed request/session precedence described on [`Timeout`]
//!
//! Nothing here touches the network or the session's transport.

use std::time::Duration;

use reqwest::header::HeaderMap;
use thiserror::Error;
use url::Url;

use crate::config::{DEFAULT_REDIRECT_LIMIT, DEFAULT_TIMEOUT_SECS};
use crate::error_handling::{Error, Result};
use crate::request::{Proxy, RedirectNum, Timeout};

/// Merges request headers over session headers.
///
/// Keys only present in `session` pass through unchanged. For a key present
/// in `request`, the request's values replace the session's entirely.
pub fn merge_headers(request: Option<&HeaderMap>, session: &HeaderMap) -> HeaderMap {
    let mut merged = session.clone();
    let Some(request) = request else {
        return merged;
    };
    for name in request.keys() {
        merged.remove(name);
        for value in request.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

/// A validated proxy: one parsed URL per target scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxySelector {
    http: Url,
    https: Url,
}

fn parse_proxy_url(raw: &str, scheme: &str) -> Result<Url> {
    if raw.is_empty() {
        return Err(Error::ProxyUrl {
            reason: format!("{scheme} proxy URL is not set"),
            source: None,
        });
    }
    let url = Url::parse(raw).map_err(|e| Error::ProxyUrl {
        reason: format!("{scheme} proxy URL {raw:?} is malformed"),
        source: Some(e),
    })?;
    if url.host_str().is_none() {
        return Err(Error::ProxyUrl {
            reason: format!("{scheme} proxy URL {raw:?} has no host"),
            source: None,
        });
    }
    Ok(url)
}

impl ProxySelector {
    /// Validates both URLs of `proxy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProxyUrl`] if either URL is empty, unparsable or
    /// has no host.
    pub fn new(proxy: &Proxy) -> Result<Self> {
        Ok(Self {
            http: parse_proxy_url(&proxy.http, "HTTP")?,
            https: parse_proxy_url(&proxy.https, "HTTPS")?,
        })
    }

    /// Picks the proxy for a target URL by its scheme.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] for schemes other than `http` and `https`.
    pub fn select(&self, target: &Url) -> Result<&Url> {
        match target.scheme() {
            "http" => Ok(&self.http),
            "https" => Ok(&self.https),
            other => Err(Error::Url {
                scheme: other.to_string(),
            }),
        }
    }

    /// Proxy for `http://` targets.
    pub fn http(&self) -> &Url {
        &self.http
    }

    /// Proxy for `https://` targets.
    pub fn https(&self) -> &Url {
        &self.https
    }
}

/// Chooses the proxy for a request.
///
/// The request's proxy wins, then the session's. `Ok(None)` means no proxy is
/// forced and the environment's proxy settings apply.
///
/// # Errors
///
/// Returns [`Error::ProxyUrl`] if the chosen proxy is incomplete or malformed.
/// A malformed proxy that is not chosen is ignored.
pub fn select_proxy(
    request: Option<&Proxy>,
    session: Option<&Proxy>,
) -> Result<Option<ProxySelector>> {
    request.or(session).map(ProxySelector::new).transpose()
}

/// Raised inside the transport when a redirect chain exceeds its limit.
#[derive(Error, Debug)]
#[error("exceeded the maximum number of redirects ({limit})")]
pub struct TooManyRedirects {
    /// The limit that was exceeded.
    pub limit: usize,
}

/// How many redirects a request may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RedirectPolicy {
    limit: usize,
}

impl RedirectPolicy {
    /// Resolves the effective limit. Zero or negative means no redirects.
    pub fn resolve(request: Option<RedirectNum>) -> Self {
        let limit = match request {
            Some(RedirectNum(n)) if n <= 0 => 0,
            Some(RedirectNum(n)) => usize::try_from(n).unwrap_or(usize::MAX),
            None => DEFAULT_REDIRECT_LIMIT,
        };
        Self { limit }
    }

    /// The normalized limit; zero forbids redirects.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether a redirect may be followed after `previous` requests in the
    /// chain (the original request counts as one).
    pub fn allows(&self, previous: usize) -> bool {
        previous <= self.limit
    }

    /// Builds the transport's redirect policy.
    pub fn to_reqwest(self) -> reqwest::redirect::Policy {
        reqwest::redirect::Policy::custom(move |attempt| {
            if self.allows(attempt.previous().len()) {
                attempt.follow()
            } else {
                attempt.error(TooManyRedirects { limit: self.limit })
            }
        })
    }
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::resolve(None)
    }
}

/// Effective time limit for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// The whole exchange must finish within the duration.
    Limit(Duration),
    /// No time limit.
    Unlimited,
}

impl TimeoutPolicy {
    /// The duration to apply, or `None` for no limit.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            TimeoutPolicy::Limit(d) => Some(*d),
            TimeoutPolicy::Unlimited => None,
        }
    }
}

/// Resolves the timeout; the first matching rule wins:
///
/// 1. request > 0: that many seconds
/// 2. request < 0: unlimited
/// 3. session > 0: that many seconds
/// 4. session < 0: unlimited
/// 5. otherwise [`DEFAULT_TIMEOUT_SECS`]
///
/// A request timeout of zero, or none at all, falls through to the session.
pub fn resolve_timeout(request: Option<Timeout>, session: Timeout) -> TimeoutPolicy {
    let request = request.unwrap_or_default();
    for Timeout(secs) in [request, session] {
        if secs > 0 {
            return TimeoutPolicy::Limit(Duration::from_secs(secs.unsigned_abs()));
        }
        if secs < 0 {
            return TimeoutPolicy::Unlimited;
        }
    }
    TimeoutPolicy::Limit(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

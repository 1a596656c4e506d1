//! Long-lived HTTP sessions.

use std::sync::Arc;

use log::warn;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::TransportConfig;
use crate::error_handling::{Error, Result};
use crate::fetch::{dispatch, SessionDefaults};
use crate::initialization::ClientPool;
use crate::kvmap::Cookies;
use crate::request::{Proxy, RequestOptions, RequestSetting, Timeout};
use crate::response::Response;

/// A client holding default request policy, a cookie jar and pooled
/// connections.
///
/// Defaults apply to every request unless the request overrides them:
/// - `headers`: merged under the request's headers (the request wins per key)
/// - `proxy`: used when the request has no proxy; with neither, the
///   environment's proxy settings apply
/// - `timeout`: see [`Timeout`] for the sign rules
///
/// Cookies set by responses are stored in the session jar and sent on later
/// requests to matching URLs.
///
/// Requests take `&self`, so a session can be shared between tasks (for
/// example behind an `Arc`). Changing the defaults needs `&mut self`.
///
/// # Example
///
/// ```no_run
/// use reqsession::{headers, RequestOptions, Session};
///
/// # async fn example() -> reqsession::Result<()> {
/// let mut session = Session::new();
/// session.headers = headers(["User-Agent", "direwolf"])?;
/// session.timeout = reqsession::Timeout(10);
///
/// let resp = session.get("http://httpbin.org/ip", RequestOptions::new()).await?;
/// println!("{}", resp.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    /// Default headers
    pub headers: HeaderMap,
    /// Default proxy
    pub proxy: Option<Proxy>,
    /// Default timeout
    pub timeout: Timeout,
    jar: Arc<Jar>,
    pool: ClientPool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with the default transport configuration.
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Creates a session with a custom transport configuration.
    pub fn with_config(config: TransportConfig) -> Self {
        let jar = Arc::new(Jar::default());
        Self {
            headers: HeaderMap::new(),
            proxy: None,
            timeout: Timeout::default(),
            pool: ClientPool::new(config, Arc::clone(&jar)),
            jar,
        }
    }

    fn defaults(&self) -> SessionDefaults<'_> {
        SessionDefaults {
            headers: &self.headers,
            proxy: self.proxy.as_ref(),
            timeout: self.timeout,
        }
    }

    /// Sends a fully described request.
    ///
    /// # Errors
    ///
    /// Any error from the taxonomy in [`Error`]; request construction errors
    /// are returned before any network I/O.
    pub async fn send(&self, setting: RequestSetting) -> Result<Response> {
        dispatch(&self.pool, &self.jar, self.defaults(), setting).await
    }

    /// Sends a request, giving up with [`Error::Cancelled`] when `cancel`
    /// fires first.
    pub async fn send_with_cancel(
        &self,
        setting: RequestSetting,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let url = setting.url.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Request to {url} cancelled");
                Err(Error::Cancelled)
            }
            result = self.send(setting) => result,
        }
    }

    /// Sends a request with any method.
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        self.send(RequestSetting::with_options(method, url, options))
            .await
    }

    /// Sends a GET request.
    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("GET", url, options).await
    }

    /// Sends a POST request.
    pub async fn post(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("POST", url, options).await
    }

    /// Sends a HEAD request.
    pub async fn head(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("HEAD", url, options).await
    }

    /// Sends a PUT request.
    pub async fn put(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("PUT", url, options).await
    }

    /// Sends a PATCH request.
    pub async fn patch(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("PATCH", url, options).await
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, url: &str, options: RequestOptions) -> Result<Response> {
        self.request("DELETE", url, options).await
    }

    /// Cookies the session jar would send to `url`.
    ///
    /// Only names and values are known at this point; attributes are empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NewRequest`] if `url` cannot be parsed.
    pub fn cookies(&self, url: &str) -> Result<Cookies> {
        let url = parse_jar_url(url)?;
        Ok(self
            .jar
            .cookies(&url)
            .and_then(|v| v.to_str().ok().map(Cookies::from_header_value))
            .unwrap_or_default())
    }

    /// Stores `cookies` in the session jar as if `url` had set them.
    ///
    /// Nothing is stored unless every cookie is valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NewRequest`] if `url` cannot be parsed and
    /// [`Error::InvalidHeader`] if a cookie fails
    /// [`Cookie::validate`](crate::Cookie::validate).
    pub fn set_cookies(&self, url: &str, cookies: &Cookies) -> Result<()> {
        let url = parse_jar_url(url)?;
        for cookie in cookies {
            cookie.validate()?;
        }
        for cookie in cookies {
            self.jar.add_cookie_str(&cookie.to_set_cookie(), &url);
        }
        Ok(())
    }

    /// Number of transport clients currently cached, one per recently used
    /// proxy/redirect policy and at most `TransportConfig::max_clients`.
    pub fn transport_count(&self) -> usize {
        self.pool.len()
    }
}

fn parse_jar_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::NewRequest {
        method: String::new(),
        url: raw.to_string(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;
    use crate::kvmap::Cookie;

    #[test]
    fn test_session_defaults() {
        let session = Session::new();
        assert!(session.headers.is_empty());
        assert!(session.proxy.is_none());
        assert_eq!(session.timeout, Timeout(0));
        assert_eq!(session.transport_count(), 0);
    }

    #[test]
    fn test_set_cookies_then_read_back() {
        let session = Session::new();
        let mut cookies = Cookies::from_pairs(["a", "1"]).unwrap();
        let mut scoped = Cookie::new("b", "2");
        scoped.path = Some("/".to_string());
        cookies.push(scoped);

        session.set_cookies("http://example.com/", &cookies).unwrap();
        let stored = session.cookies("http://example.com/").unwrap();
        assert_eq!(stored.get("a").unwrap().value, "1");
        assert_eq!(stored.get("b").unwrap().value, "2");

        assert!(session.cookies("http://other.example/").unwrap().is_empty());
    }

    #[test]
    fn test_set_cookies_is_all_or_nothing() {
        let session = Session::new();
        let cookies = Cookies::from_pairs(["ok", "1", "bad", "x; Domain=evil.example"]).unwrap();
        let err = session
            .set_cookies("http://example.com/", &cookies)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHeader);
        assert!(session.cookies("http://example.com/").unwrap().is_empty());
    }

    #[test]
    fn test_cookies_rejects_bad_url() {
        let session = Session::new();
        assert_eq!(
            session.cookies("::nope").unwrap_err().kind(),
            ErrorKind::NewRequestError
        );
    }

    #[tokio::test]
    async fn test_body_and_form_fail_before_building_a_client() {
        let session = Session::new();
        let options = RequestOptions::new()
            .body("direwolf")
            .post_form(crate::kvmap::PostForm::from_pairs(["key", "value"]).unwrap());
        let err = session
            .post("http://127.0.0.1:9/", options)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestBodyError);
        assert_eq!(session.transport_count(), 0);
    }

    #[tokio::test]
    async fn test_send_with_cancelled_token() {
        let session = Session::new();
        let token = CancellationToken::new();
        token.cancel();
        let err = session
            .send_with_cancel(RequestSetting::new("GET", "http://127.0.0.1:9/"), &token)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }
}

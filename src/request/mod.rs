//! Request description types.
//!
//! A [`RequestSetting`] fully describes one logical request. It is built from a
//! method, a URL and a [`RequestOptions`] value holding every optional piece:
//! headers, params, body or post form, cookies, and the proxy, redirect and
//! timeout overrides.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::kvmap::{Cookies, Params, PostForm};

/// Raw request body, sent as-is with no content type inferred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body(Vec<u8>);

impl Body {
    /// Returns the body bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the body, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// Proxy server addresses, one per target scheme.
///
/// Both URLs must be set, e.g. `http://127.0.0.1:1080`. They may point at the
/// same server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proxy {
    /// Proxy used for `http://` targets
    pub http: String,
    /// Proxy used for `https://` targets
    pub https: String,
}

impl Proxy {
    /// Creates a proxy definition from its two URLs.
    pub fn new(http: impl Into<String>, https: impl Into<String>) -> Self {
        Self {
            http: http.into(),
            https: https.into(),
        }
    }
}

/// Maximum number of redirects a request may follow.
///
/// A positive value is the limit. Zero or a negative value forbids redirects
/// altogether. A request without one follows up to
/// [`DEFAULT_REDIRECT_LIMIT`](crate::config::DEFAULT_REDIRECT_LIMIT) redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RedirectNum(pub i64);

impl From<i64> for RedirectNum {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

/// Request timeout in whole seconds. The sign carries meaning:
///
/// - positive: the request must complete (connect through full body read)
///   within that many seconds
/// - negative: no time limit
/// - zero: not set; the next level decides (request falls back to session,
///   session falls back to
///   [`DEFAULT_TIMEOUT_SECS`](crate::config::DEFAULT_TIMEOUT_SECS))
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timeout(pub i64);

impl From<i64> for Timeout {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

/// Optional parts of a request.
///
/// ```
/// use reqsession::{Cookies, RequestOptions};
///
/// let options = RequestOptions::new()
///     .headers(reqsession::headers(["User-Agent", "direwolf"]).unwrap())
///     .cookies(Cookies::from_pairs(["name", "direwolf"]).unwrap())
///     .timeout(5);
/// assert!(options.body.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers merged over the session headers
    pub headers: Option<HeaderMap>,
    /// Query params appended to the URL
    pub params: Option<Params>,
    /// Raw body; exclusive with `post_form`
    pub body: Option<Body>,
    /// URL-encoded form body; exclusive with `body`
    pub post_form: Option<PostForm>,
    /// Cookies sent in addition to the jar's
    pub cookies: Option<Cookies>,
    /// Proxy override for this request
    pub proxy: Option<Proxy>,
    /// Redirect limit override
    pub redirect_num: Option<RedirectNum>,
    /// Timeout override
    pub timeout: Option<Timeout>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the query params.
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a form body, sent as `application/x-www-form-urlencoded`.
    pub fn post_form(mut self, form: PostForm) -> Self {
        self.post_form = Some(form);
        self
    }

    /// Sets the request cookies.
    pub fn cookies(mut self, cookies: Cookies) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// Sets the proxy for this request.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Sets the redirect limit. See [`RedirectNum`].
    pub fn redirect_num(mut self, n: i64) -> Self {
        self.redirect_num = Some(RedirectNum(n));
        self
    }

    /// Sets the timeout in seconds. See [`Timeout`].
    pub fn timeout(mut self, secs: i64) -> Self {
        self.timeout = Some(Timeout(secs));
        self
    }
}

/// Description of one request, consumed by a single send.
///
/// The method is stored uppercased. Method and URL are validated when the
/// request is dispatched, not here.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct RequestSetting {
    pub method: String,
    pub url: String,
    pub headers: Option<HeaderMap>,
    pub params: Option<Params>,
    pub body: Option<Body>,
    pub post_form: Option<PostForm>,
    pub cookies: Option<Cookies>,
    pub proxy: Option<Proxy>,
    pub redirect_num: Option<RedirectNum>,
    pub timeout: Option<Timeout>,
}

impl RequestSetting {
    /// Creates a setting with no optional parts.
    pub fn new(method: &str, url: impl Into<String>) -> Self {
        Self::with_options(method, url, RequestOptions::default())
    }

    /// Creates a setting from a method, URL and options.
    pub fn with_options(method: &str, url: impl Into<String>, options: RequestOptions) -> Self {
        let RequestOptions {
            headers,
            params,
            body,
            post_form,
            cookies,
            proxy,
            redirect_num,
            timeout,
        } = options;
        Self {
            method: method.to_uppercase(),
            url: url.into(),
            headers,
            params,
            body,
            post_form,
            cookies,
            proxy,
            redirect_num,
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_is_uppercased() {
        let setting = RequestSetting::new("Get", "http://example.com/test");
        assert_eq!(setting.method, "GET");
        assert_eq!(setting.url, "http://example.com/test");
    }

    #[test]
    fn test_with_options_moves_every_field() {
        let options = RequestOptions::new()
            .params(Params::from_pairs(["k", "v"]).unwrap())
            .body("direwolf")
            .cookies(Cookies::from_pairs(["name", "direwolf"]).unwrap())
            .proxy(Proxy::new("http://127.0.0.1:1", "http://127.0.0.1:2"))
            .redirect_num(3)
            .timeout(-1);
        let setting = RequestSetting::with_options("post", "http://example.com", options);

        assert_eq!(setting.method, "POST");
        assert_eq!(setting.params.unwrap().get("k"), "v");
        assert_eq!(setting.body.unwrap().as_bytes(), b"direwolf");
        assert_eq!(setting.cookies.unwrap().len(), 1);
        assert_eq!(setting.proxy.unwrap().https, "http://127.0.0.1:2");
        assert_eq!(setting.redirect_num, Some(RedirectNum(3)));
        assert_eq!(setting.timeout, Some(Timeout(-1)));
        assert!(setting.post_form.is_none());
        assert!(setting.headers.is_none());
    }

    #[test]
    fn test_body_conversions() {
        assert_eq!(Body::from("abc").as_bytes(), b"abc");
        assert_eq!(Body::from(String::from("abc")).into_bytes(), b"abc".to_vec());
        assert_eq!(Body::from(&b"\x00\xff"[..]).as_bytes(), &[0u8, 255]);
    }

    #[test]
    fn test_proxy_serde_round_trip_field_names() {
        let proxy = Proxy::new("http://a:1", "http://b:2");
        let json = serde_json::to_string(&proxy).unwrap();
        assert_eq!(json, r#"{"http":"http://a:1","https":"http://b:2"}"#);
    }
}

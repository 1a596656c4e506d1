//! reqsession: an ergonomic HTTP client session.
//!
//! A [`Session`] keeps default headers, proxy and timeout plus a cookie jar and
//! pooled connections. Each request is described by a method, a URL and a
//! [`RequestOptions`] value. Per-request options override the session defaults,
//! and the result is a fully buffered [`Response`].
//!
//! # Example
//!
//! ```no_run
//! use reqsession::{Cookies, PostForm, RequestOptions, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> reqsession::Result<()> {
//! let session = Session::new();
//!
//! let resp = session
//!     .post(
//!         "http://httpbin.org/post",
//!         RequestOptions::new()
//!             .post_form(PostForm::from_pairs(["key", "value"])?)
//!             .cookies(Cookies::from_pairs(["name", "direwolf"])?)
//!             .timeout(10),
//!     )
//!     .await?;
//! println!("{} {}", resp.status_code, resp.text());
//! # Ok(())
//! # }
//! ```
//!
//! # Policy rules
//!
//! - Headers: request values replace session values for the same name.
//! - Proxy: request proxy, else session proxy, else environment settings.
//!   A chosen proxy needs both its HTTP and HTTPS URL.
//! - Redirects: [`RedirectNum`] on the request, else 5. Zero or negative
//!   forbids redirects.
//! - Timeout: [`Timeout`] is signed. Positive sets seconds, negative disables
//!   the limit, zero defers to the session, then to 30 seconds.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.
//!
//! The crate-level [`get`], [`post`], [`request`] and [`send`] share one
//! process-wide session. Its pooled connections are tied to the runtime that
//! opened them, so call these functions from a single runtime for the life of
//! the process. Programs that start several runtimes (including one per
//! `#[tokio::test]`) should create a [`Session`] per runtime instead.

#![warn(missing_docs)]

mod config;
mod error_handling;
mod fetch;
pub mod initialization;
mod kvmap;
mod policy;
mod request;
mod response;
mod session;

use std::sync::LazyLock;

// Re-export public API
pub use config::{
    LogFormat, LogLevel, TransportConfig, DEFAULT_ENCODING, DEFAULT_REDIRECT_LIMIT,
    DEFAULT_TIMEOUT_SECS, FORM_CONTENT_TYPE,
};
pub use error_handling::{Error, ErrorKind, HttpErrorKind, Result};
pub use kvmap::{headers, Cookie, Cookies, MultiMap, Params, PostForm};
pub use policy::{
    merge_headers, resolve_timeout, select_proxy, ProxySelector, RedirectPolicy, TimeoutPolicy,
};
pub use request::{Body, Proxy, RedirectNum, RequestOptions, RequestSetting, Timeout};
pub use reqwest::header::HeaderMap;
pub use reqwest::StatusCode;
pub use response::Response;
pub use session::Session;
pub use tokio_util::sync::CancellationToken;

// Pooled connections inside belong to the first runtime that used them.
static DEFAULT_SESSION: LazyLock<Session> = LazyLock::new(Session::new);

/// Sends a GET request with the process-wide default session.
///
/// Expects every call to come from the same Tokio runtime; see the crate
/// docs.
pub async fn get(url: &str, options: RequestOptions) -> Result<Response> {
    DEFAULT_SESSION.get(url, options).await
}

/// Sends a POST request with the process-wide default session.
pub async fn post(url: &str, options: RequestOptions) -> Result<Response> {
    DEFAULT_SESSION.post(url, options).await
}

/// Sends a request with any method using the process-wide default session.
pub async fn request(method: &str, url: &str, options: RequestOptions) -> Result<Response> {
    DEFAULT_SESSION.request(method, url, options).await
}

/// Sends a fully described request with the process-wide default session.
pub async fn send(setting: RequestSetting) -> Result<Response> {
    DEFAULT_SESSION.send(setting).await
}

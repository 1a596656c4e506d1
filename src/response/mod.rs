//! Buffered HTTP responses.

use std::sync::OnceLock;

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::DEFAULT_ENCODING;
use crate::error_handling::{body_read_error, Result};
use crate::kvmap::Cookies;
use crate::request::RequestSetting;

/// A completed response with its body fully read into memory.
///
/// Fields are public for inspection; the body is only reachable through
/// [`Response::content`], [`Response::text`] and [`Response::json`].
#[derive(Debug, Clone)]
pub struct Response {
    /// URL of the final response, after redirects
    pub url: String,
    /// HTTP status of the final response
    pub status_code: StatusCode,
    /// Protocol string, e.g. `HTTP/1.1`
    pub proto: String,
    /// Encoding label used by [`Response::text`]
    pub encoding: String,
    /// Response headers, multi-values preserved
    pub headers: HeaderMap,
    /// Cookies set by the final response
    pub cookies: Cookies,
    /// The setting this response answers
    pub request: RequestSetting,
    /// Length declared by the server, if any
    pub content_length: Option<u64>,
    content: Bytes,
    text: OnceLock<String>,
}

impl Response {
    /// Returns the raw body bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Decodes the body with [`Response::encoding`].
    ///
    /// Decoding happens once; later calls return the cached text. Unknown
    /// encoding labels fall back to UTF-8 and malformed sequences become
    /// U+FFFD.
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| {
            let encoding = Encoding::for_label(self.encoding.as_bytes()).unwrap_or(UTF_8);
            let (text, _, _) = encoding.decode(&self.content);
            text.into_owned()
        })
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.content)?)
    }
}

/// Reads the whole body of `resp` and builds a [`Response`].
///
/// The transport response is consumed, which releases its connection.
///
/// # Errors
///
/// Returns `Error::ResponseRead` if the body cannot be read, or `Error::Http`
/// if the request timeout fires while reading.
pub(crate) async fn build_response(
    request: RequestSetting,
    resp: reqwest::Response,
) -> Result<Response> {
    let url = resp.url().to_string();
    let status_code = resp.status();
    let proto = format!("{:?}", resp.version());
    let headers = resp.headers().clone();
    let content_length = resp.content_length();
    let cookies: Cookies = resp.cookies().map(Into::into).collect();

    let content = resp.bytes().await.map_err(body_read_error)?;
    debug!(
        "Read {} bytes from {url} ({status_code}, {proto})",
        content.len()
    );

    Ok(Response {
        url,
        status_code,
        proto,
        encoding: DEFAULT_ENCODING.to_string(),
        headers,
        cookies,
        request,
        content_length,
        content,
        text: OnceLock::new(),
    })
}

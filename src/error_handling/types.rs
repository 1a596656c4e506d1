//! Error type definitions.
//!
//! This module defines the crate error and the kinds used to classify it.

use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Boxed error used where the underlying cause has no single concrete type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by sessions, request construction and the key/value builders.
///
/// Every variant that wraps a lower-level failure keeps it reachable through
/// [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum Error {
    /// A key/value argument list had an odd number of items.
    #[error("key and value must be pairs, got {len} items")]
    MalformedArguments {
        /// Number of items that were supplied.
        len: usize,
    },

    /// An index past the stored values was requested from a multi-value map.
    #[error("index {index} out of range for key {key:?} with {len} values")]
    OutOfRange {
        /// The key that was looked up.
        key: String,
        /// The requested index.
        index: usize,
        /// Number of values stored under the key.
        len: usize,
    },

    /// A header name or value cannot be sent on the wire.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// The method or URL of a request is malformed.
    #[error("failed to build request {method} {url}")]
    NewRequest {
        /// The (uppercased) method.
        method: String,
        /// The URL as supplied.
        url: String,
        /// The parse failure.
        #[source]
        source: BoxError,
    },

    /// A request carried both a raw body and a post form.
    #[error("body can't exist together with post form")]
    RequestBody,

    /// A proxy is selected but one of its URLs is missing or malformed.
    #[error("proxy URL error: {reason}")]
    ProxyUrl {
        /// What is wrong with the proxy definition.
        reason: String,
        /// The URL parse failure, if any.
        #[source]
        source: Option<url::ParseError>,
    },

    /// A proxy was asked to route a URL whose scheme is neither http nor https.
    #[error("URL scheme {scheme:?} is not http or https")]
    Url {
        /// The rejected scheme.
        scheme: String,
    },

    /// The redirect chain went past the allowed number of hops.
    #[error("exceeded the maximum number of redirects ({limit})")]
    Redirect {
        /// The effective redirect limit.
        limit: usize,
        /// The transport error carrying the redirect failure.
        #[source]
        source: reqwest::Error,
    },

    /// The transport failed to complete the exchange.
    #[error("{kind}")]
    Http {
        /// Classification of the transport failure.
        kind: HttpErrorKind,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be read completely.
    #[error("failed to read response body")]
    ResponseRead {
        /// The read failure.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not valid JSON for the requested type.
    #[error("failed to decode response body as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The transport client could not be built.
    #[error("HTTP client initialization error: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
#[allow(missing_docs)]
pub enum ErrorKind {
    MalformedArguments,
    OutOfRange,
    InvalidHeader,
    NewRequestError,
    RequestBodyError,
    ProxyUrlError,
    UrlError,
    RedirectError,
    HttpError,
    ResponseReadError,
    DecodeError,
    ClientInitError,
    Cancelled,
}

impl ErrorKind {
    /// Returns a human-readable label for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedArguments => "Malformed arguments",
            ErrorKind::OutOfRange => "Index out of range",
            ErrorKind::InvalidHeader => "Invalid header",
            ErrorKind::NewRequestError => "New request error",
            ErrorKind::RequestBodyError => "Request body error",
            ErrorKind::ProxyUrlError => "Proxy URL error",
            ErrorKind::UrlError => "URL error",
            ErrorKind::RedirectError => "Redirect error",
            ErrorKind::HttpError => "HTTP error",
            ErrorKind::ResponseReadError => "Response read error",
            ErrorKind::DecodeError => "Decode error",
            ErrorKind::ClientInitError => "Client initialization error",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of transport-level failures.
///
/// Lets retry logic tell a timeout apart from a refused connection without
/// inspecting the `reqwest::Error` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
#[allow(missing_docs)]
pub enum HttpErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Other,
}

impl HttpErrorKind {
    /// Returns a human-readable label for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpErrorKind::Timeout => "HTTP request timeout error",
            HttpErrorKind::Connect => "HTTP request connect error",
            HttpErrorKind::Request => "HTTP request error",
            HttpErrorKind::Body => "HTTP request body error",
            HttpErrorKind::Decode => "HTTP request decode error",
            HttpErrorKind::Other => "HTTP request other error",
        }
    }
}

impl std::fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedArguments { .. } => ErrorKind::MalformedArguments,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
            Error::InvalidHeader { .. } => ErrorKind::InvalidHeader,
            Error::NewRequest { .. } => ErrorKind::NewRequestError,
            Error::RequestBody => ErrorKind::RequestBodyError,
            Error::ProxyUrl { .. } => ErrorKind::ProxyUrlError,
            Error::Url { .. } => ErrorKind::UrlError,
            Error::Redirect { .. } => ErrorKind::RedirectError,
            Error::Http { .. } => ErrorKind::HttpError,
            Error::ResponseRead { .. } => ErrorKind::ResponseReadError,
            Error::Decode(_) => ErrorKind::DecodeError,
            Error::ClientInit(_) => ErrorKind::ClientInitError,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Returns true if the transport gave up because a timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Http {
                kind: HttpErrorKind::Timeout,
                ..
            }
        )
    }

    /// Returns true if the transport could not establish a connection.
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            Error::Http {
                kind: HttpErrorKind::Connect,
                ..
            }
        )
    }
}

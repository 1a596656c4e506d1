//! Error categorization.
//!
//! This module maps `reqwest::Error` values onto the crate error taxonomy.

use super::types::{Error, HttpErrorKind};

/// Categorizes a `reqwest::Error` into an `HttpErrorKind`.
///
/// Timeouts are checked first: reqwest marks a connect that timed out as both
/// `is_connect()` and `is_timeout()`, and callers retrying on timeouts need to
/// see those as timeouts.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> HttpErrorKind {
    if error.is_timeout() {
        HttpErrorKind::Timeout
    } else if error.is_connect() {
        HttpErrorKind::Connect
    } else if error.is_body() {
        HttpErrorKind::Body
    } else if error.is_decode() {
        HttpErrorKind::Decode
    } else if error.is_request() {
        HttpErrorKind::Request
    } else {
        HttpErrorKind::Other
    }
}

/// Wraps an error returned while executing a request.
///
/// A failure raised by the redirect policy becomes [`Error::Redirect`];
/// everything else becomes [`Error::Http`] with the cause attached.
pub fn transport_error(error: reqwest::Error, redirect_limit: usize) -> Error {
    if error.is_redirect() {
        return Error::Redirect {
            limit: redirect_limit,
            source: error,
        };
    }
    Error::Http {
        kind: categorize_reqwest_error(&error),
        source: error,
    }
}

/// Wraps an error returned while draining the response body.
///
/// The request timeout covers the body read, so a timeout here is reported
/// the same way as one during connect.
pub fn body_read_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Http {
            kind: HttpErrorKind::Timeout,
            source: error,
        }
    } else {
        Error::ResponseRead { source: error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;

    // Builder errors are the only reqwest errors constructible without I/O.
    fn builder_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("http://[::1")
            .build()
            .expect_err("malformed URL must fail to build")
    }

    #[test]
    fn test_categorize_builder_error_as_other() {
        let err = builder_error();
        assert!(err.is_builder());
        assert_eq!(categorize_reqwest_error(&err), HttpErrorKind::Other);
    }

    #[test]
    fn test_transport_error_wraps_as_http() {
        let err = transport_error(builder_error(), 5);
        assert_eq!(err.kind(), ErrorKind::HttpError);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_body_read_error_keeps_read_kind() {
        let err = body_read_error(builder_error());
        assert_eq!(err.kind(), ErrorKind::ResponseReadError);
    }
}

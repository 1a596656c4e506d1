//! Configuration constants.
//!
//! This module defines the defaults applied when neither a request nor its
//! session says otherwise, plus the connection-pool tuning of the transport.

// Request policy defaults
/// Request timeout in seconds when neither the request nor the session sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Number of redirects followed when the request does not override it.
pub const DEFAULT_REDIRECT_LIMIT: usize = 5;

// Transport tuning
/// TCP connect timeout in seconds (also bounds the TLS handshake)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;
/// TCP keep-alive interval in seconds
pub const TCP_KEEPALIVE_SECS: u64 = 30;
/// Maximum idle pooled connections kept per host
pub const POOL_MAX_IDLE_PER_HOST: usize = 100;
/// Seconds an idle pooled connection is kept before being closed
pub const POOL_IDLE_TIMEOUT_SECS: u64 = 90;
/// Transport clients a session keeps; the least recently used is dropped past this
pub const MAX_CACHED_CLIENTS: usize = 32;

// Encoding
/// Encoding label used to decode response bodies into text.
pub const DEFAULT_ENCODING: &str = "UTF-8";
/// Content type sent with URL-encoded post forms.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default User-Agent string for requests that don't set one.
pub const DEFAULT_USER_AGENT: &str = concat!("reqsession/", env!("CARGO_PKG_VERSION"));

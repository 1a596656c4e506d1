//! Configuration types.
//!
//! This module defines the transport configuration and logging enums.

use std::time::Duration;

use crate::config::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_CACHED_CLIENTS, POOL_IDLE_TIMEOUT_SECS,
    POOL_MAX_IDLE_PER_HOST, TCP_KEEPALIVE_SECS,
};

/// Verbosity for [`init_logger_with`](crate::initialization::init_logger_with).
///
/// `Info` logs client construction; `Debug` adds one line per request and
/// response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings such as cancelled requests
    Warn,
    /// Transport client construction
    #[default]
    Info,
    /// Every dispatched request and received response
    Debug,
    /// Everything, including transport crate internals at their own filter
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, Default)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Connection-pool and identity settings for a session's transport.
///
/// These are fixed when the session is created. Per-request policy (proxy,
/// redirects, timeout) is resolved separately for every call.
///
/// # Examples
///
/// ```
/// use reqsession::{Session, TransportConfig};
/// use std::time::Duration;
///
/// let session = Session::with_config(TransportConfig {
///     connect_timeout: Duration::from_secs(5),
///     ..Default::default()
/// });
/// # drop(session);
/// ```
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// TCP keep-alive interval
    pub tcp_keepalive: Duration,

    /// Maximum idle connections kept per host
    pub pool_max_idle_per_host: usize,

    /// How long an idle connection stays pooled
    pub pool_idle_timeout: Duration,

    /// User-Agent sent when the merged headers don't carry one
    pub user_agent: String,

    /// Distinct (proxy, redirect) clients kept at once; zero is treated as one
    pub max_clients: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            tcp_keepalive: Duration::from_secs(TCP_KEEPALIVE_SECS),
            pool_max_idle_per_host: POOL_MAX_IDLE_PER_HOST,
            pool_idle_timeout: Duration::from_secs(POOL_IDLE_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_clients: MAX_CACHED_CLIENTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_log_level_default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(log::LevelFilter::from(LogLevel::default()), log::LevelFilter::Info);
    }

    #[test]
    fn test_transport_config_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.tcp_keepalive, Duration::from_secs(30));
        assert_eq!(config.pool_max_idle_per_host, 100);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
        assert!(config.user_agent.starts_with("reqsession/"));
        assert_eq!(config.max_clients, 32);
    }
}

//! HTTP client initialization.
//!
//! reqwest fixes proxy and redirect behaviour when a client is built, so a
//! session keeps one immutable client per distinct (proxy, redirect) policy.
//! Requests never reconfigure a client another request might be using.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};
use lru::LruCache;
use reqwest::cookie::Jar;
use reqwest::ClientBuilder;

use crate::config::TransportConfig;
use crate::error_handling::{Error, Result};
use crate::policy::{ProxySelector, RedirectPolicy};

/// The client-level part of a resolved request policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportKey {
    /// Forced proxy, or `None` to use the environment's proxy settings
    pub proxy: Option<ProxySelector>,
    /// Redirect limit
    pub redirect: RedirectPolicy,
}

/// Initializes an HTTP client for one transport policy.
///
/// Creates a `reqwest::Client` configured with:
/// - Connect timeout, TCP keep-alive and idle-pool limits from `config`
/// - User-Agent from `config` (a User-Agent header on the request wins)
/// - The shared cookie jar
/// - The redirect limit from `key`
/// - The proxy from `key`, or system proxies when there is none
///
/// No overall timeout is set here; it is applied per request.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(
    config: &TransportConfig,
    jar: Arc<Jar>,
    key: &TransportKey,
) -> std::result::Result<reqwest::Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .tcp_keepalive(config.tcp_keepalive)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(config.pool_idle_timeout)
        .user_agent(config.user_agent.clone())
        .cookie_provider(jar)
        .redirect(key.redirect.to_reqwest());

    if let Some(selector) = &key.proxy {
        let selector = selector.clone();
        builder = builder.proxy(reqwest::Proxy::custom(move |url| {
            selector.select(url).ok().cloned()
        }));
    }

    builder.build()
}

/// Clients of one session, keyed by transport policy, sharing one cookie jar.
///
/// At most [`TransportConfig::max_clients`] clients are kept. Building one
/// past that drops the least recently used, together with its idle
/// connections; requests already holding it finish normally.
#[derive(Debug)]
pub struct ClientPool {
    config: TransportConfig,
    jar: Arc<Jar>,
    clients: Mutex<LruCache<TransportKey, reqwest::Client>>,
}

impl ClientPool {
    /// Creates an empty pool; clients are built on first use.
    pub fn new(config: TransportConfig, jar: Arc<Jar>) -> Self {
        let capacity = NonZeroUsize::new(config.max_clients).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            jar,
            clients: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the client for `key`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientInit`] if the client cannot be built.
    pub fn client_for(&self, key: &TransportKey) -> Result<reqwest::Client> {
        // A panic while holding the lock can't leave the map half-updated.
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(key) {
            return Ok(client.clone());
        }
        info!(
            "Building HTTP client (proxy: {}, redirect limit: {})",
            key.proxy
                .as_ref()
                .map(|p| format!("{} / {}", p.http(), p.https()))
                .unwrap_or_else(|| "environment".to_string()),
            key.redirect.limit()
        );
        let client =
            init_client(&self.config, Arc::clone(&self.jar), key).map_err(Error::ClientInit)?;
        if let Some((evicted, _)) = clients.push(key.clone(), client.clone()) {
            debug!(
                "Dropped least recently used HTTP client (redirect limit: {})",
                evicted.redirect.limit()
            );
        }
        Ok(client)
    }

    /// Number of clients currently kept.
    pub fn len(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no client is kept.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

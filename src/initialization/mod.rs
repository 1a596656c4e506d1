//! Transport and logger initialization.
//!
//! This module provides:
//! - HTTP client construction per transport policy (`ClientPool`)
//! - Logger setup on top of `env_logger`

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, ClientPool, TransportKey};
pub use logger::init_logger_with;

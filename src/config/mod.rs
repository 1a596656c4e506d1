//! Configuration and constants.
//!
//! This module provides:
//! - Named defaults for timeout and redirect policy
//! - Transport tuning constants and the `TransportConfig` type
//! - Logging level and format types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, TransportConfig};

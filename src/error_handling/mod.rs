//! Error handling.
//!
//! This module provides:
//! - The crate error type and its kind taxonomy
//! - Categorization of transport errors into that taxonomy
//!
//! Errors are never logged and dropped inside the request pipeline; each one is
//! returned to the caller with its cause attached.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{body_read_error, transport_error};
pub use types::{BoxError, Error, ErrorKind, HttpErrorKind, Result};

//! Logger initialization.
//!
//! The library only emits records through the `log` facade. Applications may
//! install any logger; this one is a convenience.

use std::io::Write;

use colored::*;
use log::{LevelFilter, SetLoggerError};

use crate::config::LogFormat;

/// Initializes an `env_logger` with the given level and format.
///
/// `level` is a [`LogLevel`](crate::LogLevel) or a `log::LevelFilter`. `RUST_LOG` is read
/// first and `level` then overrides it for this crate and as the global
/// default. Transport crates (`reqwest`, `hyper`) are held at
/// `Info` so request-level debugging stays readable.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```no_run
/// use reqsession::initialization::init_logger_with;
/// use reqsession::{LogFormat, LogLevel};
///
/// init_logger_with(LogLevel::Debug, LogFormat::Plain).unwrap();
/// ```
pub fn init_logger_with(
    level: impl Into<LevelFilter>,
    format: LogFormat,
) -> Result<(), SetLoggerError> {
    let level = level.into();
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("cookie_store", LevelFilter::Warn);
    builder.filter_module("reqsession", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init so a second call reports an error instead of panicking
    builder.try_init()
}

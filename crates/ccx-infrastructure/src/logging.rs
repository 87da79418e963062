//! Structured logging with tracing
//!
//! Configures the tracing subscriber for the indexer. The `CCX_LOG`
//! environment variable overrides the configured level with a full
//! `EnvFilter` directive set.

use crate::config::LoggingConfig;
use ccx_domain::error::{Error, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with the provided configuration.
///
/// Fails if a subscriber is already installed or the level is unknown.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env("CCX_LOG").unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let init_result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    init_result.map_err(|e| Error::config(format!("failed to install subscriber: {e}")))
}

/// Parse a log level string to a tracing [`Level`]
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::config(format!(
            "invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

//! Tracing infrastructure.
//!
//! Structured logging via the `tracing` and `tracing-subscriber` crates,
//! with environment-based filtering (`RUST_LOG` wins over the configured
//! level) and a choice of output formats.

use crate::error::{Result, VibrometerError};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for tracing.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Pretty-printed format with colors (for development).
    Pretty,
    /// Compact format (for production).
    Compact,
    /// JSON format for structured logging (for log aggregation).
    Json,
}

/// Initialize the global subscriber with the compact format.
pub fn init(log_level: &str) -> Result<()> {
    init_with_format(log_level, OutputFormat::Compact)
}

/// Initialize the global subscriber with an explicit output format.
///
/// Fails if `log_level` does not parse or a subscriber is already installed.
pub fn init_with_format(log_level: &str, format: OutputFormat) -> Result<()> {
    let level = parse_log_level(log_level)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let builder = fmt().with_env_filter(filter).with_target(false);
    match format {
        OutputFormat::Pretty => builder.pretty().try_init(),
        OutputFormat::Compact => builder.compact().try_init(),
        OutputFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| VibrometerError::Internal(format!("failed to initialize tracing: {e}")))
}

/// Parse a log level string (case-insensitive).
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(VibrometerError::Configuration(format!(
            "Invalid log level '{other}'. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}

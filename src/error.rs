//! Custom error types for the crate.
//!
//! This module defines the primary error type, `VibrometerError`, for the
//! whole crate. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the different kinds of failures that can occur,
//! from configuration issues to rejected sensor input.
//!
//! Two conditions the estimation algorithm itself defines are deliberately
//! *not* errors and never appear here:
//!
//! - An empty-window recompute request resets derived state and suppresses
//!   the notification (see [`crate::estimator`]).
//! - A negative computed variance caused by floating-point round-off is
//!   clamped to zero before the square root (see [`crate::stats`]).

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type Result<T> = std::result::Result<T, VibrometerError>;

/// Errors produced by configuration, ingestion, and sensor plumbing.
#[derive(Error, Debug)]
pub enum VibrometerError {
    /// Configuration file or environment parsing failed.
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Configuration parsed but holds a semantically invalid value. Raised
    /// at construction time, never at first sample.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// A raw reading was rejected at the ingestion boundary. Covers
    /// non-finite values (NaN, ±inf) and readings too large to quantize.
    #[error("Invalid sample: axis {axis} value {value} is not a finite, quantizable reading")]
    InvalidSample {
        /// Axis label (`x`, `y`, or `z`).
        axis: char,
        /// The offending raw value.
        value: f64,
    },

    /// A sensor source failed to connect, stream, or was used before
    /// connecting.
    #[error("Sensor error: {0}")]
    Sensor(String),

    /// I/O error, e.g. while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}

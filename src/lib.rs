//! # Vibrometer Core Library
//!
//! This crate estimates a scalar vibration magnitude from a noisy 3-axis
//! accelerometer stream. It maintains a bounded sliding window of the most
//! recent quantized samples and recomputes error-corrected statistics after
//! every reading: per-axis mean, per-axis noise-floor-corrected standard
//! deviation, and the scalar vibration value (the sum of the three corrected
//! deviations, in mm/s²).
//!
//! ## Crate Structure
//!
//! The library is organized into several modules, each with a distinct
//! responsibility:
//!
//! - **`config`**: Strongly-typed settings loaded from TOML files and the
//!   environment. See `config::Settings`.
//! - **`core`**: Fundamental types and traits: `RawSample`,
//!   `VibrationEvent`, and the `SensorSource` trait that sample sources
//!   implement.
//! - **`error`**: The crate-wide `VibrometerError` enum.
//! - **`estimator`**: The `VibrationEstimator` orchestrator that drives
//!   quantization, the window, the statistics engine, and event publication.
//! - **`quantizer`**: Conversion between physical units and the quantized
//!   internal scale.
//! - **`sensor`**: Concrete `SensorSource` implementations (currently the
//!   mock accelerometer).
//! - **`stats`**: The pure statistics pass over the window contents.
//! - **`telemetry`**: Tracing subscriber initialization.
//! - **`window`**: The bounded FIFO of recent quantized samples.

pub mod config;
pub mod core;
pub mod error;
pub mod estimator;
pub mod quantizer;
pub mod sensor;
pub mod stats;
pub mod telemetry;
pub mod window;

pub use config::Settings;
pub use core::{RawSample, SensorSource, VibrationEvent};
pub use error::{Result, VibrometerError};
pub use estimator::{EstimatorConfig, VibrationEstimator};
pub use stats::ComputedStats;

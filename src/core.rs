//! Core traits and data types for vibration estimation.
use crate::config::Settings;
use crate::error::VibrometerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// A single raw 3-axis accelerometer reading, in physical units (m/s²).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawSample {
    /// Time the reading was taken.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Acceleration along the x axis, m/s².
    pub x: f64,
    /// Acceleration along the y axis, m/s².
    pub y: f64,
    /// Acceleration along the z axis, m/s².
    pub z: f64,
}

impl RawSample {
    /// Create a reading stamped with the current time.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            x,
            y,
            z,
        }
    }
}

/// Event broadcast to listeners after each successful recompute.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VibrationEvent {
    /// Time the estimate was computed.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Scalar vibration estimate, mm/s².
    pub vibration: f64,
}

/// Trait for any accelerometer-like sample source.
///
/// This trait defines the common interface for all sensor sources, allowing
/// them to be managed and driven in a generic way. Sources deliver readings
/// at their own cadence; consumers subscribe via [`sample_stream`].
///
/// [`sample_stream`]: SensorSource::sample_stream
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Returns the name of the sensor source.
    fn name(&self) -> String;

    /// Connects to the sensor and prepares it for sampling.
    async fn connect(&mut self, settings: &Arc<Settings>) -> Result<(), VibrometerError>;

    /// Disconnects from the sensor.
    async fn disconnect(&mut self) -> Result<(), VibrometerError>;

    /// Returns a stream of [`RawSample`]s from the sensor.
    async fn sample_stream(&mut self) -> Result<broadcast::Receiver<RawSample>, VibrometerError>;
}

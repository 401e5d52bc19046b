//! Conversion between physical units and the quantized internal scale.
//!
//! All statistics are accumulated over quantized integers and converted back
//! to physical units at the end. Working in integers keeps the sum-of-squares
//! accumulation exact and matches the sensor's effective resolution; the
//! calibration constant is isolated here.

use crate::error::{Result, VibrometerError};

/// Maps physical-unit readings (m/s²) to quantized integer units and back.
///
/// `unit_scale` is the physical magnitude of one quantization unit, fixed per
/// deployed sensor class. The round trip `unscale(scale(r))` is exact only up
/// to rounding; the error is bounded by `unit_scale / 2`.
#[derive(Clone, Copy, Debug)]
pub struct Quantizer {
    unit_scale: f64,
}

impl Quantizer {
    /// Create a quantizer for the given calibration constant.
    ///
    /// Fails fast if `unit_scale` is not a positive, finite number.
    pub fn new(unit_scale: f64) -> Result<Self> {
        if !unit_scale.is_finite() || unit_scale <= 0.0 {
            return Err(VibrometerError::Configuration(format!(
                "unit_scale must be a positive, finite number, got {unit_scale}"
            )));
        }
        Ok(Self { unit_scale })
    }

    /// Convert a physical reading to quantized units, rounding to nearest.
    pub fn scale(&self, raw: f64) -> i64 {
        (raw / self.unit_scale).round() as i64
    }

    /// Convert a value in quantized units back to physical units.
    ///
    /// Takes `f64` rather than `i64` because derived quantities (means,
    /// deviations) are fractional in the quantized domain.
    pub fn unscale(&self, quantized: f64) -> f64 {
        quantized * self.unit_scale
    }

    /// Whether `raw` can be quantized: finite, and small enough that the
    /// quantized magnitude stays within `i32` range. Readings are rejected
    /// at the ingestion boundary when this is false.
    pub fn quantizable(&self, raw: f64) -> bool {
        raw.is_finite() && (raw / self.unit_scale).abs() <= f64::from(i32::MAX)
    }

    /// The calibration constant, physical units per quantization unit.
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }
}

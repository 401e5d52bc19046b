//! Error-corrected statistics over the sample window.
//!
//! A single pass over the window accumulates per-axis sums and sums of
//! squares in integer arithmetic, then derives the population variance via
//! the sum-of-squares identity. The standard deviation is corrected by
//! subtracting a fixed noise floor and clamping at zero.

use crate::error::{Result, VibrometerError};
use crate::quantizer::Quantizer;
use crate::window::SampleWindow;
use serde::Serialize;

/// Derived statistics for one window state.
///
/// `mean` and `std_dev` are per-axis values in physical units (m/s²);
/// `vibration` is the sum of the three corrected deviations in mm/s².
/// Always reflects the window at the time of the last recompute.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ComputedStats {
    /// Per-axis mean, m/s².
    pub mean: [f64; 3],
    /// Per-axis error-corrected standard deviation, m/s². Never negative.
    pub std_dev: [f64; 3],
    /// Scalar vibration estimate, mm/s².
    pub vibration: f64,
}

/// Pure function from window contents to [`ComputedStats`].
#[derive(Clone, Copy, Debug)]
pub struct StatisticsEngine {
    noise_floor: f64,
}

impl StatisticsEngine {
    /// Create an engine with the given noise floor (quantized units).
    ///
    /// Fails fast if `noise_floor` is negative or not finite.
    pub fn new(noise_floor: f64) -> Result<Self> {
        if !noise_floor.is_finite() || noise_floor < 0.0 {
            return Err(VibrometerError::Configuration(format!(
                "noise_floor must be a non-negative, finite number, got {noise_floor}"
            )));
        }
        Ok(Self { noise_floor })
    }

    /// The configured noise floor, in quantized units.
    pub fn noise_floor(&self) -> f64 {
        self.noise_floor
    }

    /// Recompute statistics for the current window contents.
    ///
    /// Returns `None` for an empty window; the caller resets derived state
    /// and suppresses notification. This is normal control flow, not an
    /// error.
    pub fn compute(&self, window: &SampleWindow, quantizer: &Quantizer) -> Option<ComputedStats> {
        let n = window.len();
        if n == 0 {
            return None;
        }

        let mut sums = [0i64; 3];
        let mut sum_sqs = [0i64; 3];
        for sample in window.iter() {
            for k in 0..3 {
                sums[k] += sample[k];
                sum_sqs[k] += sample[k] * sample[k];
            }
        }

        let n_f = n as f64;
        let mut mean = [0.0f64; 3];
        let mut std_dev = [0.0f64; 3];
        for k in 0..3 {
            let mean_k = sums[k] as f64 / n_f;
            let variance_k = (sum_sqs[k] as f64 - n_f * mean_k * mean_k) / n_f;
            // Float round-off can drive a mathematically zero variance a hair
            // negative; sqrt must never see a negative operand.
            let corrected = (variance_k.max(0.0).sqrt() - self.noise_floor).max(0.0);
            mean[k] = quantizer.unscale(mean_k);
            std_dev[k] = quantizer.unscale(corrected);
        }

        let vibration = std_dev.iter().sum::<f64>() * 1000.0;
        Some(ComputedStats {
            mean,
            std_dev,
            vibration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const UNIT_SCALE: f64 = 0.01811;

    fn engine() -> StatisticsEngine {
        StatisticsEngine::new(0.5).unwrap()
    }

    fn quantizer() -> Quantizer {
        Quantizer::new(UNIT_SCALE).unwrap()
    }

    #[test]
    fn empty_window_yields_none() {
        let window = SampleWindow::new(15);
        assert!(engine().compute(&window, &quantizer()).is_none());
    }

    #[test]
    fn single_sample_of_one_unit_per_axis() {
        // Worked example: (0.0181, 0.0181, 0.0181) quantizes to one unit per
        // axis; variance is zero, the corrected deviation clamps to zero, and
        // the vibration estimate is exactly zero.
        let q = quantizer();
        let mut window = SampleWindow::new(15);
        window.push([q.scale(0.0181), q.scale(0.0181), q.scale(0.0181)]);

        let stats = engine().compute(&window, &q).unwrap();
        for k in 0..3 {
            assert_relative_eq!(stats.mean[k], UNIT_SCALE, max_relative = 1e-12);
            assert_eq!(stats.std_dev[k], 0.0);
        }
        assert_eq!(stats.vibration, 0.0);
    }

    #[test]
    fn identical_samples_have_zero_vibration() {
        let q = quantizer();
        for n in 1..=20 {
            let mut window = SampleWindow::new(15);
            for _ in 0..n {
                window.push([37, -12, 541]);
            }
            let stats = engine().compute(&window, &q).unwrap();
            assert_eq!(stats.std_dev, [0.0; 3]);
            assert_eq!(stats.vibration, 0.0);
        }
    }

    #[test]
    fn known_two_sample_variance() {
        // Two samples at 0 and 2 units: mean 1, population variance 1,
        // std_dev 1, corrected by the 0.5 noise floor to 0.5 units per axis.
        let q = quantizer();
        let mut window = SampleWindow::new(15);
        window.push([0, 0, 0]);
        window.push([2, 2, 2]);

        let stats = engine().compute(&window, &q).unwrap();
        for k in 0..3 {
            assert_relative_eq!(stats.mean[k], q.unscale(1.0), max_relative = 1e-12);
            assert_relative_eq!(stats.std_dev[k], q.unscale(0.5), max_relative = 1e-12);
        }
        assert_relative_eq!(
            stats.vibration,
            3.0 * q.unscale(0.5) * 1000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn std_dev_never_negative() {
        let q = quantizer();
        let eng = engine();
        let mut window = SampleWindow::new(15);
        // Mixed magnitudes, including runs below the noise floor.
        for i in 0..60i64 {
            window.push([i % 2, 500 + (i * 7) % 13, -(i % 3)]);
            let stats = eng.compute(&window, &q).unwrap();
            for k in 0..3 {
                assert!(
                    stats.std_dev[k] >= 0.0,
                    "axis {k} went negative: {}",
                    stats.std_dev[k]
                );
            }
            assert!(stats.vibration >= 0.0);
        }
    }

    #[test]
    fn noise_floor_suppresses_small_spread() {
        // Spread of 0/1 units has std_dev 0.5 at worst, entirely below a
        // noise floor of 0.5: the estimate must stay zero.
        let q = quantizer();
        let mut window = SampleWindow::new(15);
        for i in 0..15i64 {
            let unit = i % 2;
            window.push([unit, unit, unit]);
        }
        let stats = engine().compute(&window, &q).unwrap();
        assert_eq!(stats.vibration, 0.0);
    }

    #[test]
    fn rejects_invalid_noise_floor() {
        assert!(StatisticsEngine::new(-0.1).is_err());
        assert!(StatisticsEngine::new(f64::NAN).is_err());
        assert!(StatisticsEngine::new(0.0).is_ok());
    }
}

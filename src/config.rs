//! Configuration management.
//!
//! Strongly-typed settings loaded with `figment` from a TOML file merged
//! with `VIBROMETER_`-prefixed environment variables. Compiled-in defaults
//! mean the crate works with no configuration file present. Semantic
//! validation fails fast at load time, never at first sample.
//!
//! Environment keys use `__` as the section separator so that keys
//! containing underscores survive, e.g. `VIBROMETER_ESTIMATOR__MAX_SIZE=20`.

use crate::error::{Result, VibrometerError};
use crate::estimator::EstimatorConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file consulted when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "VIBROMETER_";

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Application-level settings.
    #[serde(default)]
    pub application: ApplicationSettings,
    /// Estimator tuning constants.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Sensor source settings.
    #[serde(default)]
    pub sensor: SensorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            application: ApplicationSettings::default(),
            estimator: EstimatorConfig::default(),
            sensor: SensorSettings::default(),
        }
    }
}

/// Application-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    /// Application name, used in log output.
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Settings for the available sensor sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorSettings {
    /// Mock accelerometer settings.
    #[serde(default)]
    pub mock: MockSensorSettings,
}

/// Settings for the mock accelerometer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockSensorSettings {
    /// Sampling rate in Hz.
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f64,
    /// Number of samples to generate; 0 means run until every receiver is
    /// dropped.
    #[serde(default)]
    pub num_samples: usize,
    /// Baseline acceleration vector (m/s²), the at-rest reading.
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],
    /// Peak amplitude of the simulated vibration component (m/s²).
    #[serde(default = "default_vibration_amplitude")]
    pub vibration_amplitude: f64,
}

impl Default for MockSensorSettings {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate_hz(),
            num_samples: 0,
            gravity: default_gravity(),
            vibration_amplitude: default_vibration_amplitude(),
        }
    }
}

fn default_app_name() -> String {
    "vibrometer".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sample_rate_hz() -> f64 {
    50.0
}

fn default_gravity() -> [f64; 3] {
    [0.0, 0.0, 9.81]
}

fn default_vibration_amplitude() -> f64 {
    0.05
}

impl Settings {
    /// Load settings from defaults, a TOML file, and the environment.
    ///
    /// An explicit `path` must exist; the implicit [`DEFAULT_CONFIG_PATH`]
    /// may be absent, in which case compiled-in defaults apply. Environment
    /// variables override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default()));
        let figment = match path {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => figment.merge(Toml::file(DEFAULT_CONFIG_PATH)),
        };
        let settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings after loading.
    pub fn validate(&self) -> Result<()> {
        const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !VALID_LEVELS.contains(&self.application.log_level.as_str()) {
            return Err(VibrometerError::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                VALID_LEVELS.join(", ")
            )));
        }

        self.estimator.validate()?;

        let rate = self.sensor.mock.sample_rate_hz;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(VibrometerError::Configuration(format!(
                "sensor.mock.sample_rate_hz must be a positive, finite number, got {rate}"
            )));
        }
        for (axis, value) in ["x", "y", "z"].iter().zip(self.sensor.mock.gravity) {
            if !value.is_finite() {
                return Err(VibrometerError::Configuration(format!(
                    "sensor.mock.gravity {axis} component must be finite, got {value}"
                )));
            }
        }
        let amplitude = self.sensor.mock.vibration_amplitude;
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(VibrometerError::Configuration(format!(
                "sensor.mock.vibration_amplitude must be non-negative and finite, got {amplitude}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.estimator.max_size, 15);
        assert_eq!(settings.estimator.noise_floor, 0.5);
        assert_eq!(settings.application.log_level, "info");
    }

    #[test]
    #[serial]
    fn loads_from_file_with_partial_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[estimator]\nmax_size = 30\n\n[sensor.mock]\nsample_rate_hz = 100.0\n"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.estimator.max_size, 30);
        assert_eq!(settings.sensor.mock.sample_rate_hz, 100.0);
        // untouched sections keep their defaults
        assert_eq!(settings.estimator.noise_floor, 0.5);
        assert_eq!(settings.application.log_level, "info");
    }

    #[test]
    #[serial]
    fn missing_explicit_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/vibrometer.toml")));
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[estimator]\nmax_size = 30\n").unwrap();

        std::env::set_var("VIBROMETER_ESTIMATOR__MAX_SIZE", "7");
        let settings = Settings::load(Some(file.path()));
        std::env::remove_var("VIBROMETER_ESTIMATOR__MAX_SIZE");

        assert_eq!(settings.unwrap().estimator.max_size, 7);
    }

    #[test]
    #[serial]
    fn rejects_invalid_values_at_load_time() {
        for body in [
            "[estimator]\nmax_size = 0\n",
            "[estimator]\nunit_scale = 0.0\n",
            "[estimator]\nunit_scale = -1.0\n",
            "[estimator]\nnoise_floor = -0.5\n",
            "[sensor.mock]\nsample_rate_hz = 0.0\n",
            "[application]\nlog_level = \"verbose\"\n",
        ] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "{body}").unwrap();
            let result = Settings::load(Some(file.path()));
            assert!(
                matches!(result, Err(VibrometerError::Configuration(_))),
                "expected validation failure for: {body}"
            );
        }
    }
}

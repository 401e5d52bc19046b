//! A mock accelerometer that generates synthetic readings.
use crate::{
    config::Settings,
    core::{RawSample, SensorSource},
    error::VibrometerError,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use tracing::info;

/// Synthetic 3-axis accelerometer.
///
/// Emits a configurable gravity baseline with a superimposed deterministic
/// vibration component, at a configurable rate. Deterministic by design so
/// tests can reason about the produced values.
pub struct MockAccelerometer {
    sender: Option<broadcast::Sender<RawSample>>,
}

impl Default for MockAccelerometer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAccelerometer {
    /// Create a disconnected mock accelerometer.
    pub fn new() -> Self {
        Self { sender: None }
    }
}

#[async_trait]
impl SensorSource for MockAccelerometer {
    fn name(&self) -> String {
        "Mock Accelerometer".to_string()
    }

    async fn connect(&mut self, settings: &Arc<Settings>) -> Result<(), VibrometerError> {
        info!("Connecting mock accelerometer...");
        let (sender, _) = broadcast::channel(1024);
        self.sender = Some(sender.clone());

        let config = settings.sensor.mock.clone();
        // Spawn a task to generate readings
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs_f64(1.0 / config.sample_rate_hz));
            let mut phase: f64 = 0.0;
            let mut produced = 0usize;
            let mut had_receiver = false;

            loop {
                if config.num_samples > 0 && produced >= config.num_samples {
                    break;
                }
                ticker.tick().await;
                phase += 0.1;

                // Deterministic pseudo-noise instead of an RNG, so the task
                // stays Send and runs are reproducible
                let noise = (phase * 37.0).sin() * config.vibration_amplitude * 0.2;
                let sample = RawSample::new(
                    config.gravity[0] + config.vibration_amplitude * (phase * 13.0).sin(),
                    config.gravity[1] + config.vibration_amplitude * (phase * 17.0).sin(),
                    config.gravity[2] + config.vibration_amplitude * phase.sin() + noise,
                );

                // Samples generated before anyone subscribed don't count
                // against the budget; once a receiver has been seen, a send
                // failure means every receiver is gone.
                if sender.receiver_count() == 0 {
                    if had_receiver {
                        break;
                    }
                    continue;
                }
                had_receiver = true;
                if sender.send(sample).is_err() {
                    break;
                }
                produced += 1;
            }
            info!(samples = produced, "mock accelerometer finished");
        });

        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), VibrometerError> {
        info!("Disconnecting mock accelerometer.");
        self.sender = None;
        Ok(())
    }

    async fn sample_stream(&mut self) -> Result<broadcast::Receiver<RawSample>, VibrometerError> {
        self.sender
            .as_ref()
            .map(|s| s.subscribe())
            .ok_or_else(|| VibrometerError::Sensor("Not connected".to_string()))
    }
}

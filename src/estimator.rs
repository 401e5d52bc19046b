//! The vibration estimator.
//!
//! Orchestrates the pipeline on every reading: quantize, push into the
//! window, recompute statistics, publish the result. Each estimator owns its
//! window and derived stats, so multiple independent sensors or tests run
//! without interference.
//!
//! Listener registration is an explicit broadcast channel owned by the
//! estimator ([`VibrationEstimator::subscribe`]); the driver task spawned by
//! [`VibrationEstimator::start`] captures the shared state of its owning
//! instance, never a global.

use crate::core::{SensorSource, VibrationEvent};
use crate::error::{Result, VibrometerError};
use crate::quantizer::Quantizer;
use crate::stats::{ComputedStats, StatisticsEngine};
use crate::window::SampleWindow;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Capacity of the vibration event channel.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Tuning constants for one estimator instance.
///
/// Defaults carry the reference calibration: an iPhone-class accelerometer
/// scale, a 15-sample window, and a half-unit noise floor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Physical magnitude (m/s²) of one quantization unit.
    #[serde(default = "default_unit_scale")]
    pub unit_scale: f64,
    /// Window capacity in samples.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Known sampling noise floor, in quantized units.
    #[serde(default = "default_noise_floor")]
    pub noise_floor: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            unit_scale: default_unit_scale(),
            max_size: default_max_size(),
            noise_floor: default_noise_floor(),
        }
    }
}

fn default_unit_scale() -> f64 {
    0.0181121826171875
}

fn default_max_size() -> usize {
    15
}

fn default_noise_floor() -> f64 {
    0.5
}

impl EstimatorConfig {
    /// Check the constants for semantic validity.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(VibrometerError::Configuration(
                "max_size must be at least 1".to_string(),
            ));
        }
        Quantizer::new(self.unit_scale)?;
        StatisticsEngine::new(self.noise_floor)?;
        Ok(())
    }
}

/// Window and derived stats, updated together under one lock.
#[derive(Debug)]
struct EstimatorState {
    window: SampleWindow,
    stats: Option<ComputedStats>,
}

/// Receives raw samples and maintains the vibration estimate.
///
/// Samples arrive either through the public [`ingest`] entry point or from a
/// [`SensorSource`] stream after [`start`]. Every accepted sample runs the
/// full pipeline to completion before the next one is processed, so
/// listeners never observe a partial window state.
///
/// [`ingest`]: VibrationEstimator::ingest
/// [`start`]: VibrationEstimator::start
pub struct VibrationEstimator {
    quantizer: Quantizer,
    engine: StatisticsEngine,
    state: Arc<Mutex<EstimatorState>>,
    events: broadcast::Sender<VibrationEvent>,
    driver: Option<JoinHandle<()>>,
}

impl VibrationEstimator {
    /// Create an estimator from validated configuration. Fails fast on
    /// invalid constants; never fails on a sample.
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            quantizer: Quantizer::new(config.unit_scale)?,
            engine: StatisticsEngine::new(config.noise_floor)?,
            state: Arc::new(Mutex::new(EstimatorState {
                window: SampleWindow::new(config.max_size),
                stats: None,
            })),
            events,
            driver: None,
        })
    }

    /// Ingest one raw reading (m/s² per axis): quantize, push, recompute,
    /// and broadcast the new vibration value.
    ///
    /// Returns the published event, or `None` when the recompute found an
    /// empty window (derived state is then reset and nothing is emitted).
    /// Non-finite or non-quantizable input is rejected without touching the
    /// window.
    pub fn ingest(&self, x: f64, y: f64, z: f64) -> Result<Option<VibrationEvent>> {
        ingest_shared(&self.quantizer, &self.engine, &self.state, &self.events, x, y, z)
    }

    /// Reset the window and derived stats. Subscription state is unaffected.
    pub fn clear(&self) {
        let mut state = lock_state(&self.state);
        state.window.clear();
        state.stats = None;
        debug!("sample window cleared");
    }

    /// Begin accepting samples from the source's stream.
    ///
    /// Spawns a driver task that owns the stream receiver and runs the
    /// pipeline sequentially for each delivery. Rejected samples are logged
    /// and skipped. Fails if the estimator is already started.
    pub async fn start(&mut self, source: &mut dyn SensorSource) -> Result<()> {
        if self.is_running() {
            return Err(VibrometerError::Sensor(
                "estimator is already started".to_string(),
            ));
        }
        let mut samples = source.sample_stream().await?;
        info!(source = %source.name(), "starting vibration estimation");

        let quantizer = self.quantizer;
        let engine = self.engine;
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        self.driver = Some(tokio::spawn(async move {
            loop {
                match samples.recv().await {
                    Ok(raw) => {
                        if let Err(e) =
                            ingest_shared(&quantizer, &engine, &state, &events, raw.x, raw.y, raw.z)
                        {
                            warn!(error = %e, "rejected sensor sample");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "sensor stream lagged, samples dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("sensor stream closed, driver task exiting");
        }));
        Ok(())
    }

    /// Stop accepting samples. Last computed values remain readable.
    pub fn stop(&mut self) {
        if let Some(task) = self.driver.take() {
            task.abort();
            info!("stopped vibration estimation");
        }
    }

    /// Whether a driver task is currently consuming a sensor stream.
    pub fn is_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Register a listener for vibration events.
    pub fn subscribe(&self) -> broadcast::Receiver<VibrationEvent> {
        self.events.subscribe()
    }

    /// Stats from the last recompute, or `None` before the first accepted
    /// sample and after [`clear`](VibrationEstimator::clear).
    pub fn stats(&self) -> Option<ComputedStats> {
        lock_state(&self.state).stats
    }

    /// Per-axis mean of the last recompute, m/s².
    pub fn mean(&self) -> Option<[f64; 3]> {
        self.stats().map(|s| s.mean)
    }

    /// Per-axis corrected standard deviation of the last recompute, m/s².
    pub fn std_dev(&self) -> Option<[f64; 3]> {
        self.stats().map(|s| s.std_dev)
    }

    /// Scalar vibration value of the last recompute, mm/s².
    pub fn vibration(&self) -> Option<f64> {
        self.stats().map(|s| s.vibration)
    }

    /// Number of samples currently in the window.
    pub fn window_len(&self) -> usize {
        lock_state(&self.state).window.len()
    }
}

impl Drop for VibrationEstimator {
    fn drop(&mut self) {
        if let Some(task) = self.driver.take() {
            task.abort();
        }
    }
}

/// Lock the shared state. State transitions are applied atomically under the
/// lock, so a guard recovered from a poisoned mutex still holds consistent
/// data.
fn lock_state(state: &Mutex<EstimatorState>) -> std::sync::MutexGuard<'_, EstimatorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The core state transition, shared between [`VibrationEstimator::ingest`]
/// and the driver task.
fn ingest_shared(
    quantizer: &Quantizer,
    engine: &StatisticsEngine,
    state: &Mutex<EstimatorState>,
    events: &broadcast::Sender<VibrationEvent>,
    x: f64,
    y: f64,
    z: f64,
) -> Result<Option<VibrationEvent>> {
    for (axis, value) in [('x', x), ('y', y), ('z', z)] {
        if !quantizer.quantizable(value) {
            return Err(VibrometerError::InvalidSample { axis, value });
        }
    }
    let sample = [quantizer.scale(x), quantizer.scale(y), quantizer.scale(z)];

    let mut state = lock_state(state);
    state.window.push(sample);
    match engine.compute(&state.window, quantizer) {
        Some(stats) => {
            state.stats = Some(stats);
            drop(state);
            let event = VibrationEvent {
                timestamp: chrono::Utc::now(),
                vibration: stats.vibration,
            };
            // A send error only means no listener is currently subscribed.
            let _ = events.send(event);
            Ok(Some(event))
        }
        None => {
            // Empty window: reset derived state, emit nothing.
            state.window.clear();
            state.stats = None;
            Ok(None)
        }
    }
}

//! CLI entry point for vibrometer.
//!
//! Provides a command-line interface for:
//! - Monitoring vibration estimates from the mock accelerometer
//! - Inspecting the resolved configuration
//!
//! # Usage
//!
//! Monitor the mock sensor:
//! ```bash
//! vibrometer monitor --samples 100
//! ```
//!
//! Show the resolved configuration:
//! ```bash
//! vibrometer show-config --config config/default.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use vibrometer::config::Settings;
use vibrometer::sensor::mock::MockAccelerometer;
use vibrometer::{telemetry, SensorSource, VibrationEstimator};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "vibrometer")]
#[command(about = "Accelerometer-based vibration estimation", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the mock accelerometer through an estimator and print events
    Monitor {
        /// Number of vibration events to print (0 = run until interrupted)
        #[arg(long, default_value = "50")]
        samples: usize,
    },
    /// Print the resolved configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Monitor { samples } => monitor(settings, samples).await,
        Commands::ShowConfig => show_config(&settings),
    }
}

async fn monitor(settings: Settings, samples: usize) -> Result<()> {
    telemetry::init(&settings.application.log_level)?;
    let settings = Arc::new(settings);

    let mut estimator = VibrationEstimator::new(settings.estimator)?;
    let mut events = estimator.subscribe();

    let mut sensor = MockAccelerometer::new();
    sensor.connect(&settings).await?;
    estimator.start(&mut sensor).await?;

    let mut printed = 0usize;
    while samples == 0 || printed < samples {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => {
                    println!(
                        "{}  vibration = {:9.3} mm/s^2",
                        event.timestamp.format("%H:%M:%S%.3f"),
                        event.vibration
                    );
                    printed += 1;
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
        }
    }

    estimator.stop();
    sensor.disconnect().await?;

    if let Some(stats) = estimator.stats() {
        println!(
            "last mean    = [{:.4}, {:.4}, {:.4}] m/s^2",
            stats.mean[0], stats.mean[1], stats.mean[2]
        );
        println!(
            "last std_dev = [{:.4}, {:.4}, {:.4}] m/s^2",
            stats.std_dev[0], stats.std_dev[1], stats.std_dev[2]
        );
        println!("last vibration = {:.3} mm/s^2", stats.vibration);
    }
    Ok(())
}

fn show_config(settings: &Settings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

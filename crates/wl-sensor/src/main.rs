//! windows-logging module host.
//!
//! Registers the logging model, constructs every configured component and
//! prints their readings as JSON lines on stdout. Logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use wl_sensor::config::{DEFAULT_CONFIG_PATH, ModuleConfig};
use wl_sensor::poll::{self, SensorReport};
use wl_sensor::{Dependencies, ModelRegistry, Sensor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wl-sensor starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = ModuleConfig::from_file(&config_path)?;
    tracing::info!(
        path = %config_path,
        components = config.components.len(),
        "config loaded"
    );

    // ── Register models ─────────────────────────────────────────
    let registry = ModelRegistry::with_defaults();
    for (api, model) in registry.models() {
        tracing::info!(api, model = %model, "model registered");
    }

    // ── Construct components ────────────────────────────────────
    let deps = Dependencies::new();
    let mut sensors: Vec<Arc<dyn Sensor>> = Vec::with_capacity(config.components.len());
    for component in &config.components {
        let sensor = registry.construct(
            &component.api,
            &component.model,
            &component.name,
            component.attributes.clone(),
            &deps,
        )?;
        sensors.push(sensor);
    }

    // ── Read ────────────────────────────────────────────────────
    match config.poll_interval_secs {
        None => {
            for report in poll::poll_all(&sensors).await {
                emit(&report);
            }
        }
        Some(secs) => {
            tracing::info!(interval_secs = secs, "polling");
            tokio::select! {
                () = poll::run(&sensors, Duration::from_secs(secs.max(1)), emit) => {
                    tracing::error!("poll loop exited unexpectedly");
                }
                // Graceful shutdown on SIGINT
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received");
                }
            }
        }
    }

    for sensor in &sensors {
        sensor.close().await?;
    }

    tracing::info!("wl-sensor stopped");
    Ok(())
}

fn emit(report: &SensorReport) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!(sensor = %report.sensor, error = %e, "failed to encode report"),
    }
}

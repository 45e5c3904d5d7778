//! Standalone smoke-test CLI.
//!
//! Constructs one sensor with the default configuration and closes it.
//! Given an argument, uses it as `log_source` and prints a single reading.

use tracing_subscriber::EnvFilter;

use wl_log_tools::SourceConfig;
use wl_sensor::{Attributes, EventLogSensor, Sensor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(log_source) => SourceConfig {
            log_source,
            ..Default::default()
        },
        None => SourceConfig::default(),
    };
    let read = !config.log_source.is_empty();

    let sensor = EventLogSensor::new("cli", config);
    let result = if read {
        sensor.readings(&Attributes::new()).await
    } else {
        Ok(Attributes::new())
    };
    sensor.close().await?;

    let readings = result?;
    if read {
        println!("{}", serde_json::to_string_pretty(&readings)?);
    }
    Ok(())
}

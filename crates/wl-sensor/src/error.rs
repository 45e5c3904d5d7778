//! Sensor-level error types.

use thiserror::Error;
use wl_log_tools::LogError;

/// Errors surfaced to the sensor host.
#[derive(Debug, Error)]
pub enum SensorError {
    /// A hard file-mode failure from the log tools.
    #[error(transparent)]
    Log(#[from] LogError),

    #[error("sensor {0} is closed")]
    Closed(String),

    #[error("{0} not implemented")]
    NotImplemented(&'static str),

    #[error("invalid configuration for {name}: {message}")]
    Config { name: String, message: String },

    #[error("unknown model {model} for api {api}")]
    UnknownModel { api: String, model: String },
}

/// Convenience alias for sensor results.
pub type SensorResult<T> = Result<T, SensorError>;

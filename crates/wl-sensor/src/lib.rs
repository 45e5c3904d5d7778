//! Windows event log sensor: library crate for the module host.
//!
//! Re-exports all modules so external crates (e.g. `wl-e2e-tests`) can
//! build sensors through the same `ModelRegistry` the binaries use.

pub mod config;
pub mod error;
pub mod poll;
pub mod registry;
pub mod sensor;

pub use error::{SensorError, SensorResult};
pub use registry::{Dependencies, LOGGING_MODEL, Model, ModelRegistry, SENSOR_API};
pub use sensor::{Attributes, EventLogSensor, Sensor};

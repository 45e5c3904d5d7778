//! Maps `api` + `model` pairs to sensor constructors.
//!
//! The model identifier is a constant handed to `register` explicitly;
//! there is no process-wide registration table.

use std::collections::HashMap;
use std::sync::Arc;

use wl_log_tools::SourceConfig;

use crate::error::{SensorError, SensorResult};
use crate::sensor::{EventLogSensor, Sensor};

/// Component API implemented by every model here.
pub const SENSOR_API: &str = "rdk:component:sensor";

/// The windows-logging model.
pub const LOGGING_MODEL: Model = Model::new("jandj", "windows-logging", "logging");

/// A `namespace:family:name` model triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Model {
    pub namespace: &'static str,
    pub family: &'static str,
    pub name: &'static str,
}

impl Model {
    pub const fn new(namespace: &'static str, family: &'static str, name: &'static str) -> Self {
        Self {
            namespace,
            family,
            name,
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.family, self.name)
    }
}

/// Other resources a component may depend on, by name.
pub type Dependencies = HashMap<String, Arc<dyn Sensor>>;

/// Builds a sensor from its name, raw attributes and dependencies.
pub type Constructor = fn(&str, serde_json::Value, &Dependencies) -> SensorResult<Arc<dyn Sensor>>;

struct Registration {
    api: &'static str,
    model: Model,
    constructor: Constructor,
}

/// Registry of constructible models.
pub struct ModelRegistry {
    registrations: HashMap<(String, String), Registration>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    /// Registry with the windows-logging sensor registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SENSOR_API, LOGGING_MODEL, new_event_log_sensor);
        registry
    }

    pub fn register(&mut self, api: &'static str, model: Model, constructor: Constructor) {
        tracing::debug!(api, model = %model, "registering model");
        self.registrations.insert(
            (api.to_string(), model.to_string()),
            Registration {
                api,
                model,
                constructor,
            },
        );
    }

    /// Construct a component of `model` under `api`.
    pub fn construct(
        &self,
        api: &str,
        model: &str,
        name: &str,
        attributes: serde_json::Value,
        deps: &Dependencies,
    ) -> SensorResult<Arc<dyn Sensor>> {
        let registration = self
            .registrations
            .get(&(api.to_string(), model.to_string()))
            .ok_or_else(|| SensorError::UnknownModel {
                api: api.to_string(),
                model: model.to_string(),
            })?;
        (registration.constructor)(name, attributes, deps)
    }

    /// Every registered `(api, model)` pair.
    pub fn models(&self) -> Vec<(&'static str, Model)> {
        self.registrations
            .values()
            .map(|r| (r.api, r.model))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Constructor for `LOGGING_MODEL`. Dependencies are not used.
fn new_event_log_sensor(
    name: &str,
    attributes: serde_json::Value,
    _deps: &Dependencies,
) -> SensorResult<Arc<dyn Sensor>> {
    let attributes = if attributes.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        attributes
    };
    let config: SourceConfig =
        serde_json::from_value(attributes).map_err(|e| SensorError::Config {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    Ok(Arc::new(EventLogSensor::new(name, config)))
}

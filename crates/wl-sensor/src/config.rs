//! Module host configuration, loadable from TOML.

use serde::Deserialize;

use crate::registry::{LOGGING_MODEL, SENSOR_API};

/// Default config path for the module host.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/windows-logging/module.toml";

/// Top-level configuration for the module host.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleConfig {
    /// Seconds between polls. None takes a single reading and exits.
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    /// Components to construct through the model registry.
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

/// One configured component.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    /// Resource name (e.g., "win-logs").
    pub name: String,
    #[serde(default = "default_api")]
    pub api: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Model-specific attributes, passed to the constructor as JSON.
    #[serde(default = "default_attributes")]
    pub attributes: serde_json::Value,
}

fn default_api() -> String {
    SENSOR_API.to_string()
}

fn default_model() -> String {
    LOGGING_MODEL.to_string()
}

fn default_attributes() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl ModuleConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

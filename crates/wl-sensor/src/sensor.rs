//! The sensor a host constructs, reads and closes.
//!
//! Holds validated configuration and the two backends. Reads are independent
//! of one another; the only mutable state is the closed flag.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use wl_log_tools::{
    EventLogBackend, FileLogSource, LogError, LogMode, LogSource, PowerShellBackend, SourceConfig,
    ValidatedConfig, dispatch,
};
use wl_protocol::Readings;

use crate::error::{SensorError, SensorResult};

/// String-keyed dynamic map exchanged with the host.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// The host-facing sensor surface.
#[async_trait]
pub trait Sensor: Send + Sync {
    /// Resource name assigned by the host.
    fn name(&self) -> &str;

    /// Take one reading. `extra` is accepted for interface parity.
    async fn readings(&self, extra: &Attributes) -> SensorResult<Attributes>;

    /// Generic command hook.
    async fn do_command(&self, command: &Attributes) -> SensorResult<Attributes>;

    /// Release the sensor. Idempotent.
    async fn close(&self) -> SensorResult<()>;
}

/// Event log sensor backed by the live event log or a fixture file.
pub struct EventLogSensor {
    name: String,
    config: ValidatedConfig,
    files: Arc<dyn LogSource>,
    events: Arc<dyn EventLogBackend>,
    closed: AtomicBool,
}

impl EventLogSensor {
    /// Build with the filesystem and PowerShell backends. Performs no I/O.
    pub fn new(name: impl Into<String>, config: SourceConfig) -> Self {
        Self::with_backends(
            name,
            config,
            Arc::new(FileLogSource),
            Arc::new(PowerShellBackend::new()),
        )
    }

    /// Build with explicit backends.
    pub fn with_backends(
        name: impl Into<String>,
        config: SourceConfig,
        files: Arc<dyn LogSource>,
        events: Arc<dyn EventLogBackend>,
    ) -> Self {
        let name = name.into();
        let config = config.validate();
        tracing::info!(
            sensor = %name,
            log_channel = config.log_channel(),
            max_entries = config.max_entries(),
            log_source = config.log_source(),
            server = config.server().unwrap_or("localhost"),
            "initialized with configuration"
        );
        Self {
            name,
            config,
            files,
            events,
            closed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// The mode every read on this sensor will use.
    pub fn mode(&self) -> LogMode {
        LogMode::from_config(&self.config)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Typed read. Fails with `Closed` once `close` has been called.
    pub async fn read(&self) -> SensorResult<Readings> {
        if self.is_closed() {
            return Err(SensorError::Closed(self.name.clone()));
        }
        tracing::info!(
            sensor = %self.name,
            log_channel = self.config.log_channel(),
            log_source = self.config.log_source(),
            "readings called"
        );
        let readings = dispatch(&self.config, self.files.as_ref(), self.events.as_ref()).await?;
        Ok(readings)
    }
}

#[async_trait]
impl Sensor for EventLogSensor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn readings(&self, _extra: &Attributes) -> SensorResult<Attributes> {
        let readings = self.read().await?;
        readings
            .into_map()
            .map_err(|e| LogError::Encode(e.to_string()).into())
    }

    async fn do_command(&self, command: &Attributes) -> SensorResult<Attributes> {
        tracing::info!(sensor = %self.name, ?command, "do_command called");
        Err(SensorError::NotImplemented("DoCommand"))
    }

    async fn close(&self) -> SensorResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::info!(
                sensor = %self.name,
                log_channel = self.config.log_channel(),
                log_source = self.config.log_source(),
                "closing sensor"
            );
        }
        Ok(())
    }
}

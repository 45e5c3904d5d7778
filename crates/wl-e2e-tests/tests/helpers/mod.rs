//! Shared test harness for E2E integration tests.
//!
//! Sensors read real files from a temp directory through `FileLogSource`
//! and query a scripted `MockEventLog` in place of PowerShell.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use wl_log_tools::{FileLogSource, MockEventLog, SourceConfig};
use wl_sensor::EventLogSensor;

/// Fixture directory + event log mock shared by every sensor it builds.
pub struct TestHarness {
    pub dir: TempDir,
    pub events: Arc<MockEventLog>,
}

impl TestHarness {
    /// Harness whose event log has a 50-record "System" channel plus the
    /// Application/Setup/Security sample channels.
    pub fn new() -> Self {
        let mut events = MockEventLog::with_application_sample();
        events.add_channel("System", MockEventLog::system_records(50));
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            events: Arc::new(events),
        }
    }

    /// Write a fixture file into the temp directory and return its path.
    pub fn write_fixture(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    /// Sensor with the given attributes, file and event backends wired up.
    pub fn sensor(&self, config: SourceConfig) -> EventLogSensor {
        EventLogSensor::with_backends("e2e", config, Arc::new(FileLogSource), self.events.clone())
    }

    /// Sensor reading the fixture at `path`.
    pub fn file_sensor(&self, path: &Path) -> EventLogSensor {
        self.sensor(SourceConfig {
            log_source: path.to_string_lossy().into_owned(),
            ..Default::default()
        })
    }

    /// Sensor in live mode against `channel`.
    pub fn live_sensor(&self, channel: &str, max_entries: i64) -> EventLogSensor {
        self.sensor(SourceConfig {
            log_channel: channel.to_string(),
            max_entries,
            log_source: "live".to_string(),
            test_fixture: None,
            server: None,
        })
    }
}

/// Path to a fixture shipped in the repository's `example_logs/`.
pub fn repo_fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../example_logs")
        .join(name)
}

//! Mock backends for testing: in-memory fixtures and a scripted event log.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::DEFAULT_TEST_FIXTURE;
use crate::error::{LiveError, LogError, LogResult};
use crate::live::EventLogBackend;
use crate::source::LogSource;
use crate::types::NativeRecord;

/// A mock log source that serves pre-loaded content by path.
pub struct MockLogSource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Add a file with the given content.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Create a mock holding the default CSV fixture (3 rows).
    pub fn with_csv_sample() -> Self {
        let mut m = Self::new();
        m.add_file(
            DEFAULT_TEST_FIXTURE,
            "Time,Source,Message\n\
             2024-01-15 10:00:01,SawController,Blade engaged\n\
             2024-01-15 10:00:05,SawController,Blade speed nominal\n\
             2024-01-15 10:00:09,Handpiece,Vibration above threshold\n",
        );
        m
    }

    /// Create a mock with a JSON array fixture (4 objects).
    pub fn with_json_sample() -> Self {
        let mut m = Self::new();
        m.add_file(
            "example_logs/SawHandpieceLog.json",
            r#"[
  {"TimeGenerated":"2024-01-15T10:00:01Z","Source":"SawHandpiece","EventID":100,"EntryType":"Information","Message":"Handpiece connected"},
  {"TimeGenerated":"2024-01-15T10:00:04Z","Source":"SawHandpiece","EventID":210,"EntryType":"Warning","Message":"Motor temperature 71C"},
  {"TimeGenerated":"2024-01-15T10:00:07Z","Source":"SawHandpiece","EventID":500,"EntryType":"Error","Message":"Blade stall detected","Rpm":0},
  {"TimeGenerated":"2024-01-15T10:00:12Z","Source":"SawHandpiece","EventID":101,"EntryType":"Information","Message":"Handpiece disconnected"}
]"#,
        );
        m
    }
}

impl Default for MockLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn read_bytes(&self, path: &Path) -> LogResult<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LogError::NotFound(path.display().to_string()))
    }
}

// ── Event log mock ────────────────────────────────────────────

/// A scripted event log keyed by channel name.
///
/// Returns every scripted record for a channel regardless of the requested
/// limit, so the live reader's own truncation is what gets exercised.
/// Unknown channels fail the way `Get-EventLog` does.
pub struct MockEventLog {
    channels: HashMap<String, Vec<NativeRecord>>,
    failures: HashMap<String, LiveError>,
    queries: Mutex<Vec<(Option<String>, String, usize)>>,
}

impl MockEventLog {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            failures: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Script the records (newest first) returned for `channel`.
    pub fn add_channel(&mut self, channel: impl Into<String>, records: Vec<NativeRecord>) {
        self.channels.insert(channel.into(), records);
    }

    /// Make every query against `channel` fail with `error`.
    pub fn fail_channel(&mut self, channel: impl Into<String>, error: LiveError) {
        self.failures.insert(channel.into(), error);
    }

    /// Channel/limit pairs seen so far, in call order.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries
            .lock()
            .map(|q| q.iter().map(|(_, c, n)| (c.clone(), *n)).collect())
            .unwrap_or_default()
    }

    /// Server of every query so far, in call order.
    pub fn servers(&self) -> Vec<Option<String>> {
        self.queries
            .lock()
            .map(|q| q.iter().map(|(s, _, _)| s.clone()).collect())
            .unwrap_or_default()
    }

    /// A "System" channel holding `count` records, newest first, one minute apart.
    pub fn with_system_sample(count: usize) -> Self {
        let mut m = Self::new();
        m.add_channel("System", Self::system_records(count));
        m
    }

    /// `count` Service Control Manager records, newest first, one minute apart.
    pub fn system_records(count: usize) -> Vec<NativeRecord> {
        let newest = DateTime::from_timestamp(1_705_312_801, 0).unwrap_or_else(Utc::now);
        (0..count)
            .map(|i| {
                let time = newest - Duration::minutes(i as i64);
                sample_record(
                    time,
                    "Service Control Manager",
                    7036,
                    4,
                    &format!("Service state change #{i}\r\n"),
                )
            })
            .collect()
    }

    /// An "Application" channel with a mix of entry types, plus an empty
    /// "Setup" channel and a "Security" channel that denies access.
    pub fn with_application_sample() -> Self {
        let mut m = Self::new();
        let newest = DateTime::from_timestamp(1_705_312_801, 0).unwrap_or_else(Utc::now);
        m.add_channel(
            "Application",
            vec![
                sample_record(newest, "Application Error", 1000, 1, "Faulting application name: saw.exe"),
                sample_record(newest - Duration::seconds(30), "MsiInstaller", 11707, 4, "Product: SawSuite -- Installation completed successfully."),
                sample_record(newest - Duration::seconds(90), "ESENT", 455, 2, "svchost (1234) Error -1811 occurred while opening logfile"),
            ],
        );
        m.add_channel("Setup", Vec::new());
        m.fail_channel(
            "Security",
            LiveError::Exit {
                program: "powershell".into(),
                status: "exit status: 1".into(),
                stderr: "Get-EventLog : Requested registry access is not allowed.".into(),
            },
        );
        m
    }
}

impl Default for MockEventLog {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_record(
    time: DateTime<Utc>,
    source: &str,
    event_id: i64,
    entry_type: i64,
    message: &str,
) -> NativeRecord {
    NativeRecord {
        time_generated: json!(format!("/Date({})/", time.timestamp_millis())),
        source: Some(source.to_string()),
        event_id: Some(event_id),
        entry_type: json!(entry_type),
        message: Some(message.to_string()),
    }
}

#[async_trait]
impl EventLogBackend for MockEventLog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn query(
        &self,
        server: Option<&str>,
        channel: &str,
        max_entries: usize,
    ) -> Result<Vec<NativeRecord>, LiveError> {
        if let Ok(mut q) = self.queries.lock() {
            q.push((server.map(String::from), channel.to_string(), max_entries));
        }
        if let Some(err) = self.failures.get(channel) {
            return Err(err.clone());
        }
        self.channels.get(channel).cloned().ok_or_else(|| {
            LiveError::Unavailable(format!(
                "The event log '{channel}' on computer '.' does not exist."
            ))
        })
    }
}

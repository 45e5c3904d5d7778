//! Pick file mode or live mode from configuration alone.

use std::path::PathBuf;

use wl_protocol::Readings;

use crate::config::{TEST_SOURCE, ValidatedConfig};
use crate::error::LogResult;
use crate::file_reader;
use crate::live::{self, EventLogBackend};
use crate::source::LogSource;

/// Where a read will be served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
    /// Parse a CSV/JSON fixture.
    File(PathBuf),
    /// Query the live event log, on `server` when set.
    Live {
        server: Option<String>,
        channel: String,
        max_entries: usize,
    },
}

impl LogMode {
    /// `"test"` → built-in fixture, `*.csv` / `*.json` → that file, anything else → live.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let source = config.log_source();
        if source == TEST_SOURCE {
            Self::File(config.test_fixture().to_path_buf())
        } else if is_fixture_path(source) {
            Self::File(PathBuf::from(source))
        } else {
            Self::Live {
                server: config.server().map(String::from),
                channel: config.log_channel().to_string(),
                max_entries: config.max_entries(),
            }
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// Suffix check used for dispatch; case-sensitive.
pub fn is_fixture_path(source: &str) -> bool {
    source.ends_with(".csv") || source.ends_with(".json")
}

/// Serve one read.
///
/// File-mode failures are hard errors (a broken fixture). Live-mode failures
/// come back as an `error` state reading.
pub async fn dispatch(
    config: &ValidatedConfig,
    files: &dyn LogSource,
    events: &dyn EventLogBackend,
) -> LogResult<Readings> {
    match LogMode::from_config(config) {
        LogMode::File(path) => {
            tracing::info!(path = %path.display(), "entering test mode");
            let entries = file_reader::read_file(files, &path)
                .await
                .inspect_err(|e| {
                    tracing::error!(path = %path.display(), error = %e, "failed to parse test log file");
                })?;
            tracing::info!(count = entries.len(), "read test log entries");
            Ok(Readings::test(entries))
        }
        LogMode::Live {
            server,
            channel,
            max_entries,
        } => {
            tracing::info!(
                server = server.as_deref().unwrap_or("localhost"),
                channel = %channel,
                max_entries,
                "entering live mode"
            );
            Ok(live::read_live(events, server.as_deref(), &channel, max_entries).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_TEST_FIXTURE, SourceConfig};
    use crate::error::LogError;
    use crate::mock::{MockEventLog, MockLogSource};
    use wl_protocol::ReadingState;

    fn config(log_source: &str) -> ValidatedConfig {
        SourceConfig {
            log_channel: "System".into(),
            max_entries: 5,
            log_source: log_source.into(),
            test_fixture: None,
            server: None,
        }
        .validate()
    }

    #[test]
    fn test_keyword_uses_fixture() {
        assert_eq!(
            LogMode::from_config(&config("test")),
            LogMode::File(PathBuf::from(DEFAULT_TEST_FIXTURE))
        );
    }

    #[test]
    fn fixture_suffix_uses_literal_path() {
        assert_eq!(
            LogMode::from_config(&config("example_logs/SawHandpieceLog.json")),
            LogMode::File(PathBuf::from("example_logs/SawHandpieceLog.json"))
        );
        assert_eq!(
            LogMode::from_config(&config("C:\\logs\\saw.csv")),
            LogMode::File(PathBuf::from("C:\\logs\\saw.csv"))
        );
    }

    #[test]
    fn everything_else_is_live() {
        for source in ["live", "", "Application", "events.txt", "saw.CSV"] {
            let mode = LogMode::from_config(&config(source));
            assert_eq!(
                mode,
                LogMode::Live {
                    server: None,
                    channel: "System".into(),
                    max_entries: 5
                },
                "log_source {source:?}"
            );
            assert!(!mode.is_file());
        }
    }

    #[tokio::test]
    async fn dispatch_test_mode() {
        let files = MockLogSource::with_csv_sample();
        let events = MockEventLog::new();
        let readings = dispatch(&config("test"), &files, &events).await.unwrap();
        assert_eq!(readings.state, ReadingState::TestMode);
        assert_eq!(readings.entries.len(), 3);
        assert!(events.queries().is_empty(), "live backend must not be touched");
    }

    #[tokio::test]
    async fn dispatch_json_fixture() {
        let files = MockLogSource::with_json_sample();
        let events = MockEventLog::new();
        let readings = dispatch(&config("example_logs/SawHandpieceLog.json"), &files, &events)
            .await
            .unwrap();
        assert_eq!(readings.state, ReadingState::TestMode);
        let raw = readings.entries.as_raw().unwrap();
        assert_eq!(raw.len(), 4);
        assert_eq!(raw[2]["Rpm"], 0);
    }

    #[tokio::test]
    async fn dispatch_live_mode() {
        let files = MockLogSource::new();
        let events = MockEventLog::with_system_sample(50);
        let readings = dispatch(&config("live"), &files, &events).await.unwrap();
        assert_eq!(readings.state, ReadingState::LiveMode);
        assert_eq!(readings.entries.len(), 5);
    }

    #[tokio::test]
    async fn missing_fixture_is_hard_error() {
        let files = MockLogSource::new();
        let events = MockEventLog::new();
        let err = dispatch(&config("missing.csv"), &files, &events)
            .await
            .unwrap_err();
        assert!(matches!(err, LogError::NotFound(_)));
    }

    #[tokio::test]
    async fn dispatch_passes_server_to_backend() {
        let files = MockLogSource::new();
        let events = MockEventLog::with_system_sample(50);
        let config = SourceConfig {
            log_channel: "System".into(),
            max_entries: 5,
            log_source: "live".into(),
            test_fixture: None,
            server: Some("saw-controller-01".into()),
        }
        .validate();
        let readings = dispatch(&config, &files, &events).await.unwrap();
        assert_eq!(readings.state, ReadingState::LiveMode);
        assert_eq!(events.servers(), vec![Some("saw-controller-01".to_string())]);
    }

    #[tokio::test]
    async fn live_failure_is_soft() {
        let files = MockLogSource::new();
        let events = MockEventLog::new();
        let readings = dispatch(&config("live"), &files, &events).await.unwrap();
        assert_eq!(readings.state, ReadingState::Error);
        assert_eq!(readings.source.as_deref(), Some("System"));
    }
}

//! Source configuration and its validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Channel queried when none is configured.
pub const DEFAULT_LOG_CHANNEL: &str = "Application";
/// Live-mode record limit when none (or a non-positive one) is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 10;
/// `log_source` value selecting the live event log.
pub const LIVE_SOURCE: &str = "live";
/// Server names that mean "this machine".
const LOCAL_SERVERS: &[&str] = &["localhost", "."];
/// `log_source` value selecting the built-in fixture.
pub const TEST_SOURCE: &str = "test";
/// Fixture read when `log_source` is `"test"`, relative to the working directory.
pub const DEFAULT_TEST_FIXTURE: &str = "example_logs/000009999-synth 1.csv";

/// Raw sensor attributes as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Event log channel for live mode (e.g., "Application", "System").
    #[serde(default, alias = "log_type")]
    pub log_channel: String,
    /// Upper bound on live-mode records. Non-positive means "use the default".
    #[serde(default, alias = "num_entries")]
    pub max_entries: i64,
    /// `"live"`, `"test"`, or a path ending in `.csv` / `.json`.
    #[serde(default, alias = "logs")]
    pub log_source: String,
    /// Overrides the fixture used for `log_source = "test"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_fixture: Option<String>,
    /// Machine whose event log is read in live mode. Unset, empty,
    /// `localhost` and `.` all mean the local machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl SourceConfig {
    /// Fill in defaults. Never fails: every field has a fallback.
    pub fn validate(self) -> ValidatedConfig {
        let log_channel = if self.log_channel.trim().is_empty() {
            DEFAULT_LOG_CHANNEL.to_string()
        } else {
            self.log_channel
        };

        let max_entries = if self.max_entries <= 0 {
            DEFAULT_MAX_ENTRIES
        } else {
            usize::try_from(self.max_entries).unwrap_or(usize::MAX)
        };

        let log_source = if self.log_source.trim().is_empty() {
            LIVE_SOURCE.to_string()
        } else {
            self.log_source
        };

        let test_fixture = self
            .test_fixture
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEST_FIXTURE.to_string());

        let server = self
            .server
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && !LOCAL_SERVERS.iter().any(|l| s.eq_ignore_ascii_case(l)));

        ValidatedConfig {
            log_channel,
            max_entries,
            log_source,
            test_fixture: PathBuf::from(test_fixture),
            server,
        }
    }
}

/// Configuration with every default applied; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    log_channel: String,
    max_entries: usize,
    log_source: String,
    test_fixture: PathBuf,
    server: Option<String>,
}

impl ValidatedConfig {
    pub fn log_channel(&self) -> &str {
        &self.log_channel
    }

    /// Always at least 1.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn log_source(&self) -> &str {
        &self.log_source
    }

    pub fn test_fixture(&self) -> &Path {
        &self.test_fixture
    }

    /// Remote machine to query; `None` is the local machine.
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        SourceConfig::default().validate()
    }
}

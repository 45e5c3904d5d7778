use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized event log record, produced by every live-mode read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    /// Generation time of the event (RFC 3339, UTC). `None` when the
    /// backend reported a time that could not be parsed.
    pub time: Option<DateTime<Utc>>,
    /// Originating provider or subsystem (e.g., "Service Control Manager").
    pub source: String,
    /// Event identifier as shown by Event Viewer (low 16 bits).
    pub event_id: u32,
    /// Backend-defined severity name (e.g., "Information", "Warning", "Error").
    pub severity: String,
    /// Message text with surrounding whitespace removed.
    pub message: String,
}

impl CanonicalEntry {
    /// Placeholder emitted when a channel opened fine but had nothing to report.
    pub fn no_events(channel: &str) -> Self {
        Self {
            time: Some(Utc::now()),
            source: channel.to_string(),
            event_id: 0,
            severity: "Information".to_string(),
            message: format!("No events found in {channel} log"),
        }
    }
}

/// A file-mode record: column/key name to value, in source order.
///
/// CSV rows produce string values only; JSON fixtures keep their native types.
pub type RawEntry = serde_json::Map<String, serde_json::Value>;

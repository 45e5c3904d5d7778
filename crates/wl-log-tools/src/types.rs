//! Core log retrieval types: fixture formats and native event records.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LogError, LogResult};

// ── File Format ───────────────────────────────────────────────

/// Fixture formats understood by the file reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Header row followed by data rows.
    Csv,
    /// A single JSON array of objects.
    Json,
}

impl FileFormat {
    /// Pick the format from the path suffix, matching dispatch (case-sensitive,
    /// so `logs/.csv` is a CSV fixture).
    pub fn from_path(path: &Path) -> LogResult<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(".csv") {
            Ok(Self::Csv)
        } else if name.ends_with(".json") {
            Ok(Self::Json)
        } else {
            match path.extension() {
                Some(ext) => Err(LogError::UnsupportedExtension(format!(
                    ".{}",
                    ext.to_string_lossy()
                ))),
                None => Err(LogError::UnsupportedExtension(format!(
                    "(none) in {}",
                    path.display()
                ))),
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Native Record ─────────────────────────────────────────────

/// An event record as a live backend reports it, before normalization.
///
/// Field names follow `Get-EventLog | Select-Object ... | ConvertTo-Json`.
/// The pywin32 spellings (`SourceName`, `EventType`) are accepted too.
/// Time and entry type stay as raw JSON because PowerShell versions disagree
/// on their encoding (`/Date(ms)/`, ISO strings, wrapper objects, enum ints).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeRecord {
    #[serde(rename = "TimeGenerated", default)]
    pub time_generated: serde_json::Value,
    #[serde(rename = "Source", alias = "SourceName", default)]
    pub source: Option<String>,
    #[serde(rename = "EventID", default)]
    pub event_id: Option<i64>,
    #[serde(rename = "EntryType", alias = "EventType", default)]
    pub entry_type: serde_json::Value,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

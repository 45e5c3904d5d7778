//! Native event records to `CanonicalEntry`.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use wl_protocol::CanonicalEntry;

use crate::types::NativeRecord;

// Windows PowerShell 5.1 DateTime encoding: /Date(1705312801000)/ or /Date(1705312801000+0100)/
static RE_MS_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/Date\((-?\d+)([+-]\d{4})?\)/$").unwrap());

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Convert a backend record into the canonical five-field entry.
pub fn normalize(record: &NativeRecord) -> CanonicalEntry {
    CanonicalEntry {
        time: parse_time(&record.time_generated),
        source: record.source.clone().unwrap_or_default(),
        event_id: record.event_id.map(event_id_low_word).unwrap_or(0),
        severity: severity_name(&record.entry_type),
        message: record
            .message
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Event Viewer shows only the low 16 bits; the high bits carry facility flags.
pub fn event_id_low_word(raw: i64) -> u32 {
    (raw as u64 & 0xFFFF) as u32
}

/// Parse whatever shape a backend used for `TimeGenerated`.
pub fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_time_str(s.trim()),
        // ConvertTo-Json sometimes wraps DateTime as {"value": "/Date(..)/", "DateTime": "..."}
        Value::Object(map) => map.get("value").and_then(parse_time),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn parse_time_str(s: &str) -> Option<DateTime<Utc>> {
    if let Some(caps) = RE_MS_DATE.captures(s) {
        // The offset suffix is informational; the millis are already UTC.
        let millis: i64 = caps[1].parse().ok()?;
        return DateTime::from_timestamp_millis(millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // pywin32 renders "2024-01-15 10:00:01+00:00"
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

/// Map an `EntryType` / `EventType` value onto its display name.
pub fn severity_name(value: &Value) -> String {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(entry_type_name)
            .unwrap_or("Unknown")
            .to_string(),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(code) => entry_type_name(code).to_string(),
            Err(_) if s.trim().is_empty() => "Unknown".to_string(),
            Err(_) => s.trim().to_string(),
        },
        Value::Object(map) => map
            .get("value")
            .map(severity_name)
            .unwrap_or_else(|| "Unknown".to_string()),
        _ => "Unknown".to_string(),
    }
}

/// `System.Diagnostics.EventLogEntryType` values (same as Win32 `EVENTLOG_*_TYPE`).
fn entry_type_name(code: i64) -> &'static str {
    match code {
        0 | 4 => "Information",
        1 => "Error",
        2 => "Warning",
        8 => "SuccessAudit",
        16 => "FailureAudit",
        _ => "Unknown",
    }
}

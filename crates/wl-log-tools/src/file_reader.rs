//! CSV and JSON fixtures into raw entries.
//!
//! Records are passed through as ordered key/value maps; no attempt is made
//! to coerce them into the canonical entry shape.

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use wl_protocol::RawEntry;

use crate::error::{LogError, LogResult};
use crate::source::LogSource;
use crate::types::FileFormat;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a fixture and parse it according to its extension.
pub async fn read_file(source: &dyn LogSource, path: &Path) -> LogResult<Vec<RawEntry>> {
    let bytes = source.read_bytes(path).await?;
    let format = FileFormat::from_path(path)?;
    tracing::debug!(path = %path.display(), %format, bytes = bytes.len(), "parsing fixture");
    parse_bytes(format, &bytes)
}

/// Parse fixture content in the given format.
pub fn parse_bytes(format: FileFormat, bytes: &[u8]) -> LogResult<Vec<RawEntry>> {
    // Windows tooling likes to prepend a BOM.
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match format {
        FileFormat::Csv => parse_csv(bytes),
        FileFormat::Json => parse_json(bytes),
    }
}

/// Header row, then one map per data row. Rows whose width differs from the
/// header are rejected.
pub fn parse_csv(bytes: &[u8]) -> LogResult<Vec<RawEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        return Err(LogError::Csv {
            line: 1,
            message: "missing header row".into(),
        });
    }

    let mut seen = HashSet::new();
    for name in headers.iter() {
        if !seen.insert(name) {
            return Err(LogError::Csv {
                line: 1,
                message: format!("duplicate column {name:?}"),
            });
        }
    }

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let entry: RawEntry = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();
        entries.push(entry);
    }
    Ok(entries)
}

/// A single JSON array whose elements are all objects.
pub fn parse_json(bytes: &[u8]) -> LogResult<Vec<RawEntry>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| LogError::Json(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(LogError::InvalidFormat(format!(
            "expected a JSON array of objects, found {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(LogError::InvalidFormat(format!(
                "element {i} is {}, expected an object",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn csv_error(e: csv::Error) -> LogError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    let message = match e.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("row has {len} fields, header has {expected_len}"),
        _ => e.to_string(),
    };
    LogError::Csv { line, message }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Error tiers for log retrieval.
//!
//! `LogError` is the hard tier: a broken fixture or a defect, returned to the
//! caller as `Err`. `LiveError` is the soft tier: it never leaves the live
//! reader and ends up inside an `error` state reading instead.

use thiserror::Error;

/// Hard failures that propagate to the caller.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("could not open log file: {0}")]
    NotFound(String),

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("CSV parse error on line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("failed to parse JSON file: {0}")]
    Json(String),

    #[error("invalid log data format: {0}")]
    InvalidFormat(String),

    #[error("failed to encode readings: {0}")]
    Encode(String),
}

/// Convenience alias for hard-tier results.
pub type LogResult<T> = Result<T, LogError>;

/// Live backend failures, captured into the reading rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiveError {
    #[error("invalid log channel name: {0:?}")]
    InvalidChannel(String),

    #[error("invalid server name: {0:?}")]
    InvalidServer(String),

    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("event log query timed out after {0}s")]
    Timeout(u64),

    #[error("failed to parse PowerShell JSON output: {0}")]
    Parse(String),

    #[error("event log unavailable: {0}")]
    Unavailable(String),
}

//! Query an OS event log channel and normalize the result.
//!
//! Every failure on this path is soft: it comes back as an `error` state
//! reading, never as `Err`, so a polling caller keeps running.

pub mod powershell;

use async_trait::async_trait;

use wl_protocol::{CanonicalEntry, Readings};

use crate::error::LiveError;
use crate::normalize::normalize;
use crate::types::NativeRecord;

pub use powershell::PowerShellBackend;

/// A way of fetching recent records from a named event log channel.
#[async_trait]
pub trait EventLogBackend: Send + Sync {
    /// Short backend name for log fields (e.g., "powershell").
    fn name(&self) -> &str;

    /// Fetch up to `max_entries` of the most recent records, newest first,
    /// from `server` (`None` is the local machine).
    ///
    /// Backends may return more than asked; the reader truncates.
    async fn query(
        &self,
        server: Option<&str>,
        channel: &str,
        max_entries: usize,
    ) -> Result<Vec<NativeRecord>, LiveError>;
}

/// Read the newest `max_entries` records of `channel`.
///
/// An empty result is replaced by a single "no events found" entry so that
/// "healthy but quiet" stays distinguishable from a failed query.
pub async fn read_live(
    backend: &dyn EventLogBackend,
    server: Option<&str>,
    channel: &str,
    max_entries: usize,
) -> Readings {
    let mut records = match backend.query(server, channel, max_entries).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(
                backend = backend.name(),
                server = server.unwrap_or("localhost"),
                channel,
                error = %e,
                "event log query failed"
            );
            return Readings::error(e.to_string(), channel);
        }
    };

    records.truncate(max_entries);
    let mut entries: Vec<CanonicalEntry> = records.iter().map(normalize).collect();

    if entries.is_empty() {
        tracing::info!(channel, "no events found");
        entries.push(CanonicalEntry::no_events(channel));
    } else {
        tracing::debug!(channel, count = entries.len(), "read live event log entries");
    }

    Readings::live(entries)
}

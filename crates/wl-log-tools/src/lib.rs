//! Log source dispatch for the windows-logging sensor.
//!
//! Decides from configuration alone whether a read goes to the live Windows
//! event log (through PowerShell) or to a CSV/JSON fixture file, normalizes
//! native event records, and wraps the outcome in a `Readings` envelope.
//! `LogSource` and `EventLogBackend` keep both paths mockable.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod file_reader;
pub mod live;
pub mod mock;
pub mod normalize;
pub mod source;
pub mod types;

// Re-export key types for convenience
pub use config::{SourceConfig, ValidatedConfig};
pub use dispatch::{LogMode, dispatch};
pub use error::{LiveError, LogError, LogResult};
pub use live::{EventLogBackend, PowerShellBackend, read_live};
pub use mock::{MockEventLog, MockLogSource};
pub use source::{FileLogSource, LogSource};
pub use types::{FileFormat, NativeRecord};

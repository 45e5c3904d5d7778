//! Log source abstraction: read fixture files from disk or from memory.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{LogError, LogResult};

/// Abstraction over where fixture bytes come from.
///
/// `FileLogSource` hits the filesystem; `MockLogSource` serves in-memory
/// content so the file reader can be tested without touching disk.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Read the whole file at `path`.
    async fn read_bytes(&self, path: &Path) -> LogResult<Vec<u8>>;
}

/// Reads fixture files from the local filesystem.
pub struct FileLogSource;

#[async_trait]
impl LogSource for FileLogSource {
    async fn read_bytes(&self, path: &Path) -> LogResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogError::NotFound(path.display().to_string())
            } else {
                LogError::Io(format!("{}: {e}", path.display()))
            }
        })
    }
}

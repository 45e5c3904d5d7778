//! PowerShell event log backend (`Get-EventLog` in a child process).
//!
//! The channel name is validated and single-quoted before it reaches the
//! script; output is read as `ConvertTo-Json -Compress`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::process::Command;

use crate::error::LiveError;
use crate::live::EventLogBackend;
use crate::types::NativeRecord;

/// Maximum stdout accepted from PowerShell (1 MB).
const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Subprocess timeout.
const TIMEOUT: Duration = Duration::from_secs(10);

/// `Get-EventLog` reports an empty log as an error with this text.
const NO_MATCHES: &str = "No matches found";

pub struct PowerShellBackend {
    program: String,
    timeout: Duration,
}

impl PowerShellBackend {
    pub fn new() -> Self {
        Self {
            program: "powershell".to_string(),
            timeout: TIMEOUT,
        }
    }

    /// Use a different executable (e.g., a full path to `powershell.exe`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PowerShellBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Classic event log names: letters, digits, spaces and `-_./`.
pub fn is_valid_channel_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name.len() <= 256
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.' | '/'))
}

/// Host names, NetBIOS names and IP addresses.
pub fn is_valid_server_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// Build the script passed to `powershell -Command`.
///
/// `-Newest` is an `Int32` parameter, so the limit is clamped to fit.
pub fn build_script(server: Option<&str>, channel: &str, max_entries: usize) -> String {
    let max_entries = max_entries.min(i32::MAX as usize);
    let computer = server
        .map(|s| format!(" -ComputerName '{s}'"))
        .unwrap_or_default();
    format!(
        "Get-EventLog -LogName '{channel}'{computer} -Newest {max_entries} | \
         Select-Object TimeGenerated, Source, EventID, EntryType, Message | \
         ConvertTo-Json -Compress"
    )
}

/// Decode `ConvertTo-Json` output.
///
/// PowerShell emits nothing for zero results and unwraps single-element
/// arrays into a bare object.
pub fn parse_output(stdout: &str) -> Result<Vec<NativeRecord>, LiveError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| LiveError::Parse(e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            return Err(LiveError::Parse(format!(
                "expected an object or array, got {other}"
            )));
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| LiveError::Parse(e.to_string())))
        .collect()
}

#[async_trait]
impl EventLogBackend for PowerShellBackend {
    fn name(&self) -> &str {
        "powershell"
    }

    async fn query(
        &self,
        server: Option<&str>,
        channel: &str,
        max_entries: usize,
    ) -> Result<Vec<NativeRecord>, LiveError> {
        if !is_valid_channel_name(channel) {
            return Err(LiveError::InvalidChannel(channel.to_string()));
        }
        if let Some(server) = server.filter(|s| !is_valid_server_name(s)) {
            return Err(LiveError::InvalidServer(server.to_string()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(build_script(server, channel, max_entries))
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(LiveError::Spawn {
                    program: self.program.clone(),
                    message: e.to_string(),
                });
            }
            Err(_) => return Err(LiveError::Timeout(self.timeout.as_secs())),
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            if stderr.contains(NO_MATCHES) {
                return Ok(Vec::new());
            }
            let stderr = stderr.trim();
            return Err(LiveError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: if stderr.is_empty() {
                    "(no error output)".to_string()
                } else {
                    stderr.to_string()
                },
            });
        }

        // The cap is checked after the child exits; stdout is already buffered.
        if output.stdout.len() > MAX_OUTPUT_BYTES {
            return Err(LiveError::Parse(format!(
                "output exceeds {MAX_OUTPUT_BYTES} bytes"
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let records = parse_output(&stdout)?;
        tracing::debug!(channel, count = records.len(), "powershell returned records");
        Ok(records)
    }
}

use serde::{Deserialize, Serialize};

use crate::entry::{CanonicalEntry, RawEntry};

/// Which path produced a reading. Callers branch on this and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingState {
    /// Entries came from the live OS event log.
    LiveMode,
    /// Entries came from a CSV/JSON fixture file.
    TestMode,
    /// The live backend failed; `error` and `source` describe why.
    Error,
}

impl ReadingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LiveMode => "live_mode",
            Self::TestMode => "test_mode",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ReadingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry payload of a reading.
///
/// Serialized as a plain JSON array in both cases. The variant cannot be told
/// from the array alone, so only `Readings` deserializes it, using `state`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entries {
    Canonical(Vec<CanonicalEntry>),
    Raw(Vec<RawEntry>),
}

impl Entries {
    pub fn len(&self) -> usize {
        match self {
            Self::Canonical(v) => v.len(),
            Self::Raw(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_canonical(&self) -> Option<&[CanonicalEntry]> {
        match self {
            Self::Canonical(v) => Some(v),
            Self::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[RawEntry]> {
        match self {
            Self::Raw(v) => Some(v),
            Self::Canonical(_) => None,
        }
    }
}

/// Result envelope returned by every read.
///
/// The payload always lives under `entries`, whatever the state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readings {
    pub state: ReadingState,
    pub entries: Entries,
    /// Failure description (only set when `state` is `error`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Log channel the failure relates to (only set when `state` is `error`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Wire form of `Readings` before `state` has picked the entry shape.
#[derive(Deserialize)]
struct ReadingsRepr {
    state: ReadingState,
    #[serde(default)]
    entries: Vec<RawEntry>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

impl<'de> Deserialize<'de> for Readings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = ReadingsRepr::deserialize(deserializer)?;
        let entries = match repr.state {
            // Fixture rows are kept verbatim, whatever their keys.
            ReadingState::TestMode => Entries::Raw(repr.entries),
            ReadingState::LiveMode | ReadingState::Error => Entries::Canonical(
                repr.entries
                    .into_iter()
                    .map(|row| serde_json::from_value(serde_json::Value::Object(row)))
                    .collect::<Result<_, _>>()
                    .map_err(serde::de::Error::custom)?,
            ),
        };
        Ok(Self {
            state: repr.state,
            entries,
            error: repr.error,
            source: repr.source,
        })
    }
}

impl Readings {
    pub fn live(entries: Vec<CanonicalEntry>) -> Self {
        Self {
            state: ReadingState::LiveMode,
            entries: Entries::Canonical(entries),
            error: None,
            source: None,
        }
    }

    pub fn test(entries: Vec<RawEntry>) -> Self {
        Self {
            state: ReadingState::TestMode,
            entries: Entries::Raw(entries),
            error: None,
            source: None,
        }
    }

    pub fn error(error: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            state: ReadingState::Error,
            entries: Entries::Canonical(Vec::new()),
            error: Some(error.into()),
            source: Some(source.into()),
        }
    }

    /// Flatten into the string-keyed map handed to sensor hosts.
    pub fn into_map(self) -> Result<serde_json::Map<String, serde_json::Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "readings serialized to non-object: {other}"
            ))),
        }
    }
}

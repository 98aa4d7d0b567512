use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// What the log reader delivers, one signal per discovered file or
/// appended line, in per-file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReaderSignal {
    Discovery(Discovery),
    Line(LineSignal),
}

/// First sight of a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    pub session_id: String,
    /// Set for sub-agent files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub project: String,
    pub source: String,
}

/// One newly appended line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSignal {
    pub line: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub source: String,
}

impl ReaderSignal {
    /// Decode one newline-delimited JSON signal.
    pub fn from_json(text: &str) -> Result<Self, SignalError> {
        serde_json::from_str(text).map_err(|err| SignalError::Decode {
            line: err.line(),
            column: err.column(),
        })
    }

    pub fn session_id(&self) -> &str {
        match self {
            ReaderSignal::Discovery(d) => &d.session_id,
            ReaderSignal::Line(l) => &l.session_id,
        }
    }
}

impl From<Discovery> for ReaderSignal {
    fn from(discovery: Discovery) -> Self {
        ReaderSignal::Discovery(discovery)
    }
}

impl From<LineSignal> for ReaderSignal {
    fn from(line: LineSignal) -> Self {
        ReaderSignal::Line(line)
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Agent tools whose logs can be ingested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    ClaudeCode,
    Codex,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ClaudeCode => "claude-code",
            Source::Codex => "codex",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a source tag names no known adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown source: {0}")]
pub struct UnknownSourceError(pub String);

impl std::str::FromStr for Source {
    type Err = UnknownSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" | "claude-code" | "claude_code" | "claudecode" => Ok(Source::ClaudeCode),
            "codex" => Ok(Source::Codex),
            _ => Err(UnknownSourceError(s.to_string())),
        }
    }
}

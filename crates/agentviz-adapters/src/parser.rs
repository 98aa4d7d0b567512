//! Record parser: raw log text in, tagged source record out.

use agentviz_events::Source;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::claude::ClaudeRecord;
use crate::codex::CodexRecord;

/// One raw line as delivered by the reader.
#[derive(Debug, Clone, Copy)]
pub struct RawLine<'a> {
    pub line: &'a str,
    pub session_id: &'a str,
    pub agent_id: Option<&'a str>,
    pub source: &'a str,
}

/// Identifiers injected into every parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEnvelope {
    pub session_id: String,
    pub agent_id: Option<String>,
    pub source: Source,
}

/// A record validated against its source's schema.
#[derive(Debug, Clone)]
pub enum SourceRecord {
    ClaudeCode(ClaudeRecord),
    Codex(CodexRecord),
}

#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub envelope: RecordEnvelope,
    pub record: SourceRecord,
}

/// Why a line was dropped.
///
/// Serde's own message is not kept because it can quote the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Empty record")]
    Empty,

    #[error("No adapter for source: {0}")]
    UnknownSource(String),

    #[error("Malformed {adapter} record ({category} error at line {line}, column {column})")]
    Malformed {
        adapter: Source,
        category: &'static str,
        line: usize,
        column: usize,
    },
}

/// Parse one raw line into a tagged record.
pub fn parse_record(raw: RawLine<'_>) -> Result<ParsedRecord, RecordError> {
    let text = raw.line.trim();
    if text.is_empty() {
        return Err(RecordError::Empty);
    }

    let source: Source = raw
        .source
        .parse()
        .map_err(|_| RecordError::UnknownSource(raw.source.to_string()))?;

    let record = match source {
        Source::ClaudeCode => SourceRecord::ClaudeCode(from_text(source, text)?),
        Source::Codex => SourceRecord::Codex(from_text(source, text)?),
    };

    Ok(ParsedRecord {
        envelope: RecordEnvelope {
            session_id: raw.session_id.to_string(),
            agent_id: raw
                .agent_id
                .filter(|id| !id.trim().is_empty())
                .map(String::from),
            source,
        },
        record,
    })
}

/// Parse a line, logging and dropping anything unusable.
pub fn parse_line(raw: RawLine<'_>) -> Option<ParsedRecord> {
    match parse_record(raw) {
        Ok(record) => Some(record),
        Err(RecordError::Empty) => {
            debug!(session_id = raw.session_id, "Skipping empty record");
            None
        }
        Err(e) => {
            warn!(
                session_id = raw.session_id,
                source = raw.source,
                line_len = raw.line.len(),
                "Dropping record: {}",
                e
            );
            None
        }
    }
}

fn from_text<T: DeserializeOwned>(source: Source, text: &str) -> Result<T, RecordError> {
    serde_json::from_str(text).map_err(|err| RecordError::Malformed {
        adapter: source,
        category: match err.classify() {
            serde_json::error::Category::Io => "io",
            serde_json::error::Category::Syntax => "syntax",
            serde_json::error::Category::Data => "data",
            serde_json::error::Category::Eof => "eof",
        },
        line: err.line(),
        column: err.column(),
    })
}

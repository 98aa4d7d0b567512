//! # agentviz-adapters
//!
//! Turns raw agent log lines into privacy-safe [`NormalizedEvent`]s.
//!
//! ## Key Types
//!
//! - [`RawLine`] / [`parse_record`] - Parse one line into a tagged [`SourceRecord`]
//! - [`SourceAdapter`] - Pure per-source mapping to normalized events
//! - [`ClaudeCodeAdapter`] / [`CodexAdapter`] - The supported sources
//!
//! ## Example
//!
//! ```
//! use agentviz_adapters::{adapt, parse_record, RawLine};
//!
//! let parsed = parse_record(RawLine {
//!     line: r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"t1","name":"Read","input":{"file_path":"/home/me/app/main.rs"}}]}}"#,
//!     session_id: "s1",
//!     agent_id: None,
//!     source: "claude",
//! })
//! .unwrap();
//! let events = adapt(&parsed);
//! assert_eq!(events[0].as_tool().unwrap().context.as_deref(), Some("main.rs"));
//! ```

pub mod claude;
pub mod codex;
mod parser;
pub mod privacy;
mod tools;
mod traits;

pub use agentviz_events::{NormalizedEvent, Source};
pub use claude::{ClaudeCodeAdapter, ClaudeRecord};
pub use codex::{CodexAdapter, CodexRecord};
pub use parser::{
    parse_line, parse_record, ParsedRecord, RawLine, RecordEnvelope, RecordError, SourceRecord,
};
pub use tools::{ToolInvocation, ToolMapping, DEFAULT_AGENT_ROLE};
pub use traits::SourceAdapter;

/// Run a parsed record through its source's adapter.
pub fn adapt(parsed: &ParsedRecord) -> Vec<NormalizedEvent> {
    match &parsed.record {
        SourceRecord::ClaudeCode(record) => ClaudeCodeAdapter.adapt(&parsed.envelope, record),
        SourceRecord::Codex(record) => CodexAdapter.adapt(&parsed.envelope, record),
    }
}

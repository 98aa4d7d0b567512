use agentviz_events::{EventContext, NormalizedEvent, Source};
use serde::de::DeserializeOwned;

use crate::parser::RecordEnvelope;

/// A pure mapping from one agent tool's raw log schema to normalized events.
///
/// Implementations hold no state, perform no I/O and never fail: records
/// with nothing worth reporting map to an empty vector.
pub trait SourceAdapter {
    /// The source's tagged record type, validated by the parser.
    type Record: DeserializeOwned;

    /// The source this adapter handles
    fn source(&self) -> Source;

    /// Human-readable name of the adapter (e.g., "Claude Code")
    fn name(&self) -> &str;

    fn adapt(&self, envelope: &RecordEnvelope, record: &Self::Record) -> Vec<NormalizedEvent>;
}

impl RecordEnvelope {
    /// Event context for a record, stamped with its own timestamp when it
    /// has a readable one.
    pub fn context(&self, timestamp: Option<&str>) -> EventContext {
        EventContext::new(self.session_id.clone())
            .with_agent(self.agent_id.clone())
            .at(agentviz_events::timestamp_or_now(timestamp))
    }
}

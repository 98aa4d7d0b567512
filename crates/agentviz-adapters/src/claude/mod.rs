//! Claude Code transcript adapter.

mod schema;
mod tools;

pub use schema::{
    ClaudeRecord, ContentBlock, Message, MessageContent, MessageRecord, StampedRecord,
    SystemRecord, Usage,
};

use agentviz_events::{ActivityAction, EventContext, NormalizedEvent, Severity, Source, TokenUsage};
use tracing::debug;

use crate::parser::RecordEnvelope;
use crate::privacy::{is_no_content, result_is_error};
use crate::tools::result_event;
use crate::traits::SourceAdapter;

const END_TURN: &str = "end_turn";

/// Adapter for Claude Code session transcripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeCodeAdapter;

impl ClaudeCodeAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAdapter for ClaudeCodeAdapter {
    type Record = ClaudeRecord;

    fn source(&self) -> Source {
        Source::ClaudeCode
    }

    fn name(&self) -> &str {
        "Claude Code"
    }

    fn adapt(&self, envelope: &RecordEnvelope, record: &ClaudeRecord) -> Vec<NormalizedEvent> {
        match record {
            ClaudeRecord::Assistant(message) => assistant_events(envelope, message),
            ClaudeRecord::User(message) => user_events(envelope, message),
            ClaudeRecord::Summary(stamp) => {
                vec![envelope.context(stamp.timestamp.as_deref()).summary()]
            }
            ClaudeRecord::System(system) => {
                let severity = match system.level.as_deref() {
                    Some("error") => Severity::Error,
                    Some("warning") => Severity::Warning,
                    _ => return Vec::new(),
                };
                vec![envelope.context(system.timestamp.as_deref()).error(severity)]
            }
            ClaudeRecord::Progress
            | ClaudeRecord::FileHistorySnapshot
            | ClaudeRecord::QueueOperation
            | ClaudeRecord::Unknown => Vec::new(),
        }
    }
}

fn assistant_events(envelope: &RecordEnvelope, record: &MessageRecord) -> Vec<NormalizedEvent> {
    let Some(message) = &record.message else {
        return Vec::new();
    };
    let ctx = envelope.context(record.timestamp.as_deref());
    let mut tokens = message.usage.and_then(token_usage);
    let mut events = Vec::new();

    match &message.content {
        Some(MessageContent::Text(text)) => {
            if let Some(action) = text_activity(text) {
                events.push(ctx.activity(action, tokens.take()));
            }
        }
        Some(MessageContent::Blocks(blocks)) => {
            for block in blocks {
                assistant_block(&ctx, block, &mut tokens, &mut events);
            }
        }
        None => {}
    }

    if message.stop_reason.as_deref() == Some(END_TURN) {
        events.push(ctx.activity(ActivityAction::Waiting, tokens.take()));
    }
    events
}

fn assistant_block(
    ctx: &EventContext,
    block: &ContentBlock,
    tokens: &mut Option<TokenUsage>,
    events: &mut Vec<NormalizedEvent>,
) {
    match block {
        ContentBlock::Text { text } => {
            if let Some(action) = text.as_deref().and_then(text_activity) {
                events.push(ctx.activity(action, tokens.take()));
            }
        }
        ContentBlock::Thinking | ContentBlock::RedactedThinking => {
            events.push(ctx.activity(ActivityAction::Thinking, tokens.take()));
        }
        ContentBlock::ToolUse { id, name, input } => {
            let Some(id) = id.as_deref().filter(|id| !id.trim().is_empty()) else {
                debug!(session_id = %ctx.session_id, "Skipping tool_use block without id");
                return;
            };
            let name = name.as_deref().unwrap_or_default();
            events.extend(tools::invocation(name, input).started_events(ctx, id));
        }
        ContentBlock::ToolResult { .. } | ContentBlock::Other => {}
    }
}

fn user_events(envelope: &RecordEnvelope, record: &MessageRecord) -> Vec<NormalizedEvent> {
    if record.is_meta.unwrap_or(false) {
        return Vec::new();
    }
    let Some(content) = record.message.as_ref().and_then(|m| m.content.as_ref()) else {
        return Vec::new();
    };
    let ctx = envelope.context(record.timestamp.as_deref());

    match content {
        MessageContent::Text(text) if !text.trim().is_empty() => {
            vec![ctx.activity(ActivityAction::UserPrompt, None)]
        }
        MessageContent::Text(_) => Vec::new(),
        MessageContent::Blocks(blocks) => {
            let mut events = Vec::new();
            let mut prompted = false;
            for block in blocks {
                match block {
                    ContentBlock::Text { text: Some(text) } if !text.trim().is_empty() => {
                        if !prompted {
                            events.push(ctx.activity(ActivityAction::UserPrompt, None));
                            prompted = true;
                        }
                    }
                    ContentBlock::ToolResult {
                        tool_use_id: Some(id),
                        content,
                        is_error,
                    } if !id.trim().is_empty() => {
                        let failed = result_is_error(is_error.unwrap_or(false), content);
                        events.push(result_event(&ctx, id, failed));
                    }
                    _ => {}
                }
            }
            events
        }
    }
}

/// Blank text carries nothing; the sentinel reads as thinking.
fn text_activity(text: &str) -> Option<ActivityAction> {
    if text.trim().is_empty() {
        None
    } else if is_no_content(text) {
        Some(ActivityAction::Thinking)
    } else {
        Some(ActivityAction::Responding)
    }
}

fn token_usage(usage: Usage) -> Option<TokenUsage> {
    if usage.input_tokens.is_none() && usage.output_tokens.is_none() {
        return None;
    }
    Some(TokenUsage {
        input: usage.input_tokens.unwrap_or(0),
        output: usage.output_tokens.unwrap_or(0),
        cache_read: usage.cache_read_input_tokens,
        cache_write: usage.cache_creation_input_tokens,
    })
}

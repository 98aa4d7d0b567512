//! Codex rollout adapter.

mod schema;
mod tools;

pub use schema::{
    CodexContentItem, CodexEnvelope, CodexEventMsg, CodexRecord, CodexResponseItem, CodexStamp,
    CodexTokenUsage, TokenCountInfo,
};

use agentviz_events::{
    ActivityAction, EventContext, NormalizedEvent, Severity, Source, TokenUsage, ToolCategory,
    ToolStatus,
};
use serde_json::Value;
use tracing::debug;

use crate::parser::RecordEnvelope;
use crate::privacy::{is_no_content, result_is_error};
use crate::tools::result_event;
use crate::traits::SourceAdapter;

const ASSISTANT_ROLE: &str = "assistant";
const FAILED_STATUSES: [&str; 2] = ["failed", "incomplete"];

/// Adapter for Codex CLI rollout files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodexAdapter;

impl CodexAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAdapter for CodexAdapter {
    type Record = CodexRecord;

    fn source(&self) -> Source {
        Source::Codex
    }

    fn name(&self) -> &str {
        "Codex"
    }

    fn adapt(&self, envelope: &RecordEnvelope, record: &CodexRecord) -> Vec<NormalizedEvent> {
        match record {
            CodexRecord::ResponseItem(item) => {
                let ctx = envelope.context(item.timestamp.as_deref());
                response_item_events(&ctx, &item.payload)
            }
            CodexRecord::EventMsg(msg) => {
                let ctx = envelope.context(msg.timestamp.as_deref());
                event_msg_events(&ctx, &msg.payload)
            }
            CodexRecord::Compacted(stamp) => {
                vec![envelope.context(stamp.timestamp.as_deref()).summary()]
            }
            CodexRecord::SessionMeta | CodexRecord::TurnContext | CodexRecord::Unknown => {
                Vec::new()
            }
        }
    }
}

fn response_item_events(ctx: &EventContext, item: &CodexResponseItem) -> Vec<NormalizedEvent> {
    match item {
        CodexResponseItem::Message { role, content } => {
            if role.as_deref() != Some(ASSISTANT_ROLE) {
                return Vec::new();
            }
            let texts: Vec<&str> = content
                .iter()
                .filter_map(|part| match part {
                    CodexContentItem::OutputText { text: Some(text) } if !text.trim().is_empty() => {
                        Some(text.as_str())
                    }
                    _ => None,
                })
                .collect();
            if texts.is_empty() {
                return Vec::new();
            }
            let action = if texts.iter().all(|text| is_no_content(text)) {
                ActivityAction::Thinking
            } else {
                ActivityAction::Responding
            };
            vec![ctx.activity(action, None)]
        }
        CodexResponseItem::Reasoning => vec![ctx.activity(ActivityAction::Thinking, None)],
        CodexResponseItem::FunctionCall {
            name,
            arguments,
            call_id,
        } => {
            let Some(call_id) = present(call_id) else {
                debug!(session_id = %ctx.session_id, "Skipping function_call without call_id");
                return Vec::new();
            };
            let arguments = tools::decode_arguments(arguments.as_deref());
            tools::invocation(name.as_deref().unwrap_or_default(), &arguments, None)
                .started_events(ctx, call_id)
        }
        CodexResponseItem::CustomToolCall {
            name,
            input,
            call_id,
        } => {
            let Some(call_id) = present(call_id) else {
                debug!(session_id = %ctx.session_id, "Skipping custom_tool_call without call_id");
                return Vec::new();
            };
            tools::invocation(
                name.as_deref().unwrap_or_default(),
                &Value::Null,
                input.as_deref(),
            )
            .started_events(ctx, call_id)
        }
        CodexResponseItem::LocalShellCall { call_id, id } => {
            let Some(call_id) = present(call_id).or_else(|| present(id)) else {
                debug!(session_id = %ctx.session_id, "Skipping local_shell_call without id");
                return Vec::new();
            };
            tools::invocation(tools::LOCAL_SHELL, &Value::Null, None).started_events(ctx, call_id)
        }
        CodexResponseItem::FunctionCallOutput { call_id, output } => match present(call_id) {
            Some(call_id) => vec![result_event(ctx, call_id, output_failed(output, None))],
            None => Vec::new(),
        },
        CodexResponseItem::CustomToolCallOutput {
            call_id,
            output,
            status,
        } => match present(call_id) {
            Some(call_id) => vec![result_event(
                ctx,
                call_id,
                output_failed(output, status.as_deref()),
            )],
            None => Vec::new(),
        },
        CodexResponseItem::WebSearchCall { id, status } => {
            let search_id = present(id)
                .map(String::from)
                .unwrap_or_else(|| format!("web_search_{}", ctx.timestamp.timestamp_millis()));
            let mut events = tools::invocation(tools::WEB_SEARCH, &Value::Null, None)
                .started_events(ctx, &search_id);
            if status.as_deref() == Some("completed") {
                events.push(ctx.tool(
                    ToolCategory::Search,
                    Some("web_search".to_string()),
                    ToolStatus::Completed,
                    search_id,
                    None,
                ));
            }
            events
        }
        CodexResponseItem::Unknown => Vec::new(),
    }
}

fn event_msg_events(ctx: &EventContext, msg: &CodexEventMsg) -> Vec<NormalizedEvent> {
    match msg {
        CodexEventMsg::UserMessage { message } => match message {
            Some(text) if !text.trim().is_empty() => {
                vec![ctx.activity(ActivityAction::UserPrompt, None)]
            }
            _ => Vec::new(),
        },
        CodexEventMsg::TokenCount { info } => {
            let Some(usage) = info.as_ref().and_then(|i| i.last_token_usage) else {
                return Vec::new();
            };
            let tokens = TokenUsage {
                input: usage.input_tokens,
                output: usage.output_tokens,
                cache_read: usage.cached_input_tokens,
                cache_write: None,
            };
            vec![ctx.activity(ActivityAction::Responding, Some(tokens))]
        }
        CodexEventMsg::TaskComplete => vec![
            ctx.activity(ActivityAction::Waiting, None),
            ctx.summary(),
        ],
        CodexEventMsg::Error => vec![ctx.error(Severity::Error)],
        CodexEventMsg::StreamError | CodexEventMsg::TurnAborted => {
            vec![ctx.error(Severity::Warning)]
        }
        CodexEventMsg::Unknown => Vec::new(),
    }
}

/// Result status: explicit `success: false`, a failed status, or the
/// `Error` substring anywhere in the output.
fn output_failed(output: &Value, status: Option<&str>) -> bool {
    let explicit = output.get("success").and_then(Value::as_bool) == Some(false)
        || status.is_some_and(|s| FAILED_STATUSES.contains(&s));
    result_is_error(explicit, output)
}

fn present(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|id| !id.trim().is_empty())
}

//! Raw Codex rollout records (`~/.codex/sessions/**/rollout-*.jsonl`).
//!
//! Every line is `{"timestamp", "type", "payload"}`; the payload carries its
//! own `type` tag. Payload kinds this adapter does not know deserialize to
//! `Unknown` instead of failing the line.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodexRecord {
    SessionMeta,
    TurnContext,
    ResponseItem(CodexEnvelope<CodexResponseItem>),
    EventMsg(CodexEnvelope<CodexEventMsg>),
    Compacted(CodexStamp),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodexEnvelope<T: Default> {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub payload: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodexStamp {
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodexResponseItem {
    Message {
        #[serde(default)]
        role: Option<String>,
        #[serde(default)]
        content: Vec<CodexContentItem>,
    },
    Reasoning,
    FunctionCall {
        #[serde(default)]
        name: Option<String>,
        /// JSON-encoded argument object.
        #[serde(default)]
        arguments: Option<String>,
        #[serde(default)]
        call_id: Option<String>,
    },
    CustomToolCall {
        #[serde(default)]
        name: Option<String>,
        /// Free-form input, e.g. a patch body.
        #[serde(default)]
        input: Option<String>,
        #[serde(default)]
        call_id: Option<String>,
    },
    LocalShellCall {
        #[serde(default)]
        call_id: Option<String>,
        #[serde(default)]
        id: Option<String>,
    },
    FunctionCallOutput {
        #[serde(default)]
        call_id: Option<String>,
        #[serde(default)]
        output: Value,
    },
    CustomToolCallOutput {
        #[serde(default)]
        call_id: Option<String>,
        #[serde(default)]
        output: Value,
        #[serde(default)]
        status: Option<String>,
    },
    WebSearchCall {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        status: Option<String>,
    },
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodexContentItem {
    OutputText {
        #[serde(default)]
        text: Option<String>,
    },
    InputText {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodexEventMsg {
    UserMessage {
        #[serde(default)]
        message: Option<String>,
    },
    TokenCount {
        #[serde(default)]
        info: Option<TokenCountInfo>,
    },
    TaskComplete,
    Error,
    StreamError,
    TurnAborted,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenCountInfo {
    #[serde(default)]
    pub last_token_usage: Option<CodexTokenUsage>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CodexTokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cached_input_tokens: Option<u64>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Source;

/// A single normalized activity event.
///
/// Serializes flat: the envelope fields sit next to the payload's `type` tag
/// and variant fields. Optional fields are omitted, never `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl NormalizedEvent {
    /// The payload's wire tag (`session`, `tool`, ...).
    pub fn kind(&self) -> &'static str {
        match self.payload {
            EventPayload::Session(_) => "session",
            EventPayload::Activity(_) => "activity",
            EventPayload::Tool(_) => "tool",
            EventPayload::Agent(_) => "agent",
            EventPayload::Error(_) => "error",
            EventPayload::Summary => "summary",
        }
    }

    pub fn as_tool(&self) -> Option<&ToolPayload> {
        match &self.payload {
            EventPayload::Tool(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_agent(&self) -> Option<&AgentPayload> {
        match &self.payload {
            EventPayload::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    pub fn as_session(&self) -> Option<&SessionPayload> {
        match &self.payload {
            EventPayload::Session(session) => Some(session),
            _ => None,
        }
    }

    pub fn as_activity(&self) -> Option<&ActivityPayload> {
        match &self.payload {
            EventPayload::Activity(activity) => Some(activity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Session(SessionPayload),
    Activity(ActivityPayload),
    Tool(ToolPayload),
    Agent(AgentPayload),
    Error(ErrorPayload),
    /// Turn boundary marker
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub action: SessionAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Started,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    pub action: ActivityAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Thinking,
    Responding,
    Waiting,
    UserPrompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPayload {
    pub tool: ToolCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub status: ToolStatus,
    pub tool_use_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Coarse tool classification used by clients for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    FileRead,
    FileWrite,
    Terminal,
    Search,
    Plan,
    Communicate,
    SpawnAgent,
    Notebook,
    Other,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::FileRead => "file_read",
            ToolCategory::FileWrite => "file_write",
            ToolCategory::Terminal => "terminal",
            ToolCategory::Search => "search",
            ToolCategory::Plan => "plan",
            ToolCategory::Communicate => "communicate",
            ToolCategory::SpawnAgent => "spawn_agent",
            ToolCategory::Notebook => "notebook",
            ToolCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Started,
    Completed,
    Error,
}

impl ToolStatus {
    /// True for the two terminal states a tool result can report.
    pub fn is_finished(&self) -> bool {
        matches!(self, ToolStatus::Completed | ToolStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPayload {
    pub action: AgentAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentAction {
    Spawned,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

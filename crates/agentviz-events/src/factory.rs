use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    ActivityAction, ActivityPayload, AgentAction, AgentPayload, ErrorPayload, EventPayload,
    NormalizedEvent, SessionAction, SessionPayload, Severity, Source, TokenUsage, ToolCategory,
    ToolPayload, ToolStatus,
};

/// Shared envelope for events produced from one record.
///
/// Every constructor mints a fresh event id; the session, agent and
/// timestamp are copied from the context.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub session_id: String,
    pub agent_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl EventContext {
    /// Context stamped with the current time.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            agent_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_agent(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = non_empty(agent_id);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn event(&self, payload: EventPayload) -> NormalizedEvent {
        NormalizedEvent {
            id: Uuid::new_v4().to_string(),
            session_id: self.session_id.clone(),
            timestamp: self.timestamp,
            agent_id: self.agent_id.clone(),
            payload,
        }
    }

    pub fn session(
        &self,
        action: SessionAction,
        project: Option<String>,
        source: Option<Source>,
    ) -> NormalizedEvent {
        self.event(EventPayload::Session(SessionPayload {
            action,
            project: non_empty(project),
            source,
        }))
    }

    pub fn activity(&self, action: ActivityAction, tokens: Option<TokenUsage>) -> NormalizedEvent {
        self.event(EventPayload::Activity(ActivityPayload { action, tokens }))
    }

    pub fn tool(
        &self,
        tool: ToolCategory,
        detail: Option<String>,
        status: ToolStatus,
        tool_use_id: impl Into<String>,
        context: Option<String>,
    ) -> NormalizedEvent {
        self.event(EventPayload::Tool(ToolPayload {
            tool,
            detail: non_empty(detail),
            status,
            tool_use_id: tool_use_id.into(),
            context: non_empty(context),
        }))
    }

    /// Agent lifecycle event. `agent_id` names the agent the event is about,
    /// which for spawns is the spawning tool-use id, not the record's author.
    pub fn agent(
        &self,
        action: AgentAction,
        agent_id: impl Into<String>,
        agent_role: Option<String>,
    ) -> NormalizedEvent {
        let mut event = self.event(EventPayload::Agent(AgentPayload {
            action,
            agent_role: non_empty(agent_role),
        }));
        event.agent_id = non_empty(Some(agent_id.into()));
        event
    }

    pub fn error(&self, severity: Severity) -> NormalizedEvent {
        self.event(EventPayload::Error(ErrorPayload { severity }))
    }

    pub fn summary(&self) -> NormalizedEvent {
        self.event(EventPayload::Summary)
    }
}

/// Collapse empty or whitespace-only strings to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse an RFC 3339 record timestamp, falling back to now when it is
/// missing or unreadable.
pub fn timestamp_or_now(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

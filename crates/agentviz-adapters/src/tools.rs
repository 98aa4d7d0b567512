use agentviz_events::{AgentAction, EventContext, NormalizedEvent, ToolCategory, ToolStatus};

/// Role used when a spawn command does not name one.
pub const DEFAULT_AGENT_ROLE: &str = "general-purpose";

/// One row of a source's tool category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolMapping {
    pub category: ToolCategory,
    pub detail: &'static str,
}

impl ToolMapping {
    pub const fn new(category: ToolCategory, detail: &'static str) -> Self {
        Self { category, detail }
    }
}

/// A tool invocation reduced to what may leave the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub category: ToolCategory,
    pub detail: String,
    pub context: Option<String>,
    /// Set when the invocation spawns a sub-agent.
    pub spawn_role: Option<String>,
}

impl ToolInvocation {
    pub fn mapped(mapping: ToolMapping, context: Option<String>) -> Self {
        Self {
            category: mapping.category,
            detail: mapping.detail.to_string(),
            context,
            spawn_role: None,
        }
    }

    /// Fallback for names missing from the table. The raw name is the only
    /// verbatim input that crosses the boundary.
    pub fn unmapped(name: &str) -> Self {
        Self {
            category: ToolCategory::Other,
            detail: name.to_string(),
            context: None,
            spawn_role: None,
        }
    }

    pub fn spawning(mut self, role: Option<&str>) -> Self {
        let role = role
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_AGENT_ROLE);
        self.spawn_role = Some(role.to_string());
        self
    }

    /// `Tool{started}` followed by `Agent{spawned}` for spawn commands.
    pub fn started_events(self, ctx: &EventContext, tool_use_id: &str) -> Vec<NormalizedEvent> {
        let mut out = Vec::with_capacity(2);
        out.push(ctx.tool(
            self.category,
            Some(self.detail),
            ToolStatus::Started,
            tool_use_id,
            self.context,
        ));
        if let Some(role) = self.spawn_role {
            out.push(ctx.agent(AgentAction::Spawned, tool_use_id, Some(role)));
        }
        out
    }
}

/// Result events do not name their tool; clients join them on `toolUseId`.
pub fn result_event(ctx: &EventContext, tool_use_id: &str, is_error: bool) -> NormalizedEvent {
    let status = if is_error {
        ToolStatus::Error
    } else {
        ToolStatus::Completed
    };
    ctx.tool(ToolCategory::Other, None, status, tool_use_id, None)
}

use agentviz_adapters::{adapt, parse_line, RawLine};
use agentviz_events::{
    AgentAction, EventChannel, EventContext, EventPayload, NormalizedEvent, Source, ToolCategory,
    ToolStatus,
};
use agentviz_sessions::{lock_registry, RegistryState, SessionRegistry, SharedRegistry};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::signal::{Discovery, LineSignal, ReaderSignal};

/// Project name for sessions whose lines arrive before any discovery.
pub const UNKNOWN_PROJECT: &str = "unknown";

/// Reader signals in, normalized events out.
///
/// Parser, adapters and registry run synchronously inside [`handle`]
/// under one registry lock, so a reaper sweep never lands in the middle of
/// a record.
///
/// [`handle`]: Pipeline::handle
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: SharedRegistry,
    channel: EventChannel,
}

impl Pipeline {
    /// Pipeline with a fresh registry emitting on `channel`.
    pub fn new(channel: EventChannel) -> Self {
        Self {
            registry: SessionRegistry::new(channel.clone()).into_shared(),
            channel,
        }
    }

    /// Pipeline over an existing registry, emitting on the registry's channel.
    pub fn with_registry(registry: SharedRegistry) -> Self {
        let channel = lock_registry(&registry).channel().clone();
        Self { registry, channel }
    }

    /// Shared handle for the reaper.
    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NormalizedEvent> {
        self.channel.subscribe()
    }

    /// Process one signal. Returns the record-derived events, which are
    /// also emitted on the channel along with any session lifecycle events.
    pub fn handle(&self, signal: &ReaderSignal) -> Vec<NormalizedEvent> {
        match signal {
            ReaderSignal::Discovery(discovery) => {
                self.discover(discovery);
                Vec::new()
            }
            ReaderSignal::Line(line) => self.ingest(line),
        }
    }

    pub fn snapshot(&self) -> RegistryState {
        lock_registry(&self.registry).get_state()
    }

    fn discover(&self, discovery: &Discovery) {
        let source = match discovery.source.parse::<Source>() {
            Ok(source) => Some(source),
            Err(e) => {
                warn!(session_id = %discovery.session_id, "Discovered log with {}", e);
                None
            }
        };
        let session_id = discovery.session_id.as_str();
        let mut registry = lock_registry(&self.registry);

        registry.register_session(session_id, &discovery.project, None, source);
        if let Some(file_agent_id) = present(&discovery.agent_id) {
            registry.correlate_agent_file(session_id, file_agent_id);
            let resolved = registry.resolve_agent_id(session_id, file_agent_id);
            // A spawn whose result already arrived stays bound but inactive.
            let active =
                resolved == file_agent_id || registry.is_task_pending(session_id, &resolved);
            if active {
                registry.register_session(session_id, &discovery.project, Some(&resolved), source);
            } else {
                debug!(session_id, agent_id = %resolved, "Agent file for finished spawn");
            }
        }
        registry.record_activity(session_id);
    }

    fn ingest(&self, signal: &LineSignal) -> Vec<NormalizedEvent> {
        let Some(parsed) = parse_line(RawLine {
            line: &signal.line,
            session_id: &signal.session_id,
            agent_id: signal.agent_id.as_deref(),
            source: &signal.source,
        }) else {
            return Vec::new();
        };

        let session_id = signal.session_id.as_str();
        let mut registry = lock_registry(&self.registry);

        if !registry.contains(session_id) {
            debug!(session_id, "Line for undiscovered session");
            registry.register_session(
                session_id,
                UNKNOWN_PROJECT,
                None,
                Some(parsed.envelope.source),
            );
        }
        registry.record_activity(session_id);

        let author = present(&signal.agent_id).map(|id| registry.resolve_agent_id(session_id, id));
        let mut out = Vec::new();

        for mut event in adapt(&parsed) {
            // Agent events name the agent they are about.
            if event.as_agent().is_none() {
                event.agent_id = author.clone();
            }

            let Some(tool) = event.as_tool() else {
                out.push(event);
                continue;
            };
            let tool_use_id = tool.tool_use_id.clone();

            if tool.tool == ToolCategory::SpawnAgent && tool.status == ToolStatus::Started {
                registry.track_task_spawn(session_id, &tool_use_id);
                // The session exists, so only the spawned agent is added.
                registry.register_session(session_id, UNKNOWN_PROJECT, Some(&tool_use_id), None);
                out.push(event);
            } else if tool.status.is_finished()
                && registry.handle_task_result(session_id, &tool_use_id)
            {
                let action = if tool.status == ToolStatus::Error {
                    AgentAction::Error
                } else {
                    AgentAction::Completed
                };
                if let EventPayload::Tool(tool) = &mut event.payload {
                    tool.tool = ToolCategory::SpawnAgent;
                }
                let finished = EventContext {
                    session_id: session_id.to_string(),
                    agent_id: event.agent_id.clone(),
                    timestamp: event.timestamp,
                }
                .agent(action, tool_use_id.as_str(), None);

                registry.agent_completed(session_id, &tool_use_id);
                out.push(event);
                out.push(finished);
            } else {
                out.push(event);
            }
        }

        self.channel.emit_all(out.iter().cloned());
        out
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(EventChannel::default())
    }
}

fn present(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|id| !id.trim().is_empty())
}

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use agentviz_events::{EventChannel, EventContext, SessionAction, Source};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::correlation::FileCorrelation;
use crate::types::{RegistryState, SessionState};

/// Registry shared between the record path and the reaper.
///
/// The lock is never held across an `.await`, so every registry operation
/// is atomic with respect to the other.
pub type SharedRegistry = Arc<Mutex<SessionRegistry>>;

/// Lock a shared registry. A poisoned lock is recovered: every registry
/// operation either fully commits or changes nothing.
pub fn lock_registry(registry: &SharedRegistry) -> MutexGuard<'_, SessionRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns every [`SessionState`] and the spawn correlation tables.
///
/// Operations on unknown sessions, agents or tool-use ids are no-ops (or
/// return the identity), never errors. Session lifecycle events go out on
/// the registry's [`EventChannel`].
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: BTreeMap<String, SessionState>,
    channel: EventChannel,
}

impl SessionRegistry {
    pub fn new(channel: EventChannel) -> Self {
        Self {
            sessions: BTreeMap::new(),
            channel,
        }
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    /// Create the session on first sight and emit `Session.started`.
    ///
    /// Later calls only add `agent_id` to the active set; project and
    /// source keep their first values.
    pub fn register_session(
        &mut self,
        session_id: &str,
        project: &str,
        agent_id: Option<&str>,
        source: Option<Source>,
    ) -> &SessionState {
        let state = match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!(session_id, project, "Session started");
                self.channel.emit(EventContext::new(session_id).session(
                    SessionAction::Started,
                    Some(project.to_string()),
                    source,
                ));
                entry.insert(SessionState::new(
                    session_id.to_string(),
                    project.to_string(),
                    source,
                    Utc::now(),
                ))
            }
        };
        if let Some(agent_id) = agent_id.filter(|id| !id.trim().is_empty()) {
            state.agent_ids.insert(agent_id.to_string());
        }
        state
    }

    pub fn record_activity(&mut self, session_id: &str) {
        self.record_activity_at(session_id, Utc::now());
    }

    /// Advance `last_event_at`; it never moves backwards.
    pub fn record_activity_at(&mut self, session_id: &str, at: DateTime<Utc>) {
        if let Some(state) = self.sessions.get_mut(session_id) {
            if at > state.last_event_at {
                state.last_event_at = at;
            }
        }
    }

    /// Emit `Session.ended` and purge the session.
    pub fn remove_session(&mut self, session_id: &str) -> Option<SessionState> {
        let state = self.sessions.remove(session_id)?;
        info!(session_id, project = %state.project, "Session ended");
        self.channel.emit(EventContext::new(session_id).session(
            SessionAction::Ended,
            Some(state.project.clone()),
            state.source,
        ));
        Some(state)
    }

    /// Record a pending spawn and drain one deferred sub-agent file
    /// against it.
    pub fn track_task_spawn(&mut self, session_id: &str, tool_use_id: &str) {
        let Some(state) = self.sessions.get_mut(session_id) else {
            return;
        };
        state.pending_task_ids.insert(tool_use_id.to_string());
        if let Some(binding) = state.correlator.track_spawn(tool_use_id) {
            debug!(
                session_id,
                file_agent_id = %binding.file_agent_id,
                tool_use_id = %binding.tool_use_id,
                "Deferred agent file bound"
            );
            if state.agent_ids.remove(&binding.file_agent_id) {
                state.agent_ids.insert(binding.tool_use_id);
            }
        }
    }

    /// Bind a sub-agent file to the oldest pending spawn, or defer it.
    pub fn correlate_agent_file(&mut self, session_id: &str, file_agent_id: &str) {
        let Some(state) = self.sessions.get_mut(session_id) else {
            return;
        };
        match state.correlator.correlate_file(file_agent_id) {
            FileCorrelation::Bound(binding) => debug!(
                session_id,
                file_agent_id = %binding.file_agent_id,
                tool_use_id = %binding.tool_use_id,
                "Agent file bound"
            ),
            FileCorrelation::Deferred => {
                debug!(session_id, file_agent_id, "Agent file deferred")
            }
            FileCorrelation::Known => {}
        }
    }

    /// The spawn id a file is bound to, or the file id itself.
    pub fn resolve_agent_id(&self, session_id: &str, file_agent_id: &str) -> String {
        self.sessions
            .get(session_id)
            .and_then(|state| state.correlator.resolve(file_agent_id))
            .unwrap_or(file_agent_id)
            .to_string()
    }

    /// Clear a pending spawn; returns whether it was pending.
    pub fn handle_task_result(&mut self, session_id: &str, tool_use_id: &str) -> bool {
        self.sessions
            .get_mut(session_id)
            .is_some_and(|state| state.pending_task_ids.remove(tool_use_id))
    }

    pub fn is_task_pending(&self, session_id: &str, tool_use_id: &str) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(|state| state.pending_task_ids.contains(tool_use_id))
    }

    /// Drop an agent from the active set and release its file binding.
    pub fn agent_completed(&mut self, session_id: &str, agent_id: &str) {
        let Some(state) = self.sessions.get_mut(session_id) else {
            return;
        };
        state.agent_ids.remove(agent_id);
        if let Some(file_agent_id) = state.correlator.release(agent_id) {
            debug!(session_id, agent_id, %file_agent_id, "Agent binding released");
        }
    }

    pub fn get_state(&self) -> RegistryState {
        RegistryState {
            sessions: self.sessions.values().map(SessionState::snapshot).collect(),
        }
    }

    /// Remove every session idle for longer than `ttl`, through
    /// [`remove_session`](Self::remove_session). Returns the removed ids.
    pub fn reap_idle(&mut self, now: DateTime<Utc>, ttl: Duration) -> Vec<String> {
        let expired: Vec<String> = self
            .sessions
            .values()
            .filter(|state| {
                now.signed_duration_since(state.last_event_at)
                    .to_std()
                    .is_ok_and(|idle| idle > ttl)
            })
            .map(|state| state.session_id.clone())
            .collect();

        for session_id in &expired {
            debug!(session_id = %session_id, "Reaping idle session");
            self.remove_session(session_id);
        }
        expired
    }

    pub fn session(&self, session_id: &str) -> Option<&SessionState> {
        self.sessions.get(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(EventChannel::default())
    }
}

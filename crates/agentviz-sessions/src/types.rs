use std::collections::BTreeSet;

use agentviz_events::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::correlation::SpawnCorrelator;

/// Live state of one session, owned by the registry.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    /// Set at first registration.
    pub project: String,
    pub source: Option<Source>,
    pub last_event_at: DateTime<Utc>,
    /// Active sub-agents, in resolved form.
    pub agent_ids: BTreeSet<String>,
    /// Spawn tool-use ids whose result has not arrived yet.
    pub pending_task_ids: BTreeSet<String>,
    pub(crate) correlator: SpawnCorrelator,
}

impl SessionState {
    pub(crate) fn new(
        session_id: String,
        project: String,
        source: Option<Source>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            project,
            source,
            last_event_at: now,
            agent_ids: BTreeSet::new(),
            pending_task_ids: BTreeSet::new(),
            correlator: SpawnCorrelator::new(),
        }
    }

    /// Read-only view of the correlation tables.
    pub fn correlator(&self) -> &SpawnCorrelator {
        &self.correlator
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            project: self.project.clone(),
            source: self.source,
            last_event_at: self.last_event_at,
            agent_ids: self.agent_ids.iter().cloned().collect(),
            pending_task_ids: self.pending_task_ids.iter().cloned().collect(),
        }
    }
}

/// Point-in-time view of one session for late-joining consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    pub last_event_at: DateTime<Utc>,
    pub agent_ids: Vec<String>,
    pub pending_task_ids: Vec<String>,
}

/// Snapshot of every live session, ordered by session id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryState {
    pub sessions: Vec<SessionSnapshot>,
}

impl RegistryState {
    pub fn session(&self, session_id: &str) -> Option<&SessionSnapshot> {
        self.sessions.iter().find(|s| s.session_id == session_id)
    }
}

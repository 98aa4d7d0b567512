//! FIFO pairing of spawn commands with sub-agent log files.
//!
//! A spawn command (a tool-use id) and the sub-agent file it produces
//! (a file agent id) arrive independently and in either order. The Nth
//! spawn binds to the Nth distinct file.
//!
//! Queue membership means "unresolved", map membership means "resolved".
//! At most one of the two queues is non-empty at any time: whichever side
//! arrives while the other side has a waiting entry is bound immediately.

use std::collections::{HashMap, VecDeque};

/// A resolved pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub file_agent_id: String,
    pub tool_use_id: String,
}

/// Outcome of offering a sub-agent file to the correlator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCorrelation {
    /// Paired with the oldest waiting spawn.
    Bound(Binding),
    /// No spawn is waiting; the file is queued.
    Deferred,
    /// Already bound or queued; nothing changed.
    Known,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnCorrelator {
    pending_spawns: VecDeque<String>,
    deferred_files: VecDeque<String>,
    bindings: HashMap<String, String>,
}

impl SpawnCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a spawn, then drain one deferred file against it if any is
    /// waiting. Re-tracking a queued or bound spawn is a no-op.
    pub fn track_spawn(&mut self, tool_use_id: &str) -> Option<Binding> {
        let known = self.pending_spawns.iter().any(|id| id == tool_use_id)
            || self.bindings.values().any(|id| id == tool_use_id);
        if known {
            return None;
        }
        self.pending_spawns.push_back(tool_use_id.to_string());
        self.drain()
    }

    /// Bind a file to the oldest waiting spawn, or defer it.
    pub fn correlate_file(&mut self, file_agent_id: &str) -> FileCorrelation {
        if self.bindings.contains_key(file_agent_id)
            || self.deferred_files.iter().any(|id| id == file_agent_id)
        {
            return FileCorrelation::Known;
        }
        self.deferred_files.push_back(file_agent_id.to_string());
        match self.drain() {
            Some(binding) => FileCorrelation::Bound(binding),
            None => FileCorrelation::Deferred,
        }
    }

    /// The spawn id a file is bound to.
    pub fn resolve(&self, file_agent_id: &str) -> Option<&str> {
        self.bindings.get(file_agent_id).map(String::as_str)
    }

    /// Drop the binding whose spawn id is `tool_use_id`, returning the file
    /// it was bound to.
    pub fn release(&mut self, tool_use_id: &str) -> Option<String> {
        let file_agent_id = self
            .bindings
            .iter()
            .find(|(_, bound)| bound.as_str() == tool_use_id)
            .map(|(file, _)| file.clone())?;
        self.bindings.remove(&file_agent_id);
        Some(file_agent_id)
    }

    pub fn pending_spawns(&self) -> usize {
        self.pending_spawns.len()
    }

    pub fn deferred_files(&self) -> usize {
        self.deferred_files.len()
    }

    pub fn bindings(&self) -> usize {
        self.bindings.len()
    }

    /// The single path that moves entries from the queues into the map.
    fn drain(&mut self) -> Option<Binding> {
        if self.pending_spawns.is_empty() || self.deferred_files.is_empty() {
            return None;
        }
        let tool_use_id = self.pending_spawns.pop_front()?;
        let file_agent_id = self.deferred_files.pop_front()?;
        self.bindings
            .insert(file_agent_id.clone(), tool_use_id.clone());
        Some(Binding {
            file_agent_id,
            tool_use_id,
        })
    }
}

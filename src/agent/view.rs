//! Read-only view of an agent, shared with the reporter.

use crate::model::{AgentId, AgentState};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// The observable half of an agent: its name, meal count and current state.
///
/// Only the owning [`Agent`](super::Agent) writes; anybody holding an `Arc<AgentView>`
/// may read at any time without locking. Reads may be slightly stale.
#[derive(Debug)]
pub struct AgentView {
    id: AgentId,
    name: String,
    times_eaten: AtomicU64,
    state: AtomicU8,
}

impl AgentView {
    pub(crate) fn new(id: AgentId) -> Self {
        Self {
            id,
            name: id.to_string(),
            times_eaten: AtomicU64::new(0),
            state: AtomicU8::new(AgentState::Thinking.as_u8()),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn times_eaten(&self) -> u64 {
        self.times_eaten.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> AgentState {
        AgentState::from_u8(self.state.load(Ordering::Relaxed))
    }

    pub(crate) fn record_meal(&self) -> u64 {
        self.times_eaten.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Stores `to` and returns the previous state.
    pub(crate) fn swap_state(&self, to: AgentState) -> AgentState {
        AgentState::from_u8(self.state.swap(to.as_u8(), Ordering::Relaxed))
    }
}

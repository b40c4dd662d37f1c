//! The acquisition-ordering policy.
//!
//! Agent `k` sits between resources `k` and `(k + 1) mod N`. Taken literally as
//! "left, then right" that is a circular wait: every agent can hold its first resource
//! while waiting on its neighbour's. Ranking resources by index and always taking the
//! lower one first breaks the cycle; in the ring this flips exactly one agent (the last,
//! whose right-hand resource is `0`).

use super::TableError;
use crate::model::{AgentId, ResourceId};

/// Which resources an agent takes, and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    pub agent: AgentId,
    pub primary: ResourceId,
    pub secondary: ResourceId,
}

impl Seat {
    /// Seat `k` of a ring of `count`; `count` must be non-zero, which [`wire`] checks.
    pub(crate) fn new(k: usize, count: usize) -> Self {
        let left = ResourceId::new(k);
        let right = ResourceId::new((k + 1) % count);
        Self {
            agent: AgentId::new(k),
            primary: left.min(right),
            secondary: left.max(right),
        }
    }
}

/// Seats for a ring of `count` agents.
pub fn wire(count: usize) -> Result<Vec<Seat>, TableError> {
    if count < 2 {
        return Err(TableError::TooFewAgents(count));
    }
    Ok((0..count).map(|k| Seat::new(k, count)).collect())
}

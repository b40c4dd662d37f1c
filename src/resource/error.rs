//! Error types for resources.

use crate::model::{AgentId, ResourceId};
use thiserror::Error;

/// Broken invariants detected by a [`Resource`](super::Resource).
///
/// Every variant is a programming error in the caller's state machine; none of them is
/// retried. Waiting for a busy resource is not an error and has no variant here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// The agent asked for a resource it already holds.
    #[error("{resource} acquired twice by {agent}")]
    AlreadyHeld { resource: ResourceId, agent: AgentId },

    /// A release was attempted by someone other than the recorded holder.
    #[error("{resource} released by {agent} but held by {holder:?}")]
    NotHolder {
        resource: ResourceId,
        agent: AgentId,
        holder: Option<AgentId>,
    },

    /// The lock was taken but the holder record was already occupied.
    #[error("{resource} granted to {agent} while recorded as held by {holder}")]
    HolderConflict {
        resource: ResourceId,
        agent: AgentId,
        holder: AgentId,
    },

    /// A guard was handed back to a resource it doesn't belong to.
    #[error("guard for {guard} returned to {resource}")]
    ForeignGuard {
        resource: ResourceId,
        guard: ResourceId,
    },
}

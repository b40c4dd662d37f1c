//! Error types for agents.

use crate::model::{AgentId, ResourceId};
use crate::resource::ResourceError;
use thiserror::Error;

/// Reasons an agent's loop stops with a failure.
///
/// Cancellation is not here: a cancelled agent returns normally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    /// The agent was wired against the global acquisition order.
    #[error("{agent} wired with primary {primary} not below secondary {secondary}")]
    Unordered {
        agent: AgentId,
        primary: ResourceId,
        secondary: ResourceId,
    },

    /// A resource reported a broken invariant.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

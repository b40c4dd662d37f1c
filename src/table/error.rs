//! Error types for table construction.

use crate::agent::AgentError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    /// A ring needs at least two seats so each agent has two distinct resources.
    #[error("a table needs at least 2 agents, got {0}")]
    TooFewAgents(usize),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

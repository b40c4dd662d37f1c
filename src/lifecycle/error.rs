//! Errors raised while configuring, starting or stopping the table.

use crate::table::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemError {
    /// The configuration could not be read or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The configuration was read but its values are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Table(#[from] TableError),

    /// A task panicked or was aborted instead of stopping cleanly.
    #[error("Task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

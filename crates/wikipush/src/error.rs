//! CLI error types.

use wikipush_config::ConfigError;
use wikipush_confluence::ConfluenceError;
use wikipush_sync::{ReadError, SyncError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Read(#[from] ReadError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Validation(String),
}

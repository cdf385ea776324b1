//! Error types for the synchronization core.

use std::path::PathBuf;

use crate::store::StoreError;

/// Filesystem read failure while building the node list.
///
/// Fatal: the whole read aborts before any remote write is attempted.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {path}: {source}")]
pub struct ReadError {
    /// Path that could not be read.
    pub path: PathBuf,
    /// Underlying IO error.
    #[source]
    pub source: std::io::Error,
}

impl ReadError {
    pub(crate) fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Per-node reconciliation failure.
///
/// Non-fatal: the run records the failure and continues with the next
/// node in sequence.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Remote lookup failed.
    #[error("lookup for \"{title}\" failed: {source}")]
    Lookup {
        /// Effective (prefixed) page title.
        title: String,
        #[source]
        source: StoreError,
    },

    /// Remote create or update failed.
    #[error("write for \"{title}\" failed: {source}")]
    Write {
        /// Effective (prefixed) page title.
        title: String,
        #[source]
        source: StoreError,
    },
}

/// Run-level error.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Filesystem read failed before any remote write.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// One or more nodes failed; every node was still attempted.
    #[error("{failed} of {total} item(s) failed to sync")]
    PartialFailure {
        /// Number of failed nodes.
        failed: usize,
        /// Total number of nodes attempted.
        total: usize,
    },
}

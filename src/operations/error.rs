// Operation Errors
// Typed failures for scanning and applying sync operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal scanner failures
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root is missing or is not a directory
    #[error("Directory not found at '{}'", path.display())]
    RootNotFound { path: PathBuf },

    /// The scan root exists but could not be resolved to an absolute path
    #[error("Failed to resolve '{}': {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failure applying one operation. Never aborts a batch.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create backup {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to preserve timestamps on {}: {source}", path.display())]
    Timestamps {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

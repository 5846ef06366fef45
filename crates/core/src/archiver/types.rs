//! Outcome and error types for blob archival.

use std::path::PathBuf;

use thiserror::Error;

/// Result of trying to archive one (device, build) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The device history already holds this build; nothing was run.
    AlreadySaved,
    /// The generator saved the blob and the history was extended.
    Saved { save_path: PathBuf },
    /// The generator did not confirm; details are in `log_path`.
    Failed { log_path: PathBuf },
}

impl ArchiveOutcome {
    /// Whether the generator was run for this pair.
    pub fn attempted(&self) -> bool {
        !matches!(self, Self::AlreadySaved)
    }
}

/// Filesystem errors that stop archival altogether.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write generator log {path}: {source}")]
    WriteLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A device or catalog value cannot be used as a directory name.
    #[error("Refusing to use {value:?} as a path component for {field}")]
    UnsafePathComponent { field: &'static str, value: String },
}

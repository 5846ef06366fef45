//! Error types for the generator module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when running the external generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Generator binary not found.
    #[error("tsschecker not found at path: {path}")]
    NotFound { path: PathBuf },

    /// Path exists but is not an executable file.
    #[error("tsschecker at {path} is not an executable file")]
    NotExecutable { path: PathBuf },

    /// The version probe printed nothing.
    #[error("tsschecker at {path} printed no version information")]
    NoVersionOutput { path: PathBuf },

    /// First output line did not end in a build number.
    #[error("Failed to parse tsschecker version from {line:?}")]
    UnparseableVersion { line: String },

    /// Installed generator is older than the accepted minimum.
    #[error("tsschecker version {found} is too old, at least {minimum} is required")]
    VersionTooOld { found: u32, minimum: u32 },

    /// I/O error while running the generator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    /// Maps a spawn error for `path` to the matching variant.
    pub fn from_spawn(path: &std::path::Path, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::NotExecutable {
                path: path.to_path_buf(),
            },
            _ => Self::Io(e),
        }
    }

    /// Operator hint on where to get a working generator, if relevant.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } | Self::NotExecutable { .. } => Some(
                "Install tsschecker or point to it with -p. Get it here: https://github.com/encounter/tsschecker/releases",
            ),
            Self::VersionTooOld { .. } => Some(
                "Get the latest version here: https://github.com/tihmstar/tsschecker/releases",
            ),
            _ => None,
        }
    }
}

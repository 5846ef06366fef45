//! Blob archival for a single (device, firmware build) pair.

mod blob_archiver;
mod types;

pub use blob_archiver::{BlobArchiver, DEFAULT_LOG_FILE_NAME};
pub use types::{ArchiveError, ArchiveOutcome};

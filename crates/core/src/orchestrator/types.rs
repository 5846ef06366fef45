//! Types for the reconciliation run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Registration file present but malformed.
    #[error("registration error: {0}")]
    Registration(#[from] crate::device::RegistrationError),

    /// Firmware catalog could not be fetched or decoded.
    #[error("firmware catalog unavailable: {0}")]
    Catalog(#[from] crate::firmware::CatalogError),

    /// Device registry or store error.
    #[error("device registry error: {0}")]
    Registry(#[from] crate::device::RegistryError),

    /// Output directory or failure log could not be written.
    #[error("archive error: {0}")]
    Archive(#[from] crate::archiver::ArchiveError),
}

/// A pair whose generator run did not confirm a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPair {
    pub device_name: String,
    pub ecid: String,
    pub version: String,
    pub build_id: String,
    pub log_path: PathBuf,
}

/// What one run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Devices newly imported from the registration file.
    pub imported: usize,
    /// Devices checked.
    pub devices: usize,
    /// Pairs skipped because the blob was already saved.
    pub already_saved: usize,
    /// Pairs saved during this run.
    pub saved: usize,
    /// Pairs attempted without success.
    pub failed: Vec<FailedPair>,
}

impl RunSummary {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            imported: 0,
            devices: 0,
            already_saved: 0,
            saved: 0,
            failed: Vec::new(),
        }
    }

    /// Number of generator invocations made.
    pub fn attempted(&self) -> usize {
        self.saved + self.failed.len()
    }
}

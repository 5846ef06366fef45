//! Device storage trait.

use thiserror::Error;

use super::Device;

/// Error type for device store operations.
#[derive(Debug, Error)]
pub enum DeviceStoreError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// The stored blob history could not be decoded.
    #[error("Corrupt blob history for device {ecid}: {reason}")]
    CorruptHistory { ecid: String, reason: String },
}

impl From<rusqlite::Error> for DeviceStoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Trait for device storage backends. Devices are keyed by ECID.
pub trait DeviceStore: Send + Sync {
    /// Get a device by ECID.
    fn find_by_ecid(&self, ecid: &str) -> Result<Option<Device>, DeviceStoreError>;

    /// Insert a device. Fails if the ECID is already stored.
    fn insert(&self, device: &Device) -> Result<(), DeviceStoreError>;

    /// Update the device with the same ECID, inserting it if absent.
    fn upsert(&self, device: &Device) -> Result<(), DeviceStoreError>;

    /// All devices in insertion order.
    fn list(&self) -> Result<Vec<Device>, DeviceStoreError>;
}

//! Mock firmware catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::firmware::{CatalogError, DeviceFirmwares, FirmwareCatalog, FirmwareEntry, SignedCatalog};

/// Mock implementation of the FirmwareCatalog trait.
///
/// Entries are stored raw (signed and unsigned) and go through the same
/// signed-only filtering as the real client on `fetch`.
///
/// # Example
///
/// ```rust,ignore
/// use autotss_core::testing::{fixtures, MockFirmwareCatalog};
///
/// let catalog = MockFirmwareCatalog::new();
/// catalog
///     .add_device("iPhone10,3", "d22ap", vec![fixtures::firmware("B100", "14.0", true)])
///     .await;
///
/// let signed = catalog.fetch().await?;
/// assert_eq!(signed.signed_firmwares("iPhone10,3").len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockFirmwareCatalog {
    /// Raw catalog entries by device type.
    devices: Arc<RwLock<HashMap<String, DeviceFirmwares>>>,
    /// Number of fetches performed.
    fetches: Arc<RwLock<usize>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl Default for MockFirmwareCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFirmwareCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            devices: Arc::new(RwLock::new(HashMap::new())),
            fetches: Arc::new(RwLock::new(0)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add or replace the entry for a device type.
    pub async fn add_device(
        &self,
        device_type_id: &str,
        board_config: &str,
        firmwares: Vec<FirmwareEntry>,
    ) {
        self.devices.write().await.insert(
            device_type_id.to_string(),
            DeviceFirmwares {
                board_config: board_config.to_string(),
                firmwares,
            },
        );
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }
}

#[async_trait]
impl FirmwareCatalog for MockFirmwareCatalog {
    async fn fetch(&self) -> Result<SignedCatalog, CatalogError> {
        *self.fetches.write().await += 1;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(SignedCatalog::from_devices(self.devices.read().await.clone()))
    }
}

//! Device registry: import, lookup and persistence of tracked devices.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::{Device, DeviceRegistration, DeviceStore, DeviceStoreError};
use crate::firmware::SignedCatalog;

/// Errors raised by the device registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Board config lookup for a device type the catalog does not know.
    #[error("unknown device type {0}: no board config in the firmware catalog")]
    UnknownDeviceType(String),

    #[error("device store error: {0}")]
    Store(#[from] DeviceStoreError),
}

/// The set of known devices, backed by a [`DeviceStore`].
pub struct DeviceRegistry {
    store: Arc<dyn DeviceStore>,
}

impl DeviceRegistry {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self { store }
    }

    /// Look up the board config for a device type, lower-cased.
    pub fn resolve_board_config(
        catalog: &SignedCatalog,
        device_type_id: &str,
    ) -> Result<String, RegistryError> {
        catalog
            .board_config(device_type_id)
            .map(str::to_lowercase)
            .ok_or_else(|| RegistryError::UnknownDeviceType(device_type_id.to_string()))
    }

    /// Turn registrations into devices, filling in missing board configs
    /// from the catalog.
    pub fn resolve_registrations(
        catalog: &SignedCatalog,
        registrations: Vec<DeviceRegistration>,
    ) -> Result<Vec<Device>, RegistryError> {
        registrations
            .into_iter()
            .map(|reg| {
                let board_config = match reg.board_config {
                    Some(bc) => bc,
                    None => {
                        let bc = Self::resolve_board_config(catalog, &reg.identifier)?;
                        debug!("Resolved board config {} for {}", bc, reg.identifier);
                        bc
                    }
                };
                Ok::<_, RegistryError>(Device::new(
                    reg.name,
                    reg.identifier,
                    board_config,
                    reg.ecid,
                ))
            })
            .collect()
    }

    /// Insert every candidate whose ECID is not stored yet, with an empty
    /// history. Returns how many were inserted; the first candidate seen for
    /// an ECID wins.
    pub fn import_new_devices(&self, candidates: Vec<Device>) -> Result<usize, RegistryError> {
        let mut inserted = 0;

        for candidate in candidates {
            if self.store.find_by_ecid(&candidate.ecid)?.is_some() {
                debug!("Device {} already registered, skipping", candidate.ecid);
                continue;
            }

            info!("{}", candidate);
            self.store.insert(&candidate.without_history())?;
            inserted += 1;
        }

        info!("Added {} new devices to the database", inserted);
        Ok(inserted)
    }

    pub fn find_by_ecid(&self, ecid: &str) -> Result<Option<Device>, RegistryError> {
        Ok(self.store.find_by_ecid(ecid)?)
    }

    /// Snapshot of every known device in persisted order.
    pub fn list_all(&self) -> Result<Vec<Device>, RegistryError> {
        Ok(self.store.list()?)
    }

    /// Write every device back, keyed by ECID.
    pub fn persist(&self, devices: &[Device]) -> Result<(), RegistryError> {
        for device in devices {
            self.store.upsert(device)?;
        }
        Ok(())
    }
}

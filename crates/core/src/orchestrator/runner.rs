//! Reconciliation run.
//!
//! One pass, strictly sequential:
//! - read the registration file and fetch the signed-firmware catalog
//! - import newly declared devices
//! - for every device and every signed build of its type, archive blobs
//! - write the whole device snapshot back once at the end
//!
//! Progress is only flushed at the end of the run, also when archival stops
//! on an error. A crash mid-run loses the history gained so far, and those
//! pairs are retried next time.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::archiver::{ArchiveError, ArchiveOutcome, BlobArchiver};
use crate::device::{read_registrations, Device, DeviceRegistry};
use crate::firmware::{FirmwareCatalog, SignedCatalog};
use crate::generator::Generator;

use super::types::{FailedPair, ReconcileError, RunSummary};

/// Drives one reconciliation pass over all known devices.
pub struct Reconciler<G: Generator> {
    registry: DeviceRegistry,
    catalog: Arc<dyn FirmwareCatalog>,
    archiver: BlobArchiver<G>,
    registration_path: PathBuf,
}

impl<G: Generator> Reconciler<G> {
    pub fn new(
        registry: DeviceRegistry,
        catalog: Arc<dyn FirmwareCatalog>,
        archiver: BlobArchiver<G>,
        registration_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            catalog,
            archiver,
            registration_path: registration_path.into(),
        }
    }

    /// Run the full pipeline once.
    pub async fn run(&self) -> Result<RunSummary, ReconcileError> {
        let mut summary = RunSummary::new(Utc::now());

        info!(
            "Checking {} for new devices",
            self.registration_path.display()
        );
        let registrations = read_registrations(&self.registration_path)?;

        let catalog = self.catalog.fetch().await?;

        let candidates = DeviceRegistry::resolve_registrations(&catalog, registrations)?;
        summary.imported = self.registry.import_new_devices(candidates)?;

        let mut devices = self.registry.list_all()?;
        for device in &devices {
            info!("{}", device);
        }
        info!("Grabbed {} devices from the database", devices.len());
        summary.devices = devices.len();

        info!("Saving unsaved blobs for {} devices", devices.len());
        let archived = self.archive_signed(&catalog, &mut devices, &mut summary).await;

        // Blobs saved before an archive error are recorded too
        info!("Updating database with newly saved blobs");
        self.registry.persist(&devices)?;
        info!("Done updating database");
        archived?;

        summary.finished_at = Utc::now();
        Ok(summary)
    }

    /// Archive every signed build of every device, stopping at the first
    /// archive error. Device histories are updated in place.
    async fn archive_signed(
        &self,
        catalog: &SignedCatalog,
        devices: &mut [Device],
        summary: &mut RunSummary,
    ) -> Result<(), ArchiveError> {
        for device in devices.iter_mut() {
            if !catalog.contains(&device.device_type_id) {
                warn!(
                    "[{}] device type {} is not in the firmware catalog, skipping",
                    device.name, device.device_type_id
                );
                continue;
            }

            for firmware in catalog.signed_firmwares(&device.device_type_id) {
                let outcome = self
                    .archiver
                    .archive(device, &firmware.build_id, &firmware.version)
                    .await?;

                match outcome {
                    ArchiveOutcome::AlreadySaved => summary.already_saved += 1,
                    ArchiveOutcome::Saved { .. } => summary.saved += 1,
                    ArchiveOutcome::Failed { log_path } => summary.failed.push(FailedPair {
                        device_name: device.name.clone(),
                        ecid: device.ecid.clone(),
                        version: firmware.version.clone(),
                        build_id: firmware.build_id.clone(),
                        log_path,
                    }),
                }
            }
        }
        info!("Done saving blobs");
        Ok(())
    }
}

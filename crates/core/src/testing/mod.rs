//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborators
//! (firmware catalog and blob generator), so a full reconciliation run can
//! be exercised without network access or a tsschecker binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use autotss_core::testing::{fixtures, MockFirmwareCatalog, MockGenerator};
//!
//! let catalog = MockFirmwareCatalog::new();
//! let generator = MockGenerator::new();
//!
//! catalog
//!     .add_device("iPhone10,3", "d22ap", vec![fixtures::firmware("B100", "14.0", true)])
//!     .await;
//!
//! // Build a Reconciler with Arc::new(catalog.clone()) and generator.clone()...
//! ```

mod mock_firmware_catalog;
mod mock_generator;

pub use mock_firmware_catalog::MockFirmwareCatalog;
pub use mock_generator::MockGenerator;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::device::{Device, DeviceRegistration};
    use crate::firmware::FirmwareEntry;

    /// A device with board config `d22ap` and an empty history.
    pub fn device(name: &str, device_type_id: &str, ecid: &str) -> Device {
        Device::new(name, device_type_id, "d22ap", ecid)
    }

    /// A catalog firmware entry.
    pub fn firmware(build_id: &str, version: &str, signed: bool) -> FirmwareEntry {
        FirmwareEntry {
            build_id: build_id.to_string(),
            version: version.to_string(),
            signed,
        }
    }

    /// A registration without an explicit board config.
    pub fn registration(name: &str, identifier: &str, ecid: &str) -> DeviceRegistration {
        DeviceRegistration {
            name: name.to_string(),
            identifier: identifier.to_string(),
            ecid: ecid.to_string(),
            board_config: None,
        }
    }

    /// Render registrations as `devices.ini` contents.
    pub fn registration_file(registrations: &[DeviceRegistration]) -> String {
        registrations
            .iter()
            .map(|r| {
                let mut section = format!(
                    "[{}]\nidentifier = {}\necid = {}\n",
                    r.name, r.identifier, r.ecid
                );
                if let Some(bc) = &r.board_config {
                    section.push_str(&format!("boardconfig = {}\n", bc));
                }
                section
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

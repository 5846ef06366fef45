//! Types for the signed-firmware catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One firmware build offered for a device type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareEntry {
    #[serde(rename = "buildid")]
    pub build_id: String,
    /// Human readable version, e.g. `14.0`. Not unique across re-releases.
    pub version: String,
    pub signed: bool,
}

/// Catalog entry for one device type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFirmwares {
    #[serde(rename = "BoardConfig")]
    pub board_config: String,
    pub firmwares: Vec<FirmwareEntry>,
}

/// Raw catalog response body.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    pub devices: HashMap<String, DeviceFirmwares>,
}

/// Keep only signed entries, preserving order.
pub fn filter_signed(firmwares: Vec<FirmwareEntry>) -> Vec<FirmwareEntry> {
    firmwares.into_iter().filter(|f| f.signed).collect()
}

/// Catalog keyed by device type identifier, holding signed builds only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedCatalog {
    devices: HashMap<String, DeviceFirmwares>,
}

impl SignedCatalog {
    /// Build from raw per-device entries, dropping every unsigned build.
    pub fn from_devices(devices: HashMap<String, DeviceFirmwares>) -> Self {
        let devices = devices
            .into_iter()
            .map(|(id, entry)| {
                let entry = DeviceFirmwares {
                    board_config: entry.board_config,
                    firmwares: filter_signed(entry.firmwares),
                };
                (id, entry)
            })
            .collect();

        Self { devices }
    }

    /// Catalog entry for a device type.
    pub fn device(&self, device_type_id: &str) -> Option<&DeviceFirmwares> {
        self.devices.get(device_type_id)
    }

    /// Board config for a device type, `None` when unknown or blank.
    pub fn board_config(&self, device_type_id: &str) -> Option<&str> {
        self.device(device_type_id)
            .map(|d| d.board_config.as_str())
            .filter(|bc| !bc.is_empty())
    }

    /// Signed builds for a device type; empty when the type is unknown.
    pub fn signed_firmwares(&self, device_type_id: &str) -> &[FirmwareEntry] {
        self.device(device_type_id)
            .map(|d| d.firmwares.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, device_type_id: &str) -> bool {
        self.devices.contains_key(device_type_id)
    }

    /// Number of device types in the catalog.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl From<CatalogResponse> for SignedCatalog {
    fn from(response: CatalogResponse) -> Self {
        Self::from_devices(response.devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(build_id: &str, version: &str, signed: bool) -> FirmwareEntry {
        FirmwareEntry {
            build_id: build_id.to_string(),
            version: version.to_string(),
            signed,
        }
    }

    #[test]
    fn test_filter_signed_keeps_signed_subset_in_order() {
        let firmwares = vec![
            entry("A1", "1.0", true),
            entry("A2", "1.1", false),
            entry("A3", "1.2", true),
            entry("A4", "1.3", false),
            entry("A5", "1.4", true),
        ];

        let signed = filter_signed(firmwares);
        let builds: Vec<&str> = signed.iter().map(|f| f.build_id.as_str()).collect();
        assert_eq!(builds, vec!["A1", "A3", "A5"]);
        assert!(signed.iter().all(|f| f.signed));
    }

    #[test]
    fn test_signed_catalog_drops_unsigned_per_device() {
        let mut devices = HashMap::new();
        devices.insert(
            "iPhone10,3".to_string(),
            DeviceFirmwares {
                board_config: "D22AP".to_string(),
                firmwares: vec![entry("15A372", "11.0", false), entry("15B93", "11.1", true)],
            },
        );
        devices.insert(
            "iPad7,3".to_string(),
            DeviceFirmwares {
                board_config: "j207ap".to_string(),
                firmwares: vec![entry("15A372", "11.0", false)],
            },
        );

        let catalog = SignedCatalog::from_devices(devices);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.signed_firmwares("iPhone10,3"),
            &[entry("15B93", "11.1", true)]
        );
        assert!(catalog.signed_firmwares("iPad7,3").is_empty());
        assert!(catalog.contains("iPad7,3"));
    }

    #[test]
    fn test_unknown_device_has_no_firmwares() {
        let catalog = SignedCatalog::default();
        assert!(catalog.signed_firmwares("iPhone1,1").is_empty());
        assert!(catalog.board_config("iPhone1,1").is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_blank_board_config_is_none() {
        let mut devices = HashMap::new();
        devices.insert("AppleTV5,3".to_string(), DeviceFirmwares::default());
        let catalog = SignedCatalog::from_devices(devices);
        assert!(catalog.board_config("AppleTV5,3").is_none());
    }

    #[test]
    fn test_deserialize_response_ignores_extra_fields() {
        let json = r#"{
            "devices": {
                "iPhone10,3": {
                    "name": "iPhone X",
                    "BoardConfig": "D22AP",
                    "platform": "t8015",
                    "cpid": 32789,
                    "bdid": 6,
                    "firmwares": [
                        {"version": "11.1", "buildid": "15B93", "sha1sum": "x", "size": 1, "signed": true},
                        {"version": "11.0", "buildid": "15A372", "signed": false}
                    ]
                }
            }
        }"#;

        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        let catalog = SignedCatalog::from(response);
        assert_eq!(catalog.board_config("iPhone10,3"), Some("D22AP"));
        assert_eq!(catalog.signed_firmwares("iPhone10,3").len(), 1);
        assert_eq!(catalog.signed_firmwares("iPhone10,3")[0].build_id, "15B93");
    }
}

//! Device and saved-blob record types.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Release type recorded for every blob this tool saves.
pub const RELEASE_TYPE: &str = "release";

/// Proof that a blob for one firmware build has been archived for a device.
///
/// Field names on the wire match the JSON history column used by existing
/// `autotss.db` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBlobRecord {
    #[serde(rename = "releaseType")]
    pub release_type: String,
    #[serde(rename = "versionNumber")]
    pub version_number: String,
    /// Unique within one device's history.
    #[serde(rename = "buildID")]
    pub build_id: String,
}

impl SavedBlobRecord {
    /// Record for a regular release build.
    pub fn release(version_number: impl Into<String>, build_id: impl Into<String>) -> Self {
        Self {
            release_type: RELEASE_TYPE.to_string(),
            version_number: version_number.into(),
            build_id: build_id.into(),
        }
    }
}

/// One physical unit whose blobs are tracked.
///
/// Equality and hashing only consider the ECID.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    /// Display label, not unique.
    pub name: String,
    /// Vendor product type, e.g. `iPhone10,3`.
    pub device_type_id: String,
    /// Lower-cased hardware variant, e.g. `d22ap`.
    pub board_config: String,
    pub ecid: String,
    saved_blobs: Vec<SavedBlobRecord>,
}

impl Device {
    /// Create a device with an empty blob history.
    pub fn new(
        name: impl Into<String>,
        device_type_id: impl Into<String>,
        board_config: impl Into<String>,
        ecid: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            device_type_id: device_type_id.into(),
            board_config: board_config.into().to_lowercase(),
            ecid: ecid.into(),
            saved_blobs: Vec::new(),
        }
    }

    /// Attach a previously persisted history. Records repeating an earlier
    /// build ID are dropped, first occurrence wins.
    pub fn with_history(mut self, records: impl IntoIterator<Item = SavedBlobRecord>) -> Self {
        for record in records {
            self.record_blob(record);
        }
        self
    }

    /// Archived builds in archival order.
    pub fn saved_blobs(&self) -> &[SavedBlobRecord] {
        &self.saved_blobs
    }

    /// Whether a blob for `build_id` is already in the history.
    pub fn has_blob(&self, build_id: &str) -> bool {
        self.saved_blobs.iter().any(|r| r.build_id == build_id)
    }

    /// Append a record. Returns `false` and leaves the history untouched if
    /// the build is already recorded.
    pub fn record_blob(&mut self, record: SavedBlobRecord) -> bool {
        if self.has_blob(&record.build_id) {
            return false;
        }
        self.saved_blobs.push(record);
        true
    }

    /// Same identity and metadata, empty history.
    pub fn without_history(&self) -> Self {
        Self::new(
            self.name.clone(),
            self.device_type_id.clone(),
            self.board_config.clone(),
            self.ecid.clone(),
        )
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.ecid == other.ecid
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ecid.hash(state);
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device: [{}] ECID: [{}] Board Config: [{}]",
            self.name, self.ecid, self.board_config
        )
    }
}

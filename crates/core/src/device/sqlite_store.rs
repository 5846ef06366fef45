//! SQLite-backed device store.
//!
//! The table layout matches the `devices` table written by earlier autotss
//! releases, so an existing `autotss.db` is picked up as-is.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{Device, DeviceStore, DeviceStoreError, SavedBlobRecord};

const SELECT_COLUMNS: &str = "SELECT deviceName, deviceID, boardConfig, deviceECID, blobsSaved FROM devices";

/// SQLite-backed device store.
pub struct SqliteDeviceStore {
    conn: Mutex<Connection>,
}

/// Raw column values before the history JSON is decoded.
struct DeviceRow {
    name: Option<String>,
    device_type_id: Option<String>,
    board_config: Option<String>,
    ecid: String,
    blobs_saved: Option<String>,
}

impl SqliteDeviceStore {
    /// Open (or create) the database file and its schema.
    pub fn new(path: &Path) -> Result<Self, DeviceStoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite device store (useful for testing).
    pub fn in_memory() -> Result<Self, DeviceStoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DeviceStoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS devices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                deviceName TEXT,
                deviceID TEXT,
                boardConfig TEXT,
                deviceECID TEXT,
                blobsSaved TEXT
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_devices_ecid ON devices(deviceECID);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DeviceStoreError> {
        self.conn
            .lock()
            .map_err(|_| DeviceStoreError::Database("connection mutex poisoned".to_string()))
    }

    fn read_row(row: &rusqlite::Row) -> rusqlite::Result<DeviceRow> {
        Ok(DeviceRow {
            name: row.get(0)?,
            device_type_id: row.get(1)?,
            board_config: row.get(2)?,
            ecid: row.get(3)?,
            blobs_saved: row.get(4)?,
        })
    }

    fn row_to_device(row: DeviceRow) -> Result<Device, DeviceStoreError> {
        let history: Vec<SavedBlobRecord> = match row.blobs_saved.as_deref() {
            None | Some("") => Vec::new(),
            Some(json) => {
                serde_json::from_str(json).map_err(|e| DeviceStoreError::CorruptHistory {
                    ecid: row.ecid.clone(),
                    reason: e.to_string(),
                })?
            }
        };

        Ok(Device::new(
            row.name.unwrap_or_default(),
            row.device_type_id.unwrap_or_default(),
            row.board_config.unwrap_or_default(),
            row.ecid,
        )
        .with_history(history))
    }

    fn history_json(device: &Device) -> Result<String, DeviceStoreError> {
        serde_json::to_string(device.saved_blobs())
            .map_err(|e| DeviceStoreError::Database(e.to_string()))
    }
}

impl DeviceStore for SqliteDeviceStore {
    fn find_by_ecid(&self, ecid: &str) -> Result<Option<Device>, DeviceStoreError> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!("{} WHERE deviceECID = ?", SELECT_COLUMNS),
                params![ecid],
                Self::read_row,
            )
            .optional()?;

        row.map(Self::row_to_device).transpose()
    }

    fn insert(&self, device: &Device) -> Result<(), DeviceStoreError> {
        let conn = self.conn()?;
        let history = Self::history_json(device)?;

        conn.execute(
            "INSERT INTO devices (deviceName, deviceID, boardConfig, deviceECID, blobsSaved) VALUES (?, ?, ?, ?, ?)",
            params![
                device.name,
                device.device_type_id,
                device.board_config,
                device.ecid,
                history,
            ],
        )?;

        Ok(())
    }

    fn upsert(&self, device: &Device) -> Result<(), DeviceStoreError> {
        let conn = self.conn()?;
        let history = Self::history_json(device)?;

        conn.execute(
            r#"
            INSERT INTO devices (deviceName, deviceID, boardConfig, deviceECID, blobsSaved)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(deviceECID) DO UPDATE SET
                deviceName = excluded.deviceName,
                deviceID = excluded.deviceID,
                boardConfig = excluded.boardConfig,
                blobsSaved = excluded.blobsSaved
            "#,
            params![
                device.name,
                device.device_type_id,
                device.board_config,
                device.ecid,
                history,
            ],
        )?;

        Ok(())
    }

    fn list(&self) -> Result<Vec<Device>, DeviceStoreError> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], Self::read_row)?;

        let mut devices = Vec::new();
        for row_result in rows {
            devices.push(Self::row_to_device(row_result?)?);
        }

        Ok(devices)
    }
}

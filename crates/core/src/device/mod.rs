//! Tracked devices and their saved-blob history.

mod registration;
mod registry;
mod sqlite_store;
mod store;
mod types;

pub use registration::{
    parse_registrations, read_registrations, DeviceRegistration, RegistrationError,
};
pub use registry::{DeviceRegistry, RegistryError};
pub use sqlite_store::SqliteDeviceStore;
pub use store::{DeviceStore, DeviceStoreError};
pub use types::{Device, SavedBlobRecord, RELEASE_TYPE};

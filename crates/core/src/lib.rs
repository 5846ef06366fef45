pub mod archiver;
pub mod config;
pub mod device;
pub mod firmware;
pub mod generator;
pub mod orchestrator;
pub mod testing;

pub use archiver::{ArchiveError, ArchiveOutcome, BlobArchiver, DEFAULT_LOG_FILE_NAME};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, BlobsConfig,
    CatalogConfig, Config, ConfigError, DatabaseConfig, GeneratorConfig, RegistrationConfig,
};
pub use device::{
    parse_registrations, read_registrations, Device, DeviceRegistration, DeviceRegistry,
    DeviceStore, DeviceStoreError, RegistrationError, RegistryError, SavedBlobRecord,
    SqliteDeviceStore,
};
pub use firmware::{
    CatalogError, DeviceFirmwares, FirmwareCatalog, FirmwareEntry, IpswClient, SignedCatalog,
};
pub use generator::{
    ensure_executable, ensure_min_version, BlobRequest, Generator, GeneratorError,
    GeneratorOutput, MarkerClassifier, OutcomeClassifier, TsscheckerGenerator,
};
pub use orchestrator::{FailedPair, ReconcileError, Reconciler, RunSummary};

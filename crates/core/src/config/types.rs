use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub blobs: BlobsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("autotss.db")
}

/// Where newly declared devices are read from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationConfig {
    #[serde(default = "default_registration_path")]
    pub path: PathBuf,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            path: default_registration_path(),
        }
    }
}

fn default_registration_path() -> PathBuf {
    PathBuf::from("devices.ini")
}

/// Output tree for saved blobs and failure logs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobsConfig {
    /// Root directory; blobs land in `<dir>/<device>/<ecid>/<version>/<build>`.
    #[serde(default = "default_blobs_dir")]
    pub dir: PathBuf,
    /// File name written next to the blobs when the generator fails.
    #[serde(default = "default_log_file_name")]
    pub log_file_name: String,
}

impl Default for BlobsConfig {
    fn default() -> Self {
        Self {
            dir: default_blobs_dir(),
            log_file_name: default_log_file_name(),
        }
    }
}

fn default_blobs_dir() -> PathBuf {
    PathBuf::from("blobs")
}

fn default_log_file_name() -> String {
    "tsschecker_log.txt".to_string()
}

/// Remote signed-firmware catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://api.ipsw.me/v2.1/firmwares.json/condensed".to_string()
}

fn default_user_agent() -> String {
    format!(
        "autotss/{} (automatically save shsh blobs; https://github.com/codsane/autotss)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_timeout() -> u64 {
    30
}

/// External ticket generator (tsschecker).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Binary to run; a bare name is looked up on `PATH`.
    #[serde(default = "default_generator_path")]
    pub path: PathBuf,
    /// Oldest accepted build number reported by the version probe.
    #[serde(default = "default_min_version")]
    pub min_version: u32,
    /// Output line that marks a successful save.
    #[serde(default = "default_success_marker")]
    pub success_marker: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            path: default_generator_path(),
            min_version: default_min_version(),
            success_marker: default_success_marker(),
        }
    }
}

fn default_generator_path() -> PathBuf {
    PathBuf::from("tsschecker")
}

fn default_min_version() -> u32 {
    247
}

fn default_success_marker() -> String {
    "Saved shsh blobs!".to_string()
}

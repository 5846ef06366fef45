//! Signed firmware catalog.
//!
//! Fetches the vendor firmware list from the IPSW.me API and narrows it down
//! to builds that are currently being signed. Nothing can be reconciled
//! without it, so every error here aborts the run.

mod ipsw;
mod types;

pub use ipsw::IpswClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching the firmware catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Source of the signed-firmware catalog.
#[async_trait]
pub trait FirmwareCatalog: Send + Sync {
    /// Fetch the catalog, keeping signed builds only.
    async fn fetch(&self) -> Result<SignedCatalog, CatalogError>;
}

//! IPSW.me firmware API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::types::{CatalogResponse, SignedCatalog};
use super::{CatalogError, FirmwareCatalog};
use crate::config::CatalogConfig;

/// Client for the condensed firmware listing.
pub struct IpswClient {
    client: Client,
    url: String,
}

impl IpswClient {
    /// Create a new client. The configured User-Agent is sent on every request.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Decode a response body into a signed-only catalog.
    pub fn parse_catalog(body: &str) -> Result<SignedCatalog, CatalogError> {
        let response: CatalogResponse = serde_json::from_str(body).map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse firmware catalog: {}", e))
        })?;

        Ok(response.into())
    }
}

#[async_trait]
impl FirmwareCatalog for IpswClient {
    async fn fetch(&self) -> Result<SignedCatalog, CatalogError> {
        debug!("Fetching firmware catalog from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let catalog = Self::parse_catalog(&body)?;

        info!(
            "Fetched firmware catalog with {} device types",
            catalog.len()
        );
        Ok(catalog)
    }
}

//! HTTP client for the upstream catalog API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::{CarModel, Catalog, CatalogError, Category, Manufacturer, ModelId};

/// Catalog source backed by the upstream JSON API.
///
/// Every request is bounded by the configured timeout; an expired timeout is
/// reported as [`CatalogError::Transport`] like any other network failure.
/// Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    http: reqwest::Client,
}

impl HttpCatalog {
    /// Create a client for `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogError::Transport)?;
        Self::with_client(base_url, http)
    }

    /// Create a client with a preconfigured `reqwest` client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, CatalogError> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        Url::parse(&base_url)?;
        Ok(Self { base_url, http })
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.endpoint(path);
        debug!(name: "catalog.request", url = %url, "Fetching from catalog");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(CatalogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await.map_err(CatalogError::Transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn fetch_models(&self) -> Result<Vec<CarModel>, CatalogError> {
        self.get_json("/api/models").await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.get_json("/api/categories").await
    }

    async fn fetch_manufacturers(&self) -> Result<Vec<Manufacturer>, CatalogError> {
        self.get_json("/api/manufacturers").await
    }

    /// Try `/api/models/{id}` first. Any failure there falls back to a linear
    /// search of the full listing.
    async fn fetch_model_by_id(&self, id: ModelId) -> Result<CarModel, CatalogError> {
        match self.get_json::<CarModel>(&format!("/api/models/{id}")).await {
            Ok(model) => return Ok(model),
            Err(e) => {
                warn!(
                    name: "catalog.model.fallback",
                    model_id = id,
                    error = %e,
                    "Direct model lookup failed, searching full listing"
                );
            }
        }

        self.fetch_models()
            .await?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(CatalogError::NotFound(id))
    }
}

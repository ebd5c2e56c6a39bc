//! Catalog data and the upstream API client.
//!
//! The catalog is read-only from this application's point of view. Models,
//! categories and manufacturers are fetched from an external HTTP JSON API on
//! every request; nothing is cached locally.
//!
//! # Architecture
//!
//! - [`Catalog`]: async trait implemented by every catalog source
//! - [`HttpCatalog`]: `reqwest`-backed client for the upstream API
//! - [`CatalogFilter`]: category/manufacturer filtering for listings

mod client;
mod filter;
mod types;

use async_trait::async_trait;

pub use client::HttpCatalog;
pub use filter::CatalogFilter;
pub use types::{CarModel, Category, Manufacturer, ModelId, Specification};

/// Errors returned by catalog sources.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Connection failure, timeout, or an interrupted response body.
    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("catalog returned {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The response body was not the expected JSON.
    #[error("malformed catalog payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The model is absent from the direct endpoint and the full listing.
    #[error("model id {0} not found")]
    NotFound(ModelId),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A read-only source of catalog records.
///
/// Handlers only depend on this trait, so tests can swap the HTTP client for
/// an in-memory catalog.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Fetch every model in the catalog.
    async fn fetch_models(&self) -> Result<Vec<CarModel>, CatalogError>;

    /// Fetch every category.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Fetch every manufacturer.
    async fn fetch_manufacturers(&self) -> Result<Vec<Manufacturer>, CatalogError>;

    /// Fetch a single model by id.
    async fn fetch_model_by_id(&self, id: ModelId) -> Result<CarModel, CatalogError>;
}

//! Commerce backend catalog and cart access.
//!
//! # Architecture
//!
//! - [`CatalogService`] is the seam handlers and services depend on. The
//!   concrete client is constructed once at startup and injected through
//!   `AppState`; nothing here holds global state.
//! - [`MedusaClient`] talks to the backend's store HTTP API with `reqwest`.
//!   Timeouts belong to this transport layer, not to callers.
//! - No caching: the product listing is cached at the HTTP layer via
//!   `Cache-Control`.
//!
//! # Example
//!
//! ```rust,ignore
//! use tailored_storefront::catalog::{CatalogService, ListOptions, MedusaClient, ProductFilter};
//!
//! let client = MedusaClient::new(&config.catalog)?;
//!
//! let newest = client
//!     .list_products(
//!         &ProductFilter::default(),
//!         &ListOptions::default()
//!             .with_relations(["variants", "categories", "tags"])
//!             .order_by("id", SortDirection::Desc)
//!             .take(100),
//!     )
//!     .await?;
//! ```

mod medusa;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod types;

use async_trait::async_trait;
use tailored_core::{CartId, Product, RegionId};
use thiserror::Error;

pub use medusa::MedusaClient;
pub use types::{Cart, LineItem, Region};

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client could not be built from configuration.
    #[error("Invalid catalog configuration: {0}")]
    InvalidConfig(String),
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort order for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

/// Product filter. Empty means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Match products carrying any of these tag values.
    pub tags: Vec<String>,
}

impl ProductFilter {
    /// Filter to products tagged with `value`.
    #[must_use]
    pub fn tagged(value: impl Into<String>) -> Self {
        Self {
            tags: vec![value.into()],
        }
    }
}

/// Projection, relations, ordering and limit for list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Fields to return. Empty returns the backend's default field set.
    pub select: Vec<String>,
    /// Relations to expand (e.g., "variants", "categories", "tags").
    pub relations: Vec<String>,
    pub order: Option<SortOrder>,
    pub take: Option<u32>,
}

impl ListOptions {
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations = relations.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(SortOrder {
            field: field.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub const fn take(mut self, limit: u32) -> Self {
        self.take = Some(limit);
        self
    }
}

/// Read and cart operations against the commerce backend.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List products matching `filter`.
    async fn list_products(
        &self,
        filter: &ProductFilter,
        options: &ListOptions,
    ) -> Result<Vec<Product>, CatalogError>;

    /// List sales regions.
    async fn list_regions(&self) -> Result<Vec<Region>, CatalogError>;

    /// Retrieve a cart. Returns `Ok(None)` if the cart no longer exists.
    async fn retrieve_cart(&self, id: &CartId) -> Result<Option<Cart>, CatalogError>;

    /// Create an empty cart in a region.
    async fn create_cart(&self, region_id: &RegionId) -> Result<Cart, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");

        let err = CatalogError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_list_options_builder() {
        let options = ListOptions::default()
            .select(["id"])
            .order_by("id", SortDirection::Desc)
            .take(3);

        assert_eq!(options.select, vec!["id".to_string()]);
        assert!(options.relations.is_empty());
        assert_eq!(
            options.order,
            Some(SortOrder {
                field: "id".to_string(),
                direction: SortDirection::Desc
            })
        );
        assert_eq!(options.take, Some(3));
    }
}

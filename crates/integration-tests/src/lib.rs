//! Router-level integration tests for the Tailored storefront.
//!
//! Tests drive the real router returned by `tailored_storefront::app` with
//! `tower::ServiceExt::oneshot`, backed by the in-memory catalog and profile
//! store. No network or Redis is needed.
//!
//! ```bash
//! cargo test -p tailored-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use secrecy::SecretString;
use tailored_core::{
    CategoryId, CountryCode, Product, ProductCategory, ProductId, ProductTag, RegionId, TagId,
};
use tailored_storefront::catalog::Region;
use tailored_storefront::catalog::memory::MemoryCatalog;
use tailored_storefront::config::{
    CatalogConfig, DEFAULT_PRODUCTS_MAX_AGE, ProfileStoreConfig, StorefrontConfig,
};
use tailored_storefront::profile::MemoryProfileStore;
use tailored_storefront::state::AppState;
use tower::ServiceExt;

/// Configuration pointing at nothing; the in-memory collaborators stand in.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        catalog: CatalogConfig {
            base_url: "http://catalog.test".to_string(),
            publishable_key: SecretString::from("pk_test_integration"),
            timeout: Duration::from_secs(1),
        },
        profile: ProfileStoreConfig::default(),
        default_country: CountryCode::default(),
        products_max_age: DEFAULT_PRODUCTS_MAX_AGE,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A storefront router with handles on its in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub catalog: MemoryCatalog,
    pub profiles: MemoryProfileStore,
}

impl TestApp {
    /// Build the app over `catalog` with an empty profile store.
    #[must_use]
    pub fn new(catalog: MemoryCatalog) -> Self {
        Self::with_config(catalog, test_config())
    }

    /// Build the app over `catalog` with custom configuration.
    #[must_use]
    pub fn with_config(catalog: MemoryCatalog, config: StorefrontConfig) -> Self {
        let profiles = MemoryProfileStore::new();
        let state = AppState::new(
            config,
            Arc::new(catalog.clone()),
            Arc::new(profiles.clone()),
        );
        Self {
            router: tailored_storefront::app(state, false),
            catalog,
            profiles,
        }
    }

    /// Send a GET request with the given headers.
    pub async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

/// Read a response body as JSON.
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Ids of the products in a JSON array.
#[must_use]
pub fn product_ids(products: &serde_json::Value) -> Vec<String> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

/// A full product record in `category` tagged with `tags`.
#[must_use]
pub fn product(id: &str, category: Option<(&str, &str)>, tags: &[&str]) -> Product {
    let mut product = Product::partial(ProductId::new(id));
    product.title = Some(format!("Product {id}"));
    product.handle = Some(id.to_lowercase());
    product.categories = category
        .map(|(cat_id, name)| {
            vec![ProductCategory {
                id: CategoryId::new(cat_id),
                name: name.to_string(),
                handle: None,
            }]
        })
        .unwrap_or_default();
    product.tags = tags
        .iter()
        .map(|value| ProductTag {
            id: TagId::new(format!("tag_{value}")),
            value: (*value).to_string(),
        })
        .collect();
    product
}

/// A catalog with six products over three categories, two tagged for Europe.
///
/// Ordered newest-first by id, the catalog is
/// `p06(shoes) p05(hats) p04(shoes) p03(-) p02(hats,EU) p01(bags,EU)`.
#[must_use]
pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::new(
        vec![
            product("p01", Some(("cat_bags", "Bags")), &["EU"]),
            product("p02", Some(("cat_hats", "Hats")), &["EU"]),
            product("p03", None, &[]),
            product("p04", Some(("cat_shoes", "Shoes")), &["NA"]),
            product("p05", Some(("cat_hats", "Hats")), &[]),
            product("p06", Some(("cat_shoes", "Shoes")), &["AS"]),
        ],
        vec![Region {
            id: RegionId::new("reg_eu"),
            name: "Europe".to_string(),
            currency_code: Some("eur".to_string()),
        }],
    )
}

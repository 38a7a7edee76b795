//! Store API client for the commerce backend.
//!
//! Uses `reqwest` with a per-request timeout and the publishable key sent as
//! a default header on every request.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tailored_core::{CartId, Product, RegionId};
use tracing::{debug, instrument};
use url::Url;

use super::types::{Cart, CartEnvelope, ProductsEnvelope, Region, RegionsEnvelope};
use super::{CatalogError, CatalogService, ListOptions, ProductFilter, SortDirection};
use crate::config::CatalogConfig;

/// Header carrying the publishable API key.
const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

/// Maximum characters of a response body to include in logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

/// Client for the commerce backend's store API.
#[derive(Clone)]
pub struct MedusaClient {
    inner: Arc<MedusaClientInner>,
}

struct MedusaClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl MedusaClient {
    /// Create a new store API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the publishable key is not a valid header value
    /// or the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            PUBLISHABLE_KEY_HEADER,
            HeaderValue::from_str(config.publishable_key.expose_secret())
                .map_err(|e| CatalogError::InvalidConfig(format!("publishable key: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(MedusaClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> Result<Url, CatalogError> {
        Url::parse(&format!("{}{path}", self.inner.base_url))
            .map_err(|e| CatalogError::InvalidConfig(format!("catalog url: {e}")))
    }

    /// Send a request and decode the JSON body.
    ///
    /// Returns `Ok(None)` on 404 so callers decide whether absence is an error.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&body),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %preview(&body),
                    "Failed to parse catalog API response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Encode filter and options as store API query parameters.
fn product_query(url: &mut Url, filter: &ProductFilter, options: &ListOptions) {
    let mut query = url.query_pairs_mut();

    for tag in &filter.tags {
        query.append_pair("tags[]", tag);
    }
    if !options.select.is_empty() {
        query.append_pair("fields", &options.select.join(","));
    }
    if !options.relations.is_empty() {
        query.append_pair("expand", &options.relations.join(","));
    }
    if let Some(order) = &options.order {
        let value = match order.direction {
            SortDirection::Asc => order.field.clone(),
            SortDirection::Desc => format!("-{}", order.field),
        };
        query.append_pair("order", &value);
    }
    if let Some(limit) = options.take {
        query.append_pair("limit", &limit.to_string());
    }
}

#[async_trait]
impl CatalogService for MedusaClient {
    #[instrument(skip(self), fields(tags = ?filter.tags, take = ?options.take))]
    async fn list_products(
        &self,
        filter: &ProductFilter,
        options: &ListOptions,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut url = self.url("/store/products")?;
        product_query(&mut url, filter, options);

        let envelope: ProductsEnvelope = self
            .execute(self.inner.client.get(url))
            .await?
            .ok_or_else(|| CatalogError::NotFound("products endpoint".to_string()))?;

        debug!(count = envelope.products.len(), "Listed products");
        Ok(envelope.products)
    }

    #[instrument(skip(self))]
    async fn list_regions(&self) -> Result<Vec<Region>, CatalogError> {
        let url = self.url("/store/regions")?;
        let envelope: RegionsEnvelope = self
            .execute(self.inner.client.get(url))
            .await?
            .ok_or_else(|| CatalogError::NotFound("regions endpoint".to_string()))?;
        Ok(envelope.regions)
    }

    #[instrument(skip(self), fields(cart_id = %id))]
    async fn retrieve_cart(&self, id: &CartId) -> Result<Option<Cart>, CatalogError> {
        let mut url = self.url("/store/carts")?;
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidConfig("catalog base url cannot be a base".to_string()))?
            .push(id.as_str());

        let envelope: Option<CartEnvelope> = self.execute(self.inner.client.get(url)).await?;
        Ok(envelope.map(|e| e.cart))
    }

    #[instrument(skip(self), fields(region_id = %region_id))]
    async fn create_cart(&self, region_id: &RegionId) -> Result<Cart, CatalogError> {
        let url = self.url("/store/carts")?;
        let body = serde_json::json!({ "region_id": region_id });

        let envelope: CartEnvelope = self
            .execute(self.inner.client.post(url).json(&body))
            .await?
            .ok_or_else(|| CatalogError::NotFound("carts endpoint".to_string()))?;

        debug!(cart_id = %envelope.cart.id, "Created cart");
        Ok(envelope.cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn client(base_url: &str) -> MedusaClient {
        MedusaClient::new(&CatalogConfig {
            base_url: base_url.to_string(),
            publishable_key: SecretString::from("pk_01HQX7Z3K9M2"),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_personalized_query_encoding() {
        let mut url = Url::parse("http://localhost:9000/store/products").unwrap();
        product_query(
            &mut url,
            &ProductFilter::tagged("EU"),
            &ListOptions::default().select(["id"]).take(3),
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/store/products?tags%5B%5D=EU&fields=id&limit=3"
        );
    }

    #[test]
    fn test_catalog_query_encoding() {
        let mut url = Url::parse("http://localhost:9000/store/products").unwrap();
        product_query(
            &mut url,
            &ProductFilter::default(),
            &ListOptions::default()
                .with_relations(["variants", "categories", "tags"])
                .order_by("id", SortDirection::Desc)
                .take(100),
        );
        assert_eq!(
            url.query(),
            Some("expand=variants%2Ccategories%2Ctags&order=-id&limit=100")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client("http://localhost:9000/");
        assert_eq!(
            client.url("/store/regions").unwrap().as_str(),
            "http://localhost:9000/store/regions"
        );
    }

    #[test]
    fn test_invalid_publishable_key_is_rejected() {
        let result = MedusaClient::new(&CatalogConfig {
            base_url: "http://localhost:9000".to_string(),
            publishable_key: SecretString::from("pk_bad\nkey"),
            timeout: Duration::from_secs(5),
        });
        assert!(matches!(result, Err(CatalogError::InvalidConfig(_))));
    }
}

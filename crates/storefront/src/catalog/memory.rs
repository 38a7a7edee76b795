//! In-memory catalog for tests.
//!
//! Applies tag filters, id-only projection, relation stripping, id ordering
//! and limits the same way the store API does, and can be switched into a
//! failing mode to exercise error paths.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tailored_core::{CartId, Product, RegionId};
use tokio::sync::Mutex;

use super::types::{Cart, Region};
use super::{CatalogError, CatalogService, ListOptions, ProductFilter, SortDirection};

/// In-memory [`CatalogService`].
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<MemoryCatalogInner>,
}

#[derive(Default)]
struct MemoryCatalogInner {
    products: Vec<Product>,
    regions: Vec<Region>,
    carts: Mutex<HashMap<CartId, Cart>>,
    next_cart: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryCatalog {
    /// Create a catalog holding `products` and `regions`.
    #[must_use]
    pub fn new(products: Vec<Product>, regions: Vec<Region>) -> Self {
        Self {
            inner: Arc::new(MemoryCatalogInner {
                products,
                regions,
                ..MemoryCatalogInner::default()
            }),
        }
    }

    /// Make every subsequent call fail with a 503 API error.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Insert a cart directly.
    pub async fn insert_cart(&self, cart: Cart) {
        self.inner.carts.lock().await.insert(cart.id.clone(), cart);
    }

    /// Number of carts created or inserted.
    pub async fn cart_count(&self) -> usize {
        self.inner.carts.lock().await.len()
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Api {
                status: 503,
                message: "catalog unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Apply projection and relation selection to a full record.
fn project(product: &Product, options: &ListOptions) -> Product {
    if options.select.len() == 1 && options.select.iter().all(|f| f == "id") {
        return Product::partial(product.id.clone());
    }

    let wants = |relation: &str| options.relations.iter().any(|r| r == relation);
    let mut projected = product.clone();
    if !wants("categories") {
        projected.categories.clear();
    }
    if !wants("tags") {
        projected.tags.clear();
    }
    if !wants("variants") {
        projected.variants.clear();
    }
    projected
}

#[async_trait]
impl CatalogService for MemoryCatalog {
    async fn list_products(
        &self,
        filter: &ProductFilter,
        options: &ListOptions,
    ) -> Result<Vec<Product>, CatalogError> {
        self.check_available()?;

        let mut matching: Vec<&Product> = self
            .inner
            .products
            .iter()
            .filter(|p| filter.tags.is_empty() || filter.tags.iter().any(|t| p.has_tag(t)))
            .collect();

        if let Some(order) = options.order.as_ref().filter(|o| o.field == "id") {
            matching.sort_by(|a, b| match order.direction {
                SortDirection::Asc => a.id.cmp(&b.id),
                SortDirection::Desc => b.id.cmp(&a.id),
            });
        }

        let limit = options.take.map_or(usize::MAX, |t| t as usize);
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|p| project(p, options))
            .collect())
    }

    async fn list_regions(&self) -> Result<Vec<Region>, CatalogError> {
        self.check_available()?;
        Ok(self.inner.regions.clone())
    }

    async fn retrieve_cart(&self, id: &CartId) -> Result<Option<Cart>, CatalogError> {
        self.check_available()?;
        Ok(self.inner.carts.lock().await.get(id).cloned())
    }

    async fn create_cart(&self, region_id: &RegionId) -> Result<Cart, CatalogError> {
        self.check_available()?;

        let n = self.inner.next_cart.fetch_add(1, Ordering::SeqCst) + 1;
        let cart = Cart {
            id: CartId::new(format!("cart_mem_{n}")),
            region_id: Some(region_id.clone()),
            items: Vec::new(),
        };
        self.insert_cart(cart.clone()).await;
        Ok(cart)
    }
}

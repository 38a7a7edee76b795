//! Concurrent product queries for the listing endpoint.

use tailored_core::{Continent, Product};
use tracing::instrument;

use crate::catalog::{CatalogError, CatalogService, ListOptions, ProductFilter, SortDirection};

/// Number of continent-tagged products in the personalized section.
pub const PERSONALIZED_LIMIT: u32 = 3;

/// Size of the catalog page.
pub const CATALOG_LIMIT: u32 = 100;

/// Results of the two listing queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSets {
    /// Partial (id-only) records tagged with the visitor's continent.
    pub personalized: Vec<Product>,
    /// Full records, newest first.
    pub catalog: Vec<Product>,
}

/// Options for the personalized query: ids only.
#[must_use]
pub fn personalized_options() -> ListOptions {
    ListOptions::default()
        .select(["id"])
        .take(PERSONALIZED_LIMIT)
}

/// Options for the catalog query: full records, newest first.
#[must_use]
pub fn catalog_options() -> ListOptions {
    ListOptions::default()
        .with_relations(["variants", "categories", "tags"])
        .order_by("id", SortDirection::Desc)
        .take(CATALOG_LIMIT)
}

/// Run the personalized and catalog queries concurrently.
///
/// Both queries are in flight before either completes. If either fails the
/// whole fetch fails; there is no partial result.
///
/// # Errors
///
/// Returns the first [`CatalogError`] from either query.
#[instrument(skip(catalog), fields(continent = %continent))]
pub async fn fetch_products(
    catalog: &dyn CatalogService,
    continent: Continent,
) -> Result<ProductSets, CatalogError> {
    let personalized_filter = ProductFilter::tagged(continent.code());
    let personalized_options = personalized_options();
    let catalog_filter = ProductFilter::default();
    let catalog_options = catalog_options();

    let (personalized, catalog) = tokio::try_join!(
        catalog.list_products(&personalized_filter, &personalized_options),
        catalog.list_products(&catalog_filter, &catalog_options),
    )?;

    Ok(ProductSets {
        personalized,
        catalog,
    })
}

//! Personalized product listing.
//!
//! Resolves the visitor, fetches the personalized and catalog product sets
//! concurrently, then reorders the catalog so the visitor's most recently
//! browsed category comes first.

use std::time::Instant;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use tailored_core::{ContinentText, Product};
use tracing::{info, instrument};

use crate::error::{AppError, add_breadcrumb};
use crate::services::{fetch_products, reorder, visitor};
use crate::state::AppState;

/// Response body for `GET /products`.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub personalized_section: PersonalizedSection,
    pub all_products_section: AllProductsSection,
}

/// Products picked for the visitor's continent.
#[derive(Debug, Serialize)]
pub struct PersonalizedSection {
    /// Display name of the resolved country.
    pub country: &'static str,
    pub continent_text: ContinentText,
    pub products: Vec<Product>,
}

/// The full catalog, recent category first.
#[derive(Debug, Serialize)]
pub struct AllProductsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub products: Vec<Product>,
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// `Cache-Control` value for the listing.
fn cache_control(max_age: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={max_age}, must-revalidate"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

/// Display the personalized product listing.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: CookieJar,
) -> Result<Response, AppError> {
    let started = Instant::now();

    let visitor = visitor::resolve(
        state.profiles(),
        &headers,
        &cookies,
        &state.config().default_country,
    )
    .await;
    let resolve_ms = elapsed_ms(started);

    add_breadcrumb(
        "products",
        "Visitor resolved",
        Some(&[
            ("country", visitor.country_code().as_str()),
            ("continent", visitor.continent().code()),
        ]),
    );

    let fetch_started = Instant::now();
    let sets = fetch_products(state.catalog(), visitor.continent()).await?;
    let fetch_ms = elapsed_ms(fetch_started);

    let reorder_started = Instant::now();
    let ordered = reorder(
        sets.catalog,
        &sets.personalized,
        visitor.recent_category_id.as_ref(),
    );
    let reorder_ms = elapsed_ms(reorder_started);

    info!(
        country = %visitor.country_code(),
        recent_category = visitor.recent_category_id.as_ref().map(tailored_core::CategoryId::as_str),
        personalized = ordered.personalized_products.len(),
        catalog = ordered.all_products.len(),
        hydration_gaps = ordered.hydration_gaps.len(),
        resolve_ms,
        fetch_ms,
        reorder_ms,
        total_ms = elapsed_ms(started),
        "Product listing assembled"
    );

    let body = ProductsResponse {
        personalized_section: PersonalizedSection {
            country: visitor.country.name,
            continent_text: visitor.continent_text,
            products: ordered.personalized_products,
        },
        all_products_section: AllProductsSection {
            category_name: visitor.recent_category_name,
            products: ordered.all_products,
        },
    };

    Ok((
        [(
            CACHE_CONTROL,
            cache_control(state.config().products_max_age),
        )],
        Json(body),
    )
        .into_response())
}

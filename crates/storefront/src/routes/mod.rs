//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /products   - Personalized product listing (JSON)
//! GET  /cart       - Current cart, created on first visit (JSON)
//! GET  /health     - Liveness probe
//! GET  /health/ready - Readiness probe (profile store ping)
//! ```
//!
//! Health probes are mounted by [`crate::app`] outside the rate-limited
//! API routes.

pub mod cart;
pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/cart", get(cart::show))
}

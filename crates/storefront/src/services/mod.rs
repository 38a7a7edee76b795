//! Business logic services for storefront.
//!
//! The product listing runs these in order:
//!
//! 1. [`visitor`] - resolve locale and recent-browsing signal
//! 2. [`gateway`] - fetch the personalized and catalog product sets concurrently
//! 3. [`ordering`] - reorder the catalog and hydrate personalized records
//!
//! [`cart`] resolves or creates the visitor's cart.

pub mod cart;
pub mod gateway;
pub mod ordering;
pub mod visitor;

pub use gateway::{ProductSets, fetch_products};
pub use ordering::{OrderedResult, reorder};
pub use visitor::VisitorContext;

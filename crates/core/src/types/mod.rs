//! Core types for Tailored.
//!
//! This module provides type-safe wrappers for common domain concepts.

mod countries;
pub mod id;
pub mod locale;
pub mod product;
pub mod profile;

pub use id::*;
pub use locale::{
    Continent, ContinentText, Country, CountryCode, LookupError, format_continent,
    lookup_country,
};
pub use product::{Product, ProductCategory, ProductTag, ProductVariant};
pub use profile::VisitorProfile;

//! Tailored Core - Shared types library.
//!
//! This crate provides common types used across the Tailored storefront:
//! - `storefront` - Public-facing product listing and cart API
//! - `integration-tests` - Router-level tests against in-memory collaborators
//!
//! # Architecture
//!
//! The core crate contains only types and pure lookups - no I/O, no key-value
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog product records, locale lookups and
//!   visitor profiles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

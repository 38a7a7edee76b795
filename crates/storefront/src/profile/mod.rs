//! Visitor profile store.
//!
//! Profiles are JSON documents keyed by the visitor's identity token and
//! written by the browsing flow (outside this service). This service only
//! reads them.
//!
//! - [`RedisProfileStore`] - production store
//! - [`MemoryProfileStore`] - `moka`-backed store for local development and tests

mod memory;
mod redis_store;

use async_trait::async_trait;
use tailored_core::VisitorProfile;
use thiserror::Error;

pub use memory::MemoryProfileStore;
pub use redis_store::RedisProfileStore;

/// Errors that can occur when reading visitor profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Store command or connection failed.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Stored value is not a valid profile document.
    #[error("Profile decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only key-value access to visitor profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get the profile stored under `token`. A missing key is `Ok(None)`.
    async fn get(&self, token: &str) -> Result<Option<VisitorProfile>, ProfileError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), ProfileError>;
}

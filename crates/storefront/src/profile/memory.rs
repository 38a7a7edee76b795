//! In-memory profile store backed by `moka`.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tailored_core::VisitorProfile;

use super::{ProfileError, ProfileStore};

/// Bounded in-memory profile store.
///
/// Used when no Redis URL is configured. Entries expire after a day so a
/// long-running development server does not grow without bound.
#[derive(Clone)]
pub struct MemoryProfileStore {
    profiles: Cache<String, VisitorProfile>,
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProfileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let profiles = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(24 * 60 * 60))
            .build();
        Self { profiles }
    }

    /// Store a profile under `token`.
    pub async fn insert(&self, token: impl Into<String>, profile: VisitorProfile) {
        self.profiles.insert(token.into(), profile).await;
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, token: &str) -> Result<Option<VisitorProfile>, ProfileError> {
        Ok(self.profiles.get(token).await)
    }

    async fn ping(&self) -> Result<(), ProfileError> {
        Ok(())
    }
}

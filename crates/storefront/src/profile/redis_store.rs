//! Redis-backed profile store.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use secrecy::{ExposeSecret, SecretString};
use tailored_core::VisitorProfile;
use tracing::{debug, instrument};

use super::{ProfileError, ProfileStore};

/// Profile store reading JSON documents from Redis.
///
/// `ConnectionManager` reconnects transparently and is cheap to clone, so
/// each call works on its own clone instead of locking a shared connection.
#[derive(Clone)]
pub struct RedisProfileStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisProfileStore {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the initial connection fails.
    pub async fn connect(url: &SecretString, key_prefix: &str) -> Result<Self, ProfileError> {
        let client = redis::Client::open(url.expose_secret())?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key(&self, token: &str) -> String {
        format!("{}{token}", self.key_prefix)
    }
}

#[async_trait]
impl ProfileStore for RedisProfileStore {
    #[instrument(skip(self, token))]
    async fn get(&self, token: &str) -> Result<Option<VisitorProfile>, ProfileError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.key(token)).await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => {
                debug!("No profile stored for visitor");
                Ok(None)
            }
        }
    }

    async fn ping(&self) -> Result<(), ProfileError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await?;
        Ok(())
    }
}

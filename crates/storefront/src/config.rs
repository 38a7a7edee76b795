//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_BASE_URL` - Commerce backend base URL (e.g., <https://commerce.internal:9000>)
//! - `CATALOG_PUBLISHABLE_KEY` - Publishable API key for the store endpoints
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_TIMEOUT_SECS` - Per-request catalog timeout (default: 10)
//! - `PROFILE_REDIS_URL` - Visitor profile store (default: in-memory store)
//! - `PROFILE_KEY_PREFIX` - Prefix prepended to visitor tokens (default: empty)
//! - `DEFAULT_COUNTRY` - Fallback country code when no geo header is present (default: US)
//! - `PRODUCTS_CACHE_MAX_AGE` - `max-age` for the product listing, in seconds (default: 604800)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use tailored_core::{CountryCode, lookup_country};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Seven days, matching the listing's revalidation window.
pub const DEFAULT_PRODUCTS_MAX_AGE: u64 = 604_800;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Commerce backend configuration
    pub catalog: CatalogConfig,
    /// Visitor profile store configuration
    pub profile: ProfileStoreConfig,
    /// Country used when no country header is present or it cannot be resolved
    pub default_country: CountryCode,
    /// `max-age` directive for the product listing response
    pub products_max_age: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Commerce backend configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL of the store API (no trailing slash)
    pub base_url: String,
    /// Publishable API key (server-side only)
    pub publishable_key: SecretString,
    /// Timeout applied to every catalog request
    pub timeout: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("publishable_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Visitor profile store configuration.
///
/// Implements `Debug` manually to redact the connection URL.
#[derive(Clone, Default)]
pub struct ProfileStoreConfig {
    /// Redis connection URL (may contain a password). `None` selects the
    /// in-memory store.
    pub redis_url: Option<SecretString>,
    /// Prefix prepended to visitor tokens to form the store key
    pub key_prefix: String,
}

impl std::fmt::Debug for ProfileStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStoreConfig")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;

        let catalog = CatalogConfig::from_env()?;
        let profile = ProfileStoreConfig::from_env();

        let default_country =
            parse_default_country(&get_env_or_default("DEFAULT_COUNTRY", "US"))?;
        let products_max_age =
            parse_env("PRODUCTS_CACHE_MAX_AGE", &DEFAULT_PRODUCTS_MAX_AGE.to_string())?;

        Ok(Self {
            host,
            port,
            catalog,
            profile,
            default_country,
            products_max_age,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            normalize_base_url("CATALOG_BASE_URL", &get_required_env("CATALOG_BASE_URL")?)?;
        let timeout_secs: u64 = parse_env("CATALOG_TIMEOUT_SECS", "10")?;

        Ok(Self {
            base_url,
            publishable_key: get_validated_secret("CATALOG_PUBLISHABLE_KEY")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl ProfileStoreConfig {
    fn from_env() -> Self {
        Self {
            redis_url: get_optional_env("PROFILE_REDIS_URL").map(SecretString::from),
            key_prefix: get_env_or_default("PROFILE_KEY_PREFIX", ""),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate the fallback country against the country table.
fn parse_default_country(value: &str) -> Result<CountryCode, ConfigError> {
    let invalid = |e: tailored_core::LookupError| {
        ConfigError::InvalidEnvVar("DEFAULT_COUNTRY".to_string(), e.to_string())
    };
    let code = CountryCode::parse(value).map_err(invalid)?;
    lookup_country(&code).map_err(invalid)?;
    Ok(code)
}

/// Check that a base URL is absolute http(s) and strip any trailing slash.
fn normalize_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys are random, so low entropy means a hand-typed value
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the commerce backend."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

//! Rate limiting middleware using governor and `tower_governor`.
//!
//! The personalized listing fans out to the catalog service on every call,
//! so API routes are limited per client IP (~100/min).

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Headers carrying the real client IP, in the order they are trusted.
///
/// `x-forwarded-for` may hold a chain; only its first entry is used.
const CLIENT_IP_HEADERS: [&str; 4] = [
    "x-vercel-forwarded-for",
    "x-real-ip",
    "x-forwarded-for",
    "cf-connecting-ip",
];

/// Key extractor that reads the client IP from edge proxy headers.
#[derive(Clone, Copy)]
pub struct EdgeIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for EdgeIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        CLIENT_IP_HEADERS
            .iter()
            .find_map(|name| {
                headers
                    .get(*name)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.split(',').next())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<EdgeIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for API routes: ~100 requests per minute per IP.
///
/// Configuration: 1 request per second (replenish), burst of 50.
///
/// # Panics
///
/// This function will not panic. `per_second(1)` and `burst_size(50)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(EdgeIpKeyExtractor)
        .per_second(1)
        .burst_size(50)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(50) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tower_governor::key_extractor::KeyExtractor;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/products");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_vercel_header_wins() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("x-vercel-forwarded-for", "203.0.113.7"),
        ]);
        let ip = EdgeIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_forwarded_chain_uses_first_entry() {
        let req = request(&[("x-forwarded-for", "198.51.100.2, 10.0.0.1")]);
        let ip = EdgeIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip, "198.51.100.2".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_unparseable_header_falls_through() {
        let req = request(&[("x-real-ip", "unknown"), ("cf-connecting-ip", "2001:db8::1")]);
        let ip = EdgeIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip, "2001:db8::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_missing_headers() {
        let req = request(&[]);
        assert!(EdgeIpKeyExtractor.extract(&req).is_err());
    }
}

//! Visitor context resolution.
//!
//! Derives the visitor's locale and recent-browsing signal from request
//! headers, the identity cookie and the profile store. Every failure on this
//! path degrades to a default instead of failing the request: an unreadable
//! profile counts as empty and an unknown country falls back to the
//! configured default.

use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use serde::Serialize;
use tailored_core::{
    CategoryId, Continent, ContinentText, Country, CountryCode, LookupError, VisitorProfile,
    format_continent, lookup_country,
};
use tracing::{debug, instrument, warn};

use crate::profile::ProfileStore;

/// Cookie carrying the visitor identity token.
pub const VISITOR_COOKIE: &str = "userId";

/// Explicit country override, for testing and simulation.
pub const SIMULATED_COUNTRY_HEADER: &str = "x-simulated-country";

/// Country inferred by the edge network.
pub const GEO_COUNTRY_HEADER: &str = "x-vercel-ip-country";

/// Country headers in priority order.
const COUNTRY_HEADERS: [&str; 2] = [SIMULATED_COUNTRY_HEADER, GEO_COUNTRY_HEADER];

/// Per-request visitor context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorContext {
    pub country: Country,
    pub continent_text: ContinentText,
    pub recent_category_id: Option<CategoryId>,
    pub recent_category_name: Option<String>,
}

impl VisitorContext {
    fn new(country: Country, profile: VisitorProfile) -> Self {
        let continent_text = format_continent(country.continent);
        Self {
            country,
            continent_text,
            recent_category_id: profile.category_id.filter(|id| !id.as_str().is_empty()),
            recent_category_name: profile.category_name,
        }
    }

    #[must_use]
    pub const fn continent(&self) -> Continent {
        self.country.continent
    }

    #[must_use]
    pub const fn country_code(&self) -> &CountryCode {
        &self.country.code
    }
}

/// Resolve the visitor context for a request.
pub async fn resolve(
    profiles: &dyn ProfileStore,
    headers: &HeaderMap,
    cookies: &CookieJar,
    default_country: &CountryCode,
) -> VisitorContext {
    let token = cookies
        .get(VISITOR_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty());

    let profile = match token {
        Some(token) => load_profile(profiles, token).await,
        None => VisitorProfile::default(),
    };

    VisitorContext::new(resolve_country(headers, default_country), profile)
}

#[instrument(skip_all)]
async fn load_profile(profiles: &dyn ProfileStore, token: &str) -> VisitorProfile {
    match profiles.get(token).await {
        Ok(profile) => profile.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Visitor profile lookup failed, continuing without it");
            VisitorProfile::default()
        }
    }
}

/// Pick the country from headers in priority order.
///
/// The first header that resolves wins. Unresolvable values are skipped,
/// then the default country is used, then `US`.
#[must_use]
pub fn resolve_country(headers: &HeaderMap, default_country: &CountryCode) -> Country {
    COUNTRY_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .find_map(|value| {
            let raw = value.to_str().unwrap_or_default();
            match resolve_code(raw) {
                Ok(country) => Some(country),
                Err(e) => {
                    debug!(error = %e, "Ignoring unresolvable country header");
                    None
                }
            }
        })
        .or_else(|| lookup_country(default_country).ok())
        .unwrap_or_default()
}

fn resolve_code(raw: &str) -> Result<Country, LookupError> {
    lookup_country(&CountryCode::parse(raw)?)
}

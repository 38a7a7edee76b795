//! Country and continent lookups.
//!
//! Country codes arrive from request headers (an explicit override or an
//! edge-network geo header) and are mapped to a display name and continent
//! through a static ISO 3166-1 alpha-2 table. Continents are used as the
//! personalization tag filter against the catalog.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::countries::COUNTRIES;

/// Errors that can occur when resolving a country code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The input is not two ASCII letters.
    #[error("malformed country code: {0:?}")]
    Malformed(String),
    /// The code is well-formed but not in the country table.
    #[error("unknown country code: {0}")]
    UnknownCountry(String),
}

/// An ISO 3166-1 alpha-2 country code, stored upper-case.
///
/// ## Examples
///
/// ```
/// use tailored_core::CountryCode;
///
/// assert_eq!(CountryCode::parse(" de ").unwrap().as_str(), "DE");
/// assert!(CountryCode::parse("DEU").is_err());
/// assert!(CountryCode::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a country code, trimming whitespace and upper-casing.
    ///
    /// Only the shape is checked here; use [`lookup_country`] to check that
    /// the code is assigned.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Malformed`] unless the trimmed input is exactly
    /// two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, LookupError> {
        let trimmed = s.trim();
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(LookupError::Malformed(s.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The fallback country, `US`.
impl Default for CountryCode {
    fn default() -> Self {
        Self("US".to_owned())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A continent, serialized as its two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "AF")]
    Africa,
    #[serde(rename = "AN")]
    Antarctica,
    #[serde(rename = "AS")]
    Asia,
    #[serde(rename = "EU")]
    Europe,
    #[serde(rename = "NA")]
    NorthAmerica,
    #[serde(rename = "OC")]
    Oceania,
    #[serde(rename = "SA")]
    SouthAmerica,
}

impl Continent {
    /// Two-letter continent code. This is also the catalog tag value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Africa => "AF",
            Self::Antarctica => "AN",
            Self::Asia => "AS",
            Self::Europe => "EU",
            Self::NorthAmerica => "NA",
            Self::Oceania => "OC",
            Self::SouthAmerica => "SA",
        }
    }

    /// Human-readable continent name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Antarctica => "Antarctica",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::Oceania => "Oceania",
            Self::SouthAmerica => "South America",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Display form of a continent for headings such as
/// "Picked for a European shopper".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContinentText {
    /// Indefinite article matching the adjective ("a" or "an").
    pub article: &'static str,
    /// Adjective form of the continent (e.g., "European").
    pub name: &'static str,
}

/// A resolved country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    pub code: CountryCode,
    pub name: &'static str,
    pub continent: Continent,
}

/// The fallback country. Always resolvable without a table lookup.
impl Default for Country {
    fn default() -> Self {
        Self {
            code: CountryCode::default(),
            name: "United States",
            continent: Continent::NorthAmerica,
        }
    }
}

/// Look up a country by code.
///
/// # Errors
///
/// Returns [`LookupError::UnknownCountry`] if the code is not assigned.
pub fn lookup_country(code: &CountryCode) -> Result<Country, LookupError> {
    COUNTRIES
        .binary_search_by(|(c, _, _)| (*c).cmp(code.as_str()))
        .ok()
        .and_then(|idx| COUNTRIES.get(idx))
        .map(|&(_, name, continent)| Country {
            code: code.clone(),
            name,
            continent,
        })
        .ok_or_else(|| LookupError::UnknownCountry(code.to_string()))
}

/// Format a continent for display.
#[must_use]
pub const fn format_continent(continent: Continent) -> ContinentText {
    let (article, name) = match continent {
        Continent::Africa => ("an", "African"),
        Continent::Antarctica => ("an", "Antarctic"),
        Continent::Asia => ("an", "Asian"),
        // "European" starts with a consonant sound
        Continent::Europe => ("a", "European"),
        Continent::NorthAmerica => ("a", "North American"),
        Continent::Oceania => ("an", "Oceanian"),
        Continent::SouthAmerica => ("a", "South American"),
    };
    ContinentText { article, name }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(CountryCode::parse("us").unwrap().as_str(), "US");
        assert_eq!(CountryCode::parse("  fr\t").unwrap().as_str(), "FR");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "U", "USA", "1A", "é"] {
            assert!(
                matches!(CountryCode::parse(input), Err(LookupError::Malformed(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_lookup_us() {
        let country = lookup_country(&CountryCode::parse("US").unwrap()).unwrap();
        assert_eq!(country.name, "United States");
        assert_eq!(country.continent, Continent::NorthAmerica);
    }

    #[test]
    fn test_default_country_matches_table() {
        let country = Country::default();
        assert_eq!(lookup_country(&country.code).unwrap(), country);
    }

    #[test]
    fn test_lookup_unknown() {
        let code = CountryCode::parse("ZZ").unwrap();
        assert_eq!(
            lookup_country(&code),
            Err(LookupError::UnknownCountry("ZZ".to_string()))
        );
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(COUNTRIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_every_table_entry_resolves() {
        for (code, name, continent) in COUNTRIES {
            let country = lookup_country(&CountryCode::parse(code).unwrap()).unwrap();
            assert_eq!(country.name, *name);
            assert_eq!(country.continent, *continent);
        }
    }

    #[test]
    fn test_continent_codes_match_display() {
        let continents = [
            Continent::Africa,
            Continent::Antarctica,
            Continent::Asia,
            Continent::Europe,
            Continent::NorthAmerica,
            Continent::Oceania,
            Continent::SouthAmerica,
        ];
        let mut codes: Vec<&str> = continents.iter().map(|c| c.code()).collect();
        for continent in continents {
            assert_eq!(continent.to_string(), continent.code());
        }
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), continents.len());
    }

    #[test]
    fn test_continent_serializes_as_code() {
        assert_eq!(
            serde_json::to_string(&Continent::Europe).unwrap(),
            "\"EU\""
        );
    }

    #[test]
    fn test_format_continent() {
        assert_eq!(
            format_continent(Continent::Europe),
            ContinentText {
                article: "a",
                name: "European"
            }
        );
        assert_eq!(format_continent(Continent::Asia).article, "an");
        assert_eq!(format_continent(Continent::NorthAmerica).name, "North American");
    }
}

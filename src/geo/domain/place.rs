//! Results returned by geocoding and postal-code collaborators.

use super::{Coordinates, GeoDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Country suffix appended to geocoding queries.
pub const COUNTRY_NAME: &str = "Brasil";

/// A geocoded location with the provider's display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    /// Resolved coordinates.
    pub coordinates: Coordinates,
    /// Human-readable label returned by the provider.
    pub display_name: String,
}

impl GeocodedPlace {
    /// Creates a geocoded place.
    #[must_use]
    pub fn new(coordinates: Coordinates, display_name: impl Into<String>) -> Self {
        Self {
            coordinates,
            display_name: display_name.into(),
        }
    }
}

/// Brazilian postal code (CEP) normalised to its eight digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    const DIGITS: usize = 8;

    /// Normalises a postal code by stripping every non-digit.
    ///
    /// # Errors
    ///
    /// Returns [`GeoDomainError::InvalidPostalCode`] unless exactly eight
    /// digits remain.
    pub fn new(raw: &str) -> Result<Self, GeoDomainError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != Self::DIGITS {
            return Err(GeoDomainError::InvalidPostalCode(raw.to_owned()));
        }
        Ok(Self(digits))
    }

    /// Returns the eight digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Street-level address resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    /// The looked-up postal code.
    pub postal_code: PostalCode,
    /// Street name; empty for city-wide codes.
    pub street: String,
    /// Neighbourhood; empty for city-wide codes.
    pub neighbourhood: String,
    /// City name.
    pub city: String,
    /// Two-letter state code.
    pub state: String,
}

impl PostalAddress {
    /// Single-line address in the `street, neighbourhood, city - state` form.
    #[must_use]
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.street, self.neighbourhood, self.city, self.state
        )
    }

    /// Geocoding query built from the non-empty components.
    #[must_use]
    pub fn geocoding_query(&self) -> String {
        [
            self.street.as_str(),
            self.neighbourhood.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            COUNTRY_NAME,
        ]
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// City-level geocoding query.
    #[must_use]
    pub fn city_query(&self) -> String {
        format!("{}, {}, {COUNTRY_NAME}", self.city, self.state)
    }
}

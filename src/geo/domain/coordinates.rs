//! Validated latitude/longitude pairs.

use super::{GeoDomainError, Kilometres, haversine};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = GeoDomainError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeoDomainError::InvalidLatitude`] or
    /// [`GeoDomainError::InvalidLongitude`] when a component is not finite
    /// or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoDomainError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoDomainError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoDomainError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds coordinates from a pair of nullable persisted columns.
    ///
    /// Returns `Ok(None)` unless both components are present.
    ///
    /// # Errors
    ///
    /// Returns [`GeoDomainError`] when present components are out of range.
    pub fn from_optional(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, GeoDomainError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    /// Returns the latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> Kilometres {
        haversine(self, other)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

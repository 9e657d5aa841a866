//! Haversine distance and search radii.

use super::{Coordinates, GeoDomainError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A non-negative distance in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilometres(f64);

impl Kilometres {
    pub(crate) const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the raw distance.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns the distance rounded to one decimal place for display.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "display rounding is inherently floating point"
    )]
    pub fn rounded(self) -> Self {
        Self((self.0 * 10.0).round() / 10.0)
    }

    /// Total ordering suitable for sorting result sets.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Kilometres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km", self.0)
    }
}

/// Caller-supplied search radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Radius(f64);

impl Radius {
    /// Default radius when employers look for diarists.
    pub const NEARBY_DIARISTS: Self = Self(10.0);

    /// Default radius when diarists look for employers.
    pub const NEARBY_EMPLOYERS: Self = Self(50.0);

    /// Default radius when diarists browse open jobs.
    pub const AVAILABLE_JOBS: Self = Self(50.0);

    /// Creates a validated radius in kilometres.
    ///
    /// # Errors
    ///
    /// Returns [`GeoDomainError::InvalidRadius`] when the value is negative
    /// or not finite.
    pub fn new(kilometres: f64) -> Result<Self, GeoDomainError> {
        if !kilometres.is_finite() || kilometres < 0.0 {
            return Err(GeoDomainError::InvalidRadius(kilometres));
        }
        Ok(Self(kilometres))
    }

    /// Returns the radius in kilometres.
    #[must_use]
    pub const fn kilometres(self) -> f64 {
        self.0
    }

    /// Returns whether `distance` lies inside the radius (inclusive).
    #[must_use]
    pub fn contains(self, distance: Kilometres) -> bool {
        distance.value() <= self.0
    }
}

/// Great-circle distance between two points using the haversine formula.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine is defined over floating point trigonometry"
)]
pub fn haversine(from: Coordinates, to: Coordinates) -> Kilometres {
    let from_lat = from.latitude().to_radians();
    let to_lat = to.latitude().to_radians();
    let half_delta_lat = ((to.latitude() - from.latitude()).to_radians() / 2.0).sin();
    let half_delta_lon = ((to.longitude() - from.longitude()).to_radians() / 2.0).sin();

    let raw = half_delta_lat.mul_add(
        half_delta_lat,
        from_lat.cos() * to_lat.cos() * half_delta_lon * half_delta_lon,
    );
    // Rounding can push `a` marginally past 1 for antipodal points.
    let a = raw.clamp(0.0, 1.0);
    let central_angle = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    Kilometres::new(EARTH_RADIUS_KM * central_angle)
}

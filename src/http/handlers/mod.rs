//! Request handlers grouped by resource.

pub mod discovery;
pub mod geo;
pub mod health;
pub mod jobs;
pub mod profiles;

use super::error::ApiError;
use crate::geo::domain::Coordinates;
use serde::Serialize;

/// Builds coordinates from an optional latitude/longitude pair.
///
/// Both halves or neither must be present.
fn coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<Coordinates>, ApiError> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Ok(Some(Coordinates::new(lat, lon)?)),
        (None, None) => Ok(None),
        _ => Err(ApiError::validation(
            "latitude and longitude must be supplied together",
        )),
    }
}

/// A point in the `{ lat, lon }` shape used by the web client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl From<Coordinates> for LatLon {
    fn from(point: Coordinates) -> Self {
        Self {
            lat: point.latitude(),
            lon: point.longitude(),
        }
    }
}

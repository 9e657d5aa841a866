//! Geocoding and postal-code proxies for the web client.

use super::{LatLon, coordinates};
use crate::geo::domain::GeocodedPlace;
use crate::http::{error::ApiError, state::AppState};
use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

/// Query of `GET /geocode`: an address, or a point to reverse-geocode.
#[derive(Debug, Default, Deserialize)]
pub struct GeocodeQuery {
    /// Free-text address.
    pub address: Option<String>,
    /// Latitude for reverse geocoding.
    pub lat: Option<f64>,
    /// Longitude for reverse geocoding.
    pub lon: Option<f64>,
}

/// A geocoding answer.
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    /// Resolved point.
    #[serde(flatten)]
    pub point: LatLon,
    /// Provider label.
    pub display_name: String,
}

impl From<GeocodedPlace> for GeocodeResponse {
    fn from(place: GeocodedPlace) -> Self {
        Self {
            point: place.coordinates.into(),
            display_name: place.display_name,
        }
    }
}

/// A postal-code answer.
#[derive(Debug, Serialize)]
pub struct PostalCodeResponse {
    /// The eight digits.
    pub cep: String,
    /// Street name.
    pub address: String,
    /// Neighbourhood.
    pub neighborhood: String,
    /// City.
    pub city: String,
    /// State code.
    pub state: String,
    /// `street, neighbourhood, city - state`.
    pub full_address: String,
}

/// `GET /geocode`
///
/// # Errors
///
/// Fails when neither an address nor a point is given, nothing matches, or
/// the provider is unavailable.
pub async fn geocode(
    State(state): State<AppState>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let Query(params) = query?;
    let place = match (params.address, coordinates(params.lat, params.lon)?) {
        (Some(address), _) => state.addresses.resolve_free_text(&address).await?,
        (None, Some(point)) => state.addresses.reverse(point).await?,
        (None, None) => return Err(ApiError::validation("address is required")),
    };
    Ok(Json(place.into()))
}

/// `GET /cep/{cep}`
///
/// # Errors
///
/// Fails for malformed or unknown postal codes and provider outages.
pub async fn postal_code(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<PostalCodeResponse>, ApiError> {
    let Path(raw) = path?;
    let found = state.addresses.lookup_postal_code(&raw).await?;
    Ok(Json(PostalCodeResponse {
        cep: found.postal_code.as_str().to_owned(),
        full_address: found.full_address(),
        address: found.street,
        neighborhood: found.neighbourhood,
        city: found.city,
        state: found.state,
    }))
}

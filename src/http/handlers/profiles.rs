//! Profile creation and location updates for the calling actor.

use super::{LatLon, coordinates};
use crate::geo::services::AddressInput;
use crate::http::{auth::AuthenticatedActor, error::ApiError, state::AppState};
use crate::profile::{
    domain::{Profile, Role},
    services::CreateProfileRequest,
};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Body of `POST /profiles`.
#[derive(Debug, Deserialize)]
pub struct CreateProfileBody {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// `employer` or `diarist`.
    pub role: String,
}

/// Body of `POST /profiles/update-coordinates`.
///
/// Explicit coordinates win; otherwise the address parts are geocoded.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCoordinatesBody {
    /// Street and number.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State code.
    pub state: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Device latitude.
    pub latitude: Option<f64>,
    /// Device longitude.
    pub longitude: Option<f64>,
}

/// A single profile.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The profile record.
    pub profile: Profile,
}

/// Result of a coordinate update.
#[derive(Debug, Serialize)]
pub struct CoordinatesUpdated {
    /// Always `true`; failures use the error body.
    pub success: bool,
    /// The stored location.
    pub coordinates: Option<LatLon>,
    /// The updated profile.
    pub profile: Profile,
}

/// `POST /profiles`
///
/// # Errors
///
/// Fails for unknown roles, invalid fields, and existing profiles.
pub async fn create_profile(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    body: Result<Json<CreateProfileBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let Json(payload) = body?;
    let role = Role::try_from(payload.role.as_str())?;
    let request = CreateProfileRequest::new(actor, role, payload.name, payload.email);
    let profile = state.profiles.create_profile(request).await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse { profile })))
}

/// `GET /profiles/me`
///
/// # Errors
///
/// Fails when the actor has no profile.
pub async fn my_profile(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profiles.find_profile(actor).await?;
    Ok(Json(ProfileResponse { profile }))
}

/// `POST /profiles/update-coordinates`
///
/// # Errors
///
/// Fails for incomplete or unknown addresses and geocoder outages.
pub async fn update_coordinates(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    body: Result<Json<UpdateCoordinatesBody>, JsonRejection>,
) -> Result<Json<CoordinatesUpdated>, ApiError> {
    let Json(payload) = body?;
    let profile = match coordinates(payload.latitude, payload.longitude)? {
        Some(point) => state.profiles.set_coordinates(actor, point).await?,
        None => {
            let input = AddressInput {
                address: payload.address,
                city: payload.city,
                state: payload.state,
                zip_code: payload.zip_code,
            };
            state
                .profiles
                .update_coordinates_from_address(actor, input)
                .await?
        }
    };
    Ok(Json(CoordinatesUpdated {
        success: true,
        coordinates: profile.location().map(LatLon::from),
        profile,
    }))
}

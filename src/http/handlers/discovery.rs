//! Radius-filtered job and profile listings.

use super::{coordinates, jobs::JobListResponse};
use crate::geo::domain::{Coordinates, Radius, Ranked};
use crate::http::{auth::AuthenticatedActor, error::ApiError, state::AppState};
use crate::job::domain::Job;
use crate::profile::domain::{Profile, Role, UserId};
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

/// Reference point and radius accepted by discovery routes.
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    /// Reference latitude.
    pub lat: Option<f64>,
    /// Reference longitude.
    pub lon: Option<f64>,
    /// Radius in kilometres.
    pub radius: Option<f64>,
}

impl LocationQuery {
    fn reference(&self) -> Result<Option<Coordinates>, ApiError> {
        coordinates(self.lat, self.lon)
    }

    fn radius_or(&self, default: Radius) -> Result<Radius, ApiError> {
        Ok(self.radius.map(Radius::new).transpose()?.unwrap_or(default))
    }
}

/// Profiles near a reference point.
#[derive(Debug, Serialize)]
pub struct NearbyDiaristsResponse {
    /// Matching diarists, nearest first.
    pub diarists: Vec<Ranked<Profile>>,
    /// Number of matches.
    pub count: usize,
}

/// Employers near a reference point.
#[derive(Debug, Serialize)]
pub struct NearbyEmployersResponse {
    /// Matching employers, nearest first.
    pub employers: Vec<Ranked<Profile>>,
    /// Number of matches.
    pub count: usize,
}

/// `GET /jobs/available`
///
/// # Errors
///
/// Fails for non-diarists and malformed query parameters.
pub async fn available_jobs(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<JobListResponse<Ranked<Job>>>, ApiError> {
    let Query(params) = query?;
    let radius = params.radius_or(Radius::AVAILABLE_JOBS)?;
    let jobs = state
        .discovery
        .available_jobs(actor, params.reference()?, radius)
        .await?;
    Ok(Json(jobs.into()))
}

/// `GET /jobs/map`
///
/// # Errors
///
/// Fails when no reference point is available.
pub async fn map_jobs(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<JobListResponse<Ranked<Job>>>, ApiError> {
    let Query(params) = query?;
    let radius = params.radius_or(Radius::AVAILABLE_JOBS)?;
    let center = state
        .discovery
        .reference_point(actor, params.reference()?)
        .await?;
    let jobs = state.discovery.map_jobs(center, radius).await?;
    Ok(Json(jobs.into()))
}

async fn nearby(
    state: &AppState,
    actor: UserId,
    params: &LocationQuery,
    role: Role,
    default_radius: Radius,
) -> Result<Vec<Ranked<Profile>>, ApiError> {
    let radius = params.radius_or(default_radius)?;
    let center = state
        .discovery
        .reference_point(actor, params.reference()?)
        .await?;
    Ok(state
        .discovery
        .nearby_profiles(role, center, radius)
        .await?)
}

/// `GET /diarists/nearby`
///
/// # Errors
///
/// Fails when no reference point is available.
pub async fn nearby_diarists(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<NearbyDiaristsResponse>, ApiError> {
    let Query(params) = query?;
    let diarists = nearby(&state, actor, &params, Role::Diarist, Radius::NEARBY_DIARISTS).await?;
    Ok(Json(NearbyDiaristsResponse {
        count: diarists.len(),
        diarists,
    }))
}

/// `GET /employers/nearby`
///
/// # Errors
///
/// Fails when no reference point is available.
pub async fn nearby_employers(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<NearbyEmployersResponse>, ApiError> {
    let Query(params) = query?;
    let employers =
        nearby(&state, actor, &params, Role::Employer, Radius::NEARBY_EMPLOYERS).await?;
    Ok(Json(NearbyEmployersResponse {
        count: employers.len(),
        employers,
    }))
}

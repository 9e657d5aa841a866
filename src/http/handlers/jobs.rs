//! Job posting, lookup, and status transitions.

use super::coordinates;
use crate::http::{auth::AuthenticatedActor, error::ApiError, state::AppState};
use crate::job::{
    domain::{Job, JobDetails, JobId, JobStatus},
    services::CreateJobRequest,
};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /jobs`.
#[derive(Debug, Deserialize)]
pub struct CreateJobBody {
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Kind of cleaning service.
    pub service_type: String,
    /// Street address of the job.
    pub address: String,
    /// Price in cents.
    pub price_cents: u64,
    /// Expected duration in minutes.
    pub duration_minutes: u32,
    /// When the job is scheduled.
    pub scheduled_at: DateTime<Utc>,
    /// Explicit latitude; skips geocoding together with `longitude`.
    pub latitude: Option<f64>,
    /// Explicit longitude.
    pub longitude: Option<f64>,
}

/// Body of `POST /jobs/{id}/update-status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    /// Requested status.
    pub status: String,
}

/// A single job.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    /// The job record.
    pub job: Job,
}

/// The actor's current active job, if any.
#[derive(Debug, Serialize)]
pub struct ActiveJobResponse {
    /// The accepted or in-progress job.
    pub job: Option<Job>,
}

/// A list of jobs.
#[derive(Debug, Serialize)]
pub struct JobListResponse<T> {
    /// The jobs.
    pub jobs: Vec<T>,
    /// Number of jobs returned.
    pub count: usize,
}

impl<T> From<Vec<T>> for JobListResponse<T> {
    fn from(jobs: Vec<T>) -> Self {
        Self {
            count: jobs.len(),
            jobs,
        }
    }
}

fn job_id(path: Result<Path<String>, PathRejection>) -> Result<JobId, ApiError> {
    let Path(raw) = path?;
    raw.parse()
        .map_err(|_| ApiError::validation(format!("invalid job id '{raw}'")))
}

/// `POST /jobs`
///
/// # Errors
///
/// Fails for non-employers, invalid details, or storage failures.
pub async fn create_job(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    body: Result<Json<CreateJobBody>, JsonRejection>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let Json(payload) = body?;
    let location = coordinates(payload.latitude, payload.longitude)?;
    let details = JobDetails {
        title: payload.title,
        description: payload.description,
        service_type: payload.service_type,
        address: payload.address,
        price_cents: payload.price_cents,
        duration_minutes: payload.duration_minutes,
        scheduled_at: payload.scheduled_at,
    };
    let request = match location {
        Some(point) => CreateJobRequest::new(details).with_coordinates(point),
        None => CreateJobRequest::new(details),
    };
    let job = state.jobs.create_job(actor, request).await?;
    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

/// `GET /jobs/{id}`
///
/// # Errors
///
/// Fails for malformed or unknown identifiers.
pub async fn get_job(
    State(state): State<AppState>,
    AuthenticatedActor(_actor): AuthenticatedActor,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<JobResponse>, ApiError> {
    let id = job_id(path)?;
    let job = state.jobs.find_job(id).await?;
    Ok(Json(JobResponse { job }))
}

/// `POST /jobs/{id}/update-status`
///
/// # Errors
///
/// Fails for unknown statuses, refused transitions, and lost races.
pub async fn update_status(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<JobResponse>, ApiError> {
    let id = job_id(path)?;
    let Json(payload) = body?;
    let target: JobStatus = payload.status.parse()?;
    let job = state.jobs.update_status(id, actor, target).await?;
    Ok(Json(JobResponse { job }))
}

/// `GET /jobs/mine`
///
/// # Errors
///
/// Fails when the actor has no profile.
pub async fn my_jobs(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<JobListResponse<Job>>, ApiError> {
    let jobs = state.jobs.jobs_for_actor(actor).await?;
    Ok(Json(jobs.into()))
}

/// `GET /jobs/active`
///
/// # Errors
///
/// Fails for employers and actors without a profile.
pub async fn active_job(
    State(state): State<AppState>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<ActiveJobResponse>, ApiError> {
    let job = state.jobs.active_job_for_diarist(actor).await?;
    Ok(Json(ActiveJobResponse { job }))
}

//! Route table.

use super::handlers::{discovery, geo, health, jobs, profiles};
use super::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Builds the application router over `state`.
#[must_use]
pub fn router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health::health))
        .route("/jobs", post(jobs::create_job))
        .route("/jobs/mine", get(jobs::my_jobs))
        .route("/jobs/active", get(jobs::active_job))
        .route("/jobs/available", get(discovery::available_jobs))
        .route("/jobs/map", get(discovery::map_jobs))
        .route("/jobs/{id}", get(jobs::get_job))
        .route("/jobs/{id}/update-status", post(jobs::update_status))
        .route("/diarists/nearby", get(discovery::nearby_diarists))
        .route("/employers/nearby", get(discovery::nearby_employers))
        .route("/profiles", post(profiles::create_profile))
        .route("/profiles/me", get(profiles::my_profile))
        .route(
            "/profiles/update-coordinates",
            post(profiles::update_coordinates),
        )
        .route("/geocode", get(geo::geocode))
        .route("/cep/{cep}", get(geo::postal_code))
        .layer(trace_layer)
        .with_state(state)
}

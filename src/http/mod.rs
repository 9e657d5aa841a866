//! HTTP surface.
//!
//! The router exposes the job, discovery, profile, and geocoding services
//! as JSON endpoints. Every route except the geocoding proxies and the
//! health probe requires the `x-actor-id` header set by the identity
//! gateway. Failures render as `{ "error": <message>, "kind": <kind> }`.

pub mod auth;
pub mod error;
pub mod handlers;
mod router;
pub mod state;

pub use auth::{ACTOR_HEADER, AuthenticatedActor};
pub use error::{ApiError, ErrorBody, status_for};
pub use router::router;
pub use state::{AppState, Ports};

#[cfg(test)]
mod tests;

//! Actor identity taken from the identity gateway.

use super::error::ApiError;
use crate::profile::domain::UserId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the authenticated actor's identifier.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The authenticated actor of a request.
///
/// The gateway in front of the service authenticates the caller and sets
/// [`ACTOR_HEADER`]. Requests without a well-formed identifier are rejected
/// with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| ApiError::unauthenticated("not authenticated"))?;
        let id = raw
            .to_str()
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .ok_or_else(|| ApiError::unauthenticated("invalid actor identity"))?;
        Ok(Self(id))
    }
}

//! Geocoder port for turning free-text addresses into coordinates.

use crate::geo::domain::{Coordinates, GeocodedPlace};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for geocoding collaborators.
pub type GeocodingResult<T> = Result<T, GeocodingError>;

/// Forward and reverse geocoding contract.
///
/// "Nothing found" is `Ok(None)`; errors are reserved for transport and
/// protocol failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a free-text query to its best match.
    async fn geocode(&self, query: &str) -> GeocodingResult<Option<GeocodedPlace>>;

    /// Resolves coordinates back to a labelled place.
    async fn reverse(&self, coordinates: Coordinates) -> GeocodingResult<Option<GeocodedPlace>>;
}

/// Errors returned by geocoding and postal-code collaborators.
#[derive(Debug, Clone, Error)]
pub enum GeocodingError {
    /// The request could not be sent or the response could not be read.
    #[error("geocoding transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The provider answered with a non-success status.
    #[error("geocoding provider returned status {0}")]
    UnexpectedStatus(u16),

    /// The provider answered with a body that could not be interpreted.
    #[error("malformed geocoding response: {0}")]
    MalformedResponse(String),
}

impl GeocodingError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

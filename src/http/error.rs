//! Mapping of service failures onto HTTP responses.

use crate::discovery::services::DiscoveryError;
use crate::error::{FailureKind, UpstreamSource};
use crate::geo::{domain::GeoDomainError, services::AddressResolutionError};
use crate::job::{domain::ParseJobStatusError, services::JobLifecycleError};
use crate::profile::{domain::ParseRoleError, services::ProfileServiceError};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Stable failure identifier.
    pub kind: &'static str,
}

/// An error ready to be rendered as `{ "error", "kind" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Builds an error from a failure kind and message.
    #[must_use]
    pub fn from_kind(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            status: status_for(kind),
            body: ErrorBody {
                error: message.into(),
                kind: kind.as_str(),
            },
        }
    }

    /// Builds a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::from_kind(FailureKind::Validation, message)
    }

    /// Builds the error returned when no actor identity is present.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorBody {
                error: message.into(),
                kind: "unauthenticated",
            },
        }
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response body.
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        &self.body
    }
}

/// Status code for each failure kind.
///
/// Illegal transitions and concurrency conflicts share 400; the `kind`
/// field tells them apart.
#[must_use]
pub const fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Validation
        | FailureKind::IllegalTransition
        | FailureKind::ConcurrencyConflict => StatusCode::BAD_REQUEST,
        FailureKind::Forbidden => StatusCode::FORBIDDEN,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Upstream(UpstreamSource::Geocoding) => StatusCode::BAD_GATEWAY,
        FailureKind::Upstream(UpstreamSource::Datastore) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(kind = self.body.kind, error = %self.body.error, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}

macro_rules! classified {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self::from_kind(err.kind(), err.to_string())
                }
            }
        )+
    };
}

classified!(
    JobLifecycleError,
    ProfileServiceError,
    DiscoveryError,
    AddressResolutionError,
);

macro_rules! invalid_input {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self::validation(err.to_string())
                }
            }
        )+
    };
}

invalid_input!(
    GeoDomainError,
    ParseJobStatusError,
    ParseRoleError,
    JsonRejection,
    QueryRejection,
    PathRejection,
);

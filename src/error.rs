//! Client-facing failure taxonomy shared by every service.
//!
//! Each service error exposes a `kind()` that resolves it into exactly one
//! [`FailureKind`]. Transport layers map kinds onto their own status codes;
//! the kind never changes the message carried by the error itself.

use serde::Serialize;
use std::fmt;

/// Classification of a failed operation as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed input; no mutation was attempted.
    Validation,
    /// The actor's role may not use this operation, or the job belongs to
    /// another employer under enforced ownership.
    Forbidden,
    /// A referenced job, profile, or actor does not exist.
    NotFound,
    /// The role/status combination is outside the legal transition table.
    IllegalTransition,
    /// Another request won a race or the diarist already holds an active job.
    ///
    /// Callers should refresh their view of the job instead of retrying.
    ConcurrencyConflict,
    /// A datastore or external collaborator failed.
    Upstream(UpstreamSource),
}

/// Which dependency produced an [`FailureKind::Upstream`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamSource {
    /// The job/profile datastore.
    Datastore,
    /// A geocoding or postal-code collaborator.
    Geocoding,
}

impl FailureKind {
    /// Returns the stable identifier used in error response bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found_error",
            Self::IllegalTransition => "illegal_transition_error",
            Self::ConcurrencyConflict => "concurrency_conflict_error",
            Self::Upstream(_) => "upstream_service_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

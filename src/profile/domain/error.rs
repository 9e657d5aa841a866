//! Error types for profile validation and parsing.

use crate::geo::domain::GeoDomainError;
use thiserror::Error;

/// Errors returned while constructing profile values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileDomainError {
    /// The display name is empty after trimming.
    #[error("profile name must not be empty")]
    EmptyName,

    /// The email address is not plausibly an address.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// Stored coordinates failed validation.
    #[error(transparent)]
    Location(#[from] GeoDomainError),
}

/// Error returned while parsing roles from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

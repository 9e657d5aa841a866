//! Error types for job validation and parsing.

use thiserror::Error;

/// Errors returned while constructing job values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// A required text field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// The price is zero or does not fit the persisted column.
    #[error("invalid price {0} cents, expected a positive amount")]
    InvalidPrice(u64),

    /// The duration is zero or does not fit the persisted column.
    #[error("invalid duration {0} minutes, expected a positive value")]
    InvalidDuration(u32),
}

/// Error returned while parsing job statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid status '{0}', expected one of pending, accepted, in_progress, completed, cancelled")]
pub struct ParseJobStatusError(pub String);

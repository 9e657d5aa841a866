//! Error types for geographic value validation.

use thiserror::Error;

/// Errors returned while constructing geographic values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeoDomainError {
    /// Latitude is not finite or lies outside `[-90, 90]`.
    #[error("invalid latitude {0}, expected a value between -90 and 90")]
    InvalidLatitude(f64),

    /// Longitude is not finite or lies outside `[-180, 180]`.
    #[error("invalid longitude {0}, expected a value between -180 and 180")]
    InvalidLongitude(f64),

    /// Search radius is negative or not finite.
    #[error("invalid radius {0}, expected a non-negative number of kilometres")]
    InvalidRadius(f64),

    /// Postal code does not contain exactly eight digits.
    #[error("postal code '{0}' must contain 8 digits")]
    InvalidPostalCode(String),
}

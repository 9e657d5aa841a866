//! Unit tests for the geo module.

#[expect(
    clippy::float_arithmetic,
    reason = "distance assertions compare within a tolerance"
)]
#[expect(
    clippy::float_arithmetic,
    reason = "distance assertions compare within a tolerance"
)]

//! Postal-code lookup port.

use super::GeocodingResult;
use crate::geo::domain::{PostalAddress, PostalCode};
use async_trait::async_trait;

/// Resolves a postal code to its street-level address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    /// Looks up `postal_code`; unknown codes are `Ok(None)`.
    async fn lookup(&self, postal_code: &PostalCode) -> GeocodingResult<Option<PostalAddress>>;
}

//! Port contracts for geocoding collaborators.

pub mod geocoder;
pub mod postal;

pub use geocoder::{Geocoder, GeocodingError, GeocodingResult};
pub use postal::PostalCodeLookup;

#[cfg(test)]
pub use geocoder::MockGeocoder;
#[cfg(test)]
pub use postal::MockPostalCodeLookup;

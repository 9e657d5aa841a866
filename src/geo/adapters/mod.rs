//! Adapter implementations for geocoding ports.

pub mod memory;
pub mod nominatim;
pub mod viacep;

pub use memory::{StaticGeocoder, StaticPostalCodeLookup};
pub use nominatim::{NominatimConfig, NominatimGeocoder};
pub use viacep::ViaCepClient;

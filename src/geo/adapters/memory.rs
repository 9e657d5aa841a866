//! Static lookup tables standing in for geocoding providers.
//!
//! Used by tests and by deployments that run without network access to the
//! public providers.

use crate::geo::{
    domain::{Coordinates, GeocodedPlace, PostalAddress, PostalCode},
    ports::{Geocoder, GeocodingResult, PostalCodeLookup},
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Geocoder answering from a fixed query table.
///
/// Queries are matched case-insensitively after trimming.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: HashMap<String, GeocodedPlace>,
}

impl StaticGeocoder {
    /// Creates a geocoder that knows no places.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a place for `query`.
    #[must_use]
    pub fn with_place(mut self, query: &str, coordinates: Coordinates) -> Self {
        self.places.insert(
            normalise(query),
            GeocodedPlace::new(coordinates, query.trim()),
        );
        self
    }
}

fn normalise(query: &str) -> String {
    query.trim().to_lowercase()
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> GeocodingResult<Option<GeocodedPlace>> {
        Ok(self.places.get(&normalise(query)).cloned())
    }

    async fn reverse(&self, coordinates: Coordinates) -> GeocodingResult<Option<GeocodedPlace>> {
        Ok(self
            .places
            .values()
            .find(|place| place.coordinates == coordinates)
            .cloned())
    }
}

/// Postal-code lookup answering from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticPostalCodeLookup {
    addresses: HashMap<PostalCode, PostalAddress>,
}

impl StaticPostalCodeLookup {
    /// Creates a lookup that knows no postal codes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an address under its postal code.
    #[must_use]
    pub fn with_address(mut self, address: PostalAddress) -> Self {
        self.addresses.insert(address.postal_code.clone(), address);
        self
    }
}

#[async_trait]
impl PostalCodeLookup for StaticPostalCodeLookup {
    async fn lookup(&self, postal_code: &PostalCode) -> GeocodingResult<Option<PostalAddress>> {
        Ok(self.addresses.get(postal_code).cloned())
    }
}

//! Geographic primitives and geocoding collaborators.
//!
//! - Coordinates, haversine distance, and radius filters in [`domain`]
//! - Geocoder and postal-code lookup contracts in [`ports`]
//! - HTTP and static adapters in [`adapters`]
//! - Address resolution with provider fallbacks in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

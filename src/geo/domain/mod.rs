//! Domain model for locations and distances.
//!
//! Locations are always optional at the aggregate level: a job or profile
//! without coordinates is a valid permanent state and is never conflated
//! with a point at the origin.

mod coordinates;
mod distance;
mod error;
mod filter;
mod place;

pub use coordinates::Coordinates;
pub use distance::{EARTH_RADIUS_KM, Kilometres, Radius, haversine};
pub use error::GeoDomainError;
pub use filter::{Located, RadiusFilter, Ranked};
pub use place::{COUNTRY_NAME, GeocodedPlace, PostalAddress, PostalCode};

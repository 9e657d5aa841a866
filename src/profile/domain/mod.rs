//! Domain model for actor profiles.
//!
//! A profile carries the actor's role and, optionally, a location. The job
//! core only reads profiles; coordinates and address fields are the only
//! values mutated after creation.

mod error;
mod ids;
mod profile;
mod role;

pub use error::{ParseRoleError, ProfileDomainError};
pub use ids::UserId;
pub use profile::{PersistedProfileData, Profile, ProfileAddress};
pub use role::Role;

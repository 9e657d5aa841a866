//! Application services for actor profiles.

mod profile;

pub use profile::{
    CreateProfileRequest, ProfileService, ProfileServiceError, ProfileServiceResult,
};

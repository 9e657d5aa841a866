//! Port contracts for profile persistence.

mod repository;

pub use repository::{ProfileRepository, ProfileRepositoryError, ProfileRepositoryResult};

#[cfg(test)]
pub use repository::MockProfileRepository;

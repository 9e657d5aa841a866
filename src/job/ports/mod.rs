//! Port contracts for job persistence.

mod repository;

pub use repository::{JobRepository, JobRepositoryError, JobRepositoryResult};

#[cfg(test)]
pub use repository::MockJobRepository;

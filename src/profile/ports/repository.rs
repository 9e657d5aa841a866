//! Repository port for profile persistence and lookup.

use crate::profile::domain::{Profile, Role, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for profile repository operations.
pub type ProfileRepositoryResult<T> = Result<T, ProfileRepositoryError>;

/// Profile persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Stores a new profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileRepositoryError::DuplicateProfile`] when a profile
    /// already exists for the actor.
    async fn store(&self, profile: &Profile) -> ProfileRepositoryResult<()>;

    /// Persists address, location, and timestamp changes.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileRepositoryError::NotFound`] when the profile does
    /// not exist.
    async fn update(&self, profile: &Profile) -> ProfileRepositoryResult<()>;

    /// Finds a profile by actor identifier.
    ///
    /// Returns `None` when the actor has no profile.
    async fn find_by_id(&self, id: UserId) -> ProfileRepositoryResult<Option<Profile>>;

    /// Returns every profile of `role` that has a stored location.
    async fn find_located_by_role(&self, role: Role) -> ProfileRepositoryResult<Vec<Profile>>;
}

/// Errors returned by profile repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProfileRepositoryError {
    /// A profile for the actor already exists.
    #[error("profile already exists: {0}")]
    DuplicateProfile(UserId),

    /// The profile was not found.
    #[error("profile not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProfileRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

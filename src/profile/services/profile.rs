//! Service layer for profile creation and location updates.

use crate::error::{FailureKind, UpstreamSource};
use crate::geo::{
    domain::Coordinates,
    ports::{Geocoder, PostalCodeLookup},
    services::{AddressInput, AddressResolutionError, AddressResolver},
};
use crate::profile::{
    domain::{Profile, ProfileAddress, ProfileDomainError, Role, UserId},
    ports::{ProfileRepository, ProfileRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating an actor profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProfileRequest {
    id: UserId,
    role: Role,
    name: String,
    email: String,
}

impl CreateProfileRequest {
    /// Creates a request for the authenticated actor `id`.
    #[must_use]
    pub fn new(id: UserId, role: Role, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            role,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Service-level errors for profile operations.
#[derive(Debug, Error)]
pub enum ProfileServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProfileDomainError),
    /// The actor has no profile.
    #[error("profile not found: {0}")]
    NotFound(UserId),
    /// Address resolution failed.
    #[error(transparent)]
    Address(#[from] AddressResolutionError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProfileRepositoryError),
}

impl ProfileServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) | Self::Repository(ProfileRepositoryError::DuplicateProfile(_)) => {
                FailureKind::Validation
            }
            Self::NotFound(_) | Self::Repository(ProfileRepositoryError::NotFound(_)) => {
                FailureKind::NotFound
            }
            Self::Address(err) => err.kind(),
            Self::Repository(ProfileRepositoryError::Persistence(_)) => {
                FailureKind::Upstream(UpstreamSource::Datastore)
            }
        }
    }
}

/// Result type for profile service operations.
pub type ProfileServiceResult<T> = Result<T, ProfileServiceError>;

/// Profile orchestration service.
pub struct ProfileService<P, G, L, C>
where
    P: ProfileRepository + ?Sized,
    G: Geocoder + ?Sized,
    L: PostalCodeLookup + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<P>,
    resolver: AddressResolver<G, L>,
    clock: Arc<C>,
}

impl<P, G, L, C> ProfileService<P, G, L, C>
where
    P: ProfileRepository + ?Sized,
    G: Geocoder + ?Sized,
    L: PostalCodeLookup + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new profile service.
    #[must_use]
    pub const fn new(
        repository: Arc<P>,
        resolver: AddressResolver<G, L>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            resolver,
            clock,
        }
    }

    /// Creates the profile of a newly registered actor.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileServiceError::Domain`] for invalid fields and
    /// [`ProfileServiceError::Repository`] when the actor already has a
    /// profile or persistence fails.
    #[tracing::instrument(skip(self, request), fields(actor = %request.id, role = %request.role))]
    pub async fn create_profile(&self, request: CreateProfileRequest) -> ProfileServiceResult<Profile> {
        let profile = Profile::new(
            request.id,
            request.role,
            &request.name,
            &request.email,
            &*self.clock,
        )?;
        self.repository.store(&profile).await?;
        tracing::info!("profile created");
        Ok(profile)
    }

    /// Retrieves a profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileServiceError::NotFound`] when the actor has no
    /// profile.
    pub async fn find_profile(&self, id: UserId) -> ProfileServiceResult<Profile> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProfileServiceError::NotFound(id))
    }

    /// Stores coordinates reported by the actor's device.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileServiceError::NotFound`] when the actor has no
    /// profile, or a repository error.
    #[tracing::instrument(skip(self))]
    pub async fn set_coordinates(
        &self,
        actor: UserId,
        coordinates: Coordinates,
    ) -> ProfileServiceResult<Profile> {
        let mut profile = self.find_profile(actor).await?;
        profile.set_location(coordinates, &*self.clock);
        self.repository.update(&profile).await?;
        Ok(profile)
    }

    /// Geocodes a typed address and stores it with the resulting location.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileServiceError::Address`] when the address is
    /// incomplete, matches nothing, or every provider attempt failed.
    #[tracing::instrument(skip(self, input))]
    pub async fn update_coordinates_from_address(
        &self,
        actor: UserId,
        input: AddressInput,
    ) -> ProfileServiceResult<Profile> {
        let mut profile = self.find_profile(actor).await?;
        let place = self.resolver.resolve_structured(&input).await?;
        tracing::info!(display_name = %place.display_name, "address resolved");

        let AddressInput {
            address,
            city,
            state,
            zip_code,
        } = input;
        let typed = ProfileAddress {
            address,
            city,
            state,
            zip_code,
        };
        profile.relocate(typed, place.coordinates, &*self.clock);
        self.repository.update(&profile).await?;
        Ok(profile)
    }
}

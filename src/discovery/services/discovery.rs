//! Radius-filtered listings of pending jobs and nearby profiles.

use crate::error::{FailureKind, UpstreamSource};
use crate::geo::domain::{Coordinates, Radius, RadiusFilter, Ranked};
use crate::job::{
    domain::{Job, JobStatus},
    ports::{JobRepository, JobRepositoryError},
};
use crate::profile::{
    domain::{Profile, Role, UserId},
    ports::{ProfileRepository, ProfileRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for discovery queries.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The acting user has no profile.
    #[error("profile not found: {0}")]
    ActorNotFound(UserId),

    /// The actor's role may not use this query.
    #[error("only {required} profiles may {operation}")]
    RoleNotAllowed {
        /// Role the query requires.
        required: Role,
        /// What was attempted.
        operation: &'static str,
    },

    /// No explicit reference point and no stored location.
    #[error("latitude and longitude are required")]
    MissingReference,

    /// Job lookup failed.
    #[error(transparent)]
    Jobs(#[from] JobRepositoryError),

    /// Profile lookup failed.
    #[error(transparent)]
    Profiles(#[from] ProfileRepositoryError),
}

impl DiscoveryError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ActorNotFound(_) => FailureKind::NotFound,
            Self::RoleNotAllowed { .. } => FailureKind::Forbidden,
            Self::MissingReference => FailureKind::Validation,
            Self::Jobs(_) | Self::Profiles(_) => FailureKind::Upstream(UpstreamSource::Datastore),
        }
    }
}

/// Result type for discovery queries.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Discovery query service.
pub struct DiscoveryService<J, P>
where
    J: JobRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    jobs: Arc<J>,
    profiles: Arc<P>,
}

impl<J, P> DiscoveryService<J, P>
where
    J: JobRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    /// Creates a new discovery service.
    #[must_use]
    pub const fn new(jobs: Arc<J>, profiles: Arc<P>) -> Self {
        Self { jobs, profiles }
    }

    async fn profile(&self, id: UserId) -> DiscoveryResult<Profile> {
        self.profiles
            .find_by_id(id)
            .await?
            .ok_or(DiscoveryError::ActorNotFound(id))
    }

    /// Resolves the reference point for `actor`: the explicit point when
    /// given, otherwise the actor's stored location.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::MissingReference`] when neither exists and
    /// [`DiscoveryError::ActorNotFound`] when the actor has no profile.
    pub async fn reference_point(
        &self,
        actor: UserId,
        explicit: Option<Coordinates>,
    ) -> DiscoveryResult<Coordinates> {
        if let Some(point) = explicit {
            return Ok(point);
        }
        self.profile(actor)
            .await?
            .location()
            .ok_or(DiscoveryError::MissingReference)
    }

    /// Lists pending jobs for a diarist, newest first.
    ///
    /// Filtering happens only when the request names a `reference`. Then
    /// the list view applies: located jobs outside `radius` are dropped,
    /// the rest are annotated and sorted by distance, unlocated jobs follow.
    /// Otherwise every pending job is returned unannotated, even when the
    /// diarist has a stored location.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::RoleNotAllowed`] for employers.
    #[tracing::instrument(skip(self))]
    pub async fn available_jobs(
        &self,
        diarist: UserId,
        reference: Option<Coordinates>,
        radius: Radius,
    ) -> DiscoveryResult<Vec<Ranked<Job>>> {
        let profile = self.profile(diarist).await?;
        if profile.role() != Role::Diarist {
            return Err(DiscoveryError::RoleNotAllowed {
                required: Role::Diarist,
                operation: "browse available jobs",
            });
        }

        let pending = self.jobs.find_by_status(JobStatus::Pending).await?;
        let listed = match reference {
            Some(center) => RadiusFilter::new(center, radius).list_view(pending),
            None => pending.into_iter().map(Ranked::unranked).collect(),
        };
        tracing::debug!(count = listed.len(), "available jobs listed");
        Ok(listed)
    }

    /// Lists located pending jobs within `radius` of `reference`, nearest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Jobs`] when the job store fails.
    pub async fn map_jobs(
        &self,
        reference: Coordinates,
        radius: Radius,
    ) -> DiscoveryResult<Vec<Ranked<Job>>> {
        let pending = self.jobs.find_by_status(JobStatus::Pending).await?;
        Ok(RadiusFilter::new(reference, radius).map_view(pending))
    }

    /// Lists located profiles of `role` within `radius` of `reference`,
    /// nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Profiles`] when the profile store fails.
    pub async fn nearby_profiles(
        &self,
        role: Role,
        reference: Coordinates,
        radius: Radius,
    ) -> DiscoveryResult<Vec<Ranked<Profile>>> {
        let candidates = self.profiles.find_located_by_role(role).await?;
        Ok(RadiusFilter::new(reference, radius).map_view(candidates))
    }
}

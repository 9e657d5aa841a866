//! Service layer for job posting, lookup, and status transitions.

use crate::error::{FailureKind, UpstreamSource};
use crate::geo::{domain::Coordinates, ports::Geocoder, services::geocode_free_text};
use crate::job::{
    domain::{
        Actor, Job, JobDetails, JobDomainError, JobId, JobStatus, TransitionPolicy,
        TransitionRejection,
    },
    ports::{JobRepository, JobRepositoryError},
};
use crate::profile::{
    domain::{Role, UserId},
    ports::{ProfileRepository, ProfileRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for posting a job.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateJobRequest {
    details: JobDetails,
    coordinates: Option<Coordinates>,
}

impl CreateJobRequest {
    /// Creates a request that geocodes the job address.
    #[must_use]
    pub const fn new(details: JobDetails) -> Self {
        Self {
            details,
            coordinates: None,
        }
    }

    /// Uses explicit coordinates instead of geocoding the address.
    #[must_use]
    pub const fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

/// Service-level errors for job operations.
#[derive(Debug, Error)]
pub enum JobLifecycleError {
    /// Job details failed validation.
    #[error(transparent)]
    Domain(#[from] JobDomainError),

    /// The acting user has no profile.
    #[error("profile not found: {0}")]
    ActorNotFound(UserId),

    /// The actor's role may not use this operation.
    #[error("only {required} profiles may {operation}")]
    RoleNotAllowed {
        /// Role the operation requires.
        required: Role,
        /// What was attempted.
        operation: &'static str,
    },

    /// The job does not exist.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The transition was refused.
    #[error(transparent)]
    Rejected(#[from] TransitionRejection),

    /// Profile lookup failed.
    #[error(transparent)]
    Profiles(#[from] ProfileRepositoryError),

    /// Job repository operation failed.
    #[error(transparent)]
    Repository(#[from] JobRepositoryError),
}

impl JobLifecycleError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) | Self::Repository(JobRepositoryError::DuplicateJob(_)) => {
                FailureKind::Validation
            }
            Self::ActorNotFound(_)
            | Self::JobNotFound(_)
            | Self::Repository(JobRepositoryError::NotFound(_)) => FailureKind::NotFound,
            Self::RoleNotAllowed { .. } => FailureKind::Forbidden,
            Self::Rejected(rejection) => rejection.kind(),
            Self::Repository(
                JobRepositoryError::StaleState(_) | JobRepositoryError::DiaristHasActiveJob(_),
            ) => FailureKind::ConcurrencyConflict,
            Self::Profiles(ProfileRepositoryError::NotFound(_)) => FailureKind::NotFound,
            Self::Profiles(_) | Self::Repository(JobRepositoryError::Persistence(_)) => {
                FailureKind::Upstream(UpstreamSource::Datastore)
            }
        }
    }
}

/// Result type for job service operations.
pub type JobLifecycleResult<T> = Result<T, JobLifecycleError>;

/// Job lifecycle orchestration service.
///
/// Every status change goes through [`TransitionPolicy::evaluate`] and then
/// a compare-and-swap write; there is no other mutation path.
pub struct JobLifecycleService<J, P, G, C>
where
    J: JobRepository + ?Sized,
    P: ProfileRepository + ?Sized,
    G: Geocoder + ?Sized,
    C: Clock + Send + Sync,
{
    jobs: Arc<J>,
    profiles: Arc<P>,
    geocoder: Arc<G>,
    policy: TransitionPolicy,
    clock: Arc<C>,
}

impl<J, P, G, C> JobLifecycleService<J, P, G, C>
where
    J: JobRepository + ?Sized,
    P: ProfileRepository + ?Sized,
    G: Geocoder + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new job lifecycle service.
    #[must_use]
    pub const fn new(
        jobs: Arc<J>,
        profiles: Arc<P>,
        geocoder: Arc<G>,
        policy: TransitionPolicy,
        clock: Arc<C>,
    ) -> Self {
        Self {
            jobs,
            profiles,
            geocoder,
            policy,
            clock,
        }
    }

    /// Returns the transition policy in force.
    #[must_use]
    pub const fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    async fn actor(&self, id: UserId) -> JobLifecycleResult<Actor> {
        let profile = self
            .profiles
            .find_by_id(id)
            .await?
            .ok_or(JobLifecycleError::ActorNotFound(id))?;
        Ok(Actor::new(id, profile.role()))
    }

    /// Posts a pending job for an employer.
    ///
    /// Without explicit coordinates the address is geocoded; a geocoding
    /// failure is logged and the job is stored without a location.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::RoleNotAllowed`] for non-employers,
    /// [`JobLifecycleError::Domain`] for invalid details, and repository
    /// errors.
    #[tracing::instrument(skip_all, fields(employer = %employer))]
    pub async fn create_job(
        &self,
        employer: UserId,
        request: CreateJobRequest,
    ) -> JobLifecycleResult<Job> {
        let actor = self.actor(employer).await?;
        if actor.role != Role::Employer {
            return Err(JobLifecycleError::RoleNotAllowed {
                required: Role::Employer,
                operation: "post jobs",
            });
        }

        let details = request.details.validated()?;
        let location = match request.coordinates {
            Some(coordinates) => Some(coordinates),
            None => self.locate(&details.address).await,
        };

        let job = Job::post(employer, details, location, &*self.clock)?;
        self.jobs.store(&job).await?;
        tracing::info!(job = %job.id(), located = location.is_some(), "job posted");
        Ok(job)
    }

    async fn locate(&self, address: &str) -> Option<Coordinates> {
        match geocode_free_text(&*self.geocoder, address).await {
            Ok(place) => Some(place.coordinates),
            Err(err) => {
                tracing::warn!(error = %err, "geocoding failed; storing job without coordinates");
                None
            }
        }
    }

    /// Moves a job to `target` on behalf of `actor`.
    ///
    /// Acceptance first rejects a diarist who already holds an active job,
    /// then writes status and diarist together; the repository re-checks
    /// both conditions atomically with the write.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::ActorNotFound`] or
    /// [`JobLifecycleError::JobNotFound`] for unknown references and
    /// [`JobLifecycleError::Rejected`] for every policy or concurrency
    /// rejection.
    #[tracing::instrument(skip_all, fields(job = %job_id, actor = %actor, target = %target))]
    pub async fn update_status(
        &self,
        job_id: JobId,
        actor: UserId,
        target: JobStatus,
    ) -> JobLifecycleResult<Job> {
        let requester = self.actor(actor).await?;
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or(JobLifecycleError::JobNotFound(job_id))?;

        let plan = self.policy.evaluate(&job, requester, target)?;

        if plan.is_acceptance() && self.jobs.find_active_for_diarist(actor).await?.is_some() {
            return Err(TransitionRejection::DiaristHasActiveJob.into());
        }

        let updated = self
            .jobs
            .apply_transition(&plan, self.clock.utc())
            .await
            .map_err(|err| match err {
                JobRepositoryError::StaleState(_) if plan.is_acceptance() => {
                    JobLifecycleError::Rejected(TransitionRejection::NoLongerAvailable)
                }
                JobRepositoryError::StaleState(_) => {
                    JobLifecycleError::Rejected(TransitionRejection::StaleJobState)
                }
                JobRepositoryError::DiaristHasActiveJob(_) => {
                    JobLifecycleError::Rejected(TransitionRejection::DiaristHasActiveJob)
                }
                JobRepositoryError::NotFound(id) => JobLifecycleError::JobNotFound(id),
                other => JobLifecycleError::Repository(other),
            })?;

        tracing::info!(from = %plan.from, to = %plan.to, "job status updated");
        Ok(updated)
    }

    /// Retrieves a job.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::JobNotFound`] for unknown identifiers.
    pub async fn find_job(&self, id: JobId) -> JobLifecycleResult<Job> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or(JobLifecycleError::JobNotFound(id))
    }

    /// Returns the actor's jobs, newest first: posted jobs for employers,
    /// assigned jobs for diarists.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::ActorNotFound`] when the actor has no
    /// profile.
    pub async fn jobs_for_actor(&self, actor: UserId) -> JobLifecycleResult<Vec<Job>> {
        let requester = self.actor(actor).await?;
        let jobs = match requester.role {
            Role::Employer => self.jobs.find_by_employer(actor).await?,
            Role::Diarist => self.jobs.find_by_diarist(actor).await?,
        };
        Ok(jobs)
    }

    /// Returns the diarist's accepted or in-progress job, if any.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::RoleNotAllowed`] for employers.
    pub async fn active_job_for_diarist(&self, diarist: UserId) -> JobLifecycleResult<Option<Job>> {
        let requester = self.actor(diarist).await?;
        if requester.role != Role::Diarist {
            return Err(JobLifecycleError::RoleNotAllowed {
                required: Role::Diarist,
                operation: "hold active jobs",
            });
        }
        Ok(self.jobs.find_active_for_diarist(diarist).await?)
    }
}

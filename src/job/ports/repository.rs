//! Repository port for job persistence and conditional transitions.

use crate::job::domain::{Job, JobId, JobStatus, TransitionPlan};
use crate::profile::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for job repository operations.
pub type JobRepositoryResult<T> = Result<T, JobRepositoryError>;

/// Job persistence contract.
///
/// Listing methods return jobs newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Stores a newly posted job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::DuplicateJob`] when the identifier is
    /// already taken.
    async fn store(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Finds a job by identifier.
    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>>;

    /// Returns every job in `status`.
    async fn find_by_status(&self, status: JobStatus) -> JobRepositoryResult<Vec<Job>>;

    /// Returns every job posted by `employer`.
    async fn find_by_employer(&self, employer: UserId) -> JobRepositoryResult<Vec<Job>>;

    /// Returns every job assigned to `diarist`.
    async fn find_by_diarist(&self, diarist: UserId) -> JobRepositoryResult<Vec<Job>>;

    /// Returns the accepted or in-progress job held by `diarist`, if any.
    async fn find_active_for_diarist(&self, diarist: UserId) -> JobRepositoryResult<Option<Job>>;

    /// Executes `plan` as one compare-and-swap write stamped with `at`.
    ///
    /// The write takes effect only if the row still holds `plan.from` and
    /// `plan.expected_diarist`. Acceptance additionally requires that the
    /// diarist holds no other active job, checked atomically with the write.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::StaleState`] when the row no longer
    /// matches, [`JobRepositoryError::DiaristHasActiveJob`] when acceptance
    /// would give the diarist a second active job, and
    /// [`JobRepositoryError::NotFound`] when the job does not exist.
    async fn apply_transition(
        &self,
        plan: &TransitionPlan,
        at: DateTime<Utc>,
    ) -> JobRepositoryResult<Job>;
}

/// Errors returned by job repository implementations.
#[derive(Debug, Clone, Error)]
pub enum JobRepositoryError {
    /// A job with the same identifier already exists.
    #[error("duplicate job identifier: {0}")]
    DuplicateJob(JobId),

    /// The job was not found.
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// The conditional write matched no row.
    #[error("job {0} no longer matches the expected state")]
    StaleState(JobId),

    /// The diarist already holds an active job.
    #[error("diarist {0} already has an active job")]
    DiaristHasActiveJob(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

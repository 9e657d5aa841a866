//! Job aggregate root.

use super::{JobDetails, JobDomainError, JobId, JobStatus, TransitionPlan};
use crate::geo::domain::{Coordinates, Located};
use crate::profile::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Job aggregate root.
///
/// Status and diarist change only through [`Job::apply`], which the
/// repositories call once a [`TransitionPlan`] has passed its
/// compare-and-swap check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    employer_id: UserId,
    diarist_id: Option<UserId>,
    status: JobStatus,
    #[serde(flatten)]
    details: JobDetails,
    location: Option<Coordinates>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub id: JobId,
    /// Persisted employer.
    pub employer_id: UserId,
    /// Persisted diarist, if assigned.
    pub diarist_id: Option<UserId>,
    /// Persisted status.
    pub status: JobStatus,
    /// Persisted descriptive fields.
    pub details: JobDetails,
    /// Persisted location, if any.
    pub location: Option<Coordinates>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest transition timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Posts a new pending job for `employer_id`.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError`] when the details fail validation.
    pub fn post(
        employer_id: UserId,
        details: JobDetails,
        location: Option<Coordinates>,
        clock: &impl Clock,
    ) -> Result<Self, JobDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: JobId::new(),
            employer_id,
            diarist_id: None,
            status: JobStatus::Pending,
            details: details.validated()?,
            location,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            employer_id: data.employer_id,
            diarist_id: data.diarist_id,
            status: data.status,
            details: data.details,
            location: data.location,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the employer who posted the job.
    #[must_use]
    pub const fn employer_id(&self) -> UserId {
        self.employer_id
    }

    /// Returns the assigned diarist, if any.
    #[must_use]
    pub const fn diarist_id(&self) -> Option<UserId> {
        self.diarist_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &JobDetails {
        &self.details
    }

    /// Returns the stored location, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Coordinates> {
        self.location
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest transition timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether this job still has the state `plan` was decided on.
    #[must_use]
    pub fn matches(&self, plan: &TransitionPlan) -> bool {
        self.id == plan.job_id
            && self.status == plan.from
            && self.diarist_id == plan.expected_diarist
    }

    /// Applies an approved transition.
    ///
    /// Callers must have checked [`Job::matches`] under the same lock or
    /// transaction.
    pub fn apply(&mut self, plan: &TransitionPlan, at: DateTime<Utc>) {
        self.status = plan.to;
        if let Some(diarist) = plan.assign_diarist {
            self.diarist_id = Some(diarist);
        }
        self.updated_at = at;
    }
}

impl Located for Job {
    fn location(&self) -> Option<Coordinates> {
        self.location
    }
}

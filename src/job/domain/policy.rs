//! The transition policy: who may move a job to which status.
//!
//! [`TransitionPolicy::evaluate`] is the only place the role/status table
//! lives. It is a pure function of the job snapshot, the actor, and the
//! requested status; it never touches storage. An allowed request yields a
//! [`TransitionPlan`] that repositories execute as a compare-and-swap write
//! against the `(status, diarist_id)` pair the decision was based on.

use super::{Job, JobId, JobStatus};
use crate::error::FailureKind;
use crate::profile::domain::{Role, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The authenticated actor requesting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    /// Actor identifier.
    pub id: UserId,
    /// Role read from the actor's profile.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Whether employers may only transition jobs they posted.
///
/// Deployments have historically checked only the actor's role, so that
/// stays the default; `Enforced` is opt-in and refuses with
/// [`TransitionRejection::NotJobOwner`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployerOwnership {
    /// Any employer may transition any job; only the role is checked.
    #[default]
    Unchecked,
    /// Employers may only transition their own jobs.
    Enforced,
}

/// An approved transition, expressed as the expected prior state and the
/// state to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Job being transitioned.
    pub job_id: JobId,
    /// Status the decision was based on.
    pub from: JobStatus,
    /// Diarist the decision was based on.
    pub expected_diarist: Option<UserId>,
    /// Status to write.
    pub to: JobStatus,
    /// Diarist to assign; set only for acceptance.
    pub assign_diarist: Option<UserId>,
}

impl TransitionPlan {
    /// Returns whether this plan assigns a diarist to a pending job.
    #[must_use]
    pub const fn is_acceptance(&self) -> bool {
        self.assign_diarist.is_some()
    }
}

/// Why a transition was refused. No mutation follows a rejection.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionRejection {
    /// Employers can never move a job to this status.
    #[error("operation not permitted for employer: cannot set status to {target}")]
    NotPermittedForEmployer {
        /// Requested status.
        target: JobStatus,
    },

    /// Diarists can never move a job to this status.
    #[error("operation not permitted for diarist: cannot set status to {target}")]
    NotPermittedForDiarist {
        /// Requested status.
        target: JobStatus,
    },

    /// The employer did not post this job.
    #[error("job belongs to another employer")]
    NotJobOwner,

    /// Cancellation needs a pending or accepted job.
    #[error("job can only be cancelled while pending or accepted (current status: {current})")]
    CancelRequiresOpenJob {
        /// Status at decision time.
        current: JobStatus,
    },

    /// Starting needs an accepted job.
    #[error("job can only be started once accepted (current status: {current})")]
    StartRequiresAcceptedJob {
        /// Status at decision time.
        current: JobStatus,
    },

    /// Completion needs a job in progress.
    #[error("job can only be completed while in progress (current status: {current})")]
    CompleteRequiresJobInProgress {
        /// Status at decision time.
        current: JobStatus,
    },

    /// Acceptance needs a pending, unassigned job.
    #[error("job can only be accepted while pending (current status: {current})")]
    AcceptRequiresPendingJob {
        /// Status at decision time.
        current: JobStatus,
    },

    /// The diarist is not the one assigned to this job.
    #[error("job is not assigned to this diarist")]
    NotAssignedDiarist,

    /// Another diarist holds the job.
    #[error("job already accepted by another diarist")]
    AlreadyAcceptedByAnotherDiarist,

    /// The diarist already owns an accepted or in-progress job.
    #[error("diarist already has an active job")]
    DiaristHasActiveJob,

    /// The job left `pending` between the decision and the write.
    #[error("job no longer available")]
    NoLongerAvailable,

    /// The job changed between the decision and the write.
    #[error("job status changed concurrently; refresh and try again")]
    StaleJobState,
}

impl TransitionRejection {
    /// Classifies the rejection for callers.
    #[must_use]
    pub const fn kind(self) -> FailureKind {
        match self {
            Self::NotJobOwner => FailureKind::Forbidden,
            Self::AlreadyAcceptedByAnotherDiarist
            | Self::DiaristHasActiveJob
            | Self::NoLongerAvailable
            | Self::StaleJobState => FailureKind::ConcurrencyConflict,
            Self::NotPermittedForEmployer { .. }
            | Self::NotPermittedForDiarist { .. }
            | Self::CancelRequiresOpenJob { .. }
            | Self::StartRequiresAcceptedJob { .. }
            | Self::CompleteRequiresJobInProgress { .. }
            | Self::AcceptRequiresPendingJob { .. }
            | Self::NotAssignedDiarist => FailureKind::IllegalTransition,
        }
    }
}

/// The single authoritative role/status transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionPolicy {
    ownership: EmployerOwnership,
}

impl TransitionPolicy {
    /// Creates a policy with the given employer ownership rule.
    #[must_use]
    pub const fn new(ownership: EmployerOwnership) -> Self {
        Self { ownership }
    }

    /// Returns the employer ownership rule.
    #[must_use]
    pub const fn ownership(&self) -> EmployerOwnership {
        self.ownership
    }

    /// Decides whether `actor` may move `job` to `target`.
    ///
    /// # Errors
    ///
    /// Returns the [`TransitionRejection`] naming the first rule the request
    /// breaks.
    pub fn evaluate(
        &self,
        job: &Job,
        actor: Actor,
        target: JobStatus,
    ) -> Result<TransitionPlan, TransitionRejection> {
        match actor.role {
            Role::Employer => self.evaluate_employer(job, actor.id, target),
            Role::Diarist => evaluate_diarist(job, actor.id, target),
        }
    }

    fn evaluate_employer(
        &self,
        job: &Job,
        employer: UserId,
        target: JobStatus,
    ) -> Result<TransitionPlan, TransitionRejection> {
        if matches!(target, JobStatus::Pending | JobStatus::Accepted) {
            return Err(TransitionRejection::NotPermittedForEmployer { target });
        }
        if self.ownership == EmployerOwnership::Enforced && job.employer_id() != employer {
            return Err(TransitionRejection::NotJobOwner);
        }

        let current = job.status();
        match (current, target) {
            (JobStatus::Pending | JobStatus::Accepted, JobStatus::Cancelled)
            | (JobStatus::Accepted, JobStatus::InProgress)
            | (JobStatus::InProgress, JobStatus::Completed) => Ok(plan(job, target, None)),
            (_, JobStatus::Cancelled) => Err(TransitionRejection::CancelRequiresOpenJob { current }),
            (_, JobStatus::InProgress) => {
                Err(TransitionRejection::StartRequiresAcceptedJob { current })
            }
            (_, JobStatus::Completed) => {
                Err(TransitionRejection::CompleteRequiresJobInProgress { current })
            }
            (_, JobStatus::Pending | JobStatus::Accepted) => {
                Err(TransitionRejection::NotPermittedForEmployer { target })
            }
        }
    }
}

fn evaluate_diarist(
    job: &Job,
    diarist: UserId,
    target: JobStatus,
) -> Result<TransitionPlan, TransitionRejection> {
    let current = job.status();
    match target {
        JobStatus::Accepted => {
            let held_by_other = job.diarist_id().is_some_and(|holder| holder != diarist);
            if held_by_other && current.is_active() {
                return Err(TransitionRejection::AlreadyAcceptedByAnotherDiarist);
            }
            if current != JobStatus::Pending || job.diarist_id().is_some() {
                return Err(TransitionRejection::AcceptRequiresPendingJob { current });
            }
            Ok(plan(job, target, Some(diarist)))
        }
        JobStatus::InProgress => {
            if current != JobStatus::Accepted {
                return Err(TransitionRejection::StartRequiresAcceptedJob { current });
            }
            require_assigned(job, diarist)?;
            Ok(plan(job, target, None))
        }
        JobStatus::Completed => {
            if current != JobStatus::InProgress {
                return Err(TransitionRejection::CompleteRequiresJobInProgress { current });
            }
            require_assigned(job, diarist)?;
            Ok(plan(job, target, None))
        }
        JobStatus::Pending | JobStatus::Cancelled => {
            Err(TransitionRejection::NotPermittedForDiarist { target })
        }
    }
}

fn require_assigned(job: &Job, diarist: UserId) -> Result<(), TransitionRejection> {
    if job.diarist_id() == Some(diarist) {
        Ok(())
    } else {
        Err(TransitionRejection::NotAssignedDiarist)
    }
}

const fn plan(job: &Job, to: JobStatus, assign_diarist: Option<UserId>) -> TransitionPlan {
    TransitionPlan {
        job_id: job.id(),
        from: job.status(),
        expected_diarist: job.diarist_id(),
        to,
        assign_diarist,
    }
}

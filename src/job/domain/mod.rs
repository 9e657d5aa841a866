//! Domain model for the job lifecycle.
//!
//! The job aggregate, its status graph, and the transition policy live
//! here. Nothing in this module performs I/O; the concurrency guard is
//! expressed as a [`TransitionPlan`] that adapters execute atomically.

mod details;
mod error;
mod ids;
mod job;
mod policy;
mod status;

pub use details::JobDetails;
pub use error::{JobDomainError, ParseJobStatusError};
pub use ids::JobId;
pub use job::{Job, PersistedJobData};
pub use policy::{Actor, EmployerOwnership, TransitionPlan, TransitionPolicy, TransitionRejection};
pub use status::JobStatus;

//! Application services for the job lifecycle.

mod lifecycle;

pub use lifecycle::{
    CreateJobRequest, JobLifecycleError, JobLifecycleResult, JobLifecycleService,
};

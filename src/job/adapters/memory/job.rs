//! In-memory job repository.
//!
//! Every conditional transition runs under one write lock, so the active-job
//! check and the compare-and-swap behave as a single atomic step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::job::{
    domain::{Job, JobId, JobStatus, TransitionPlan},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};
use crate::profile::domain::UserId;

/// Thread-safe in-memory job repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, predicate: impl Fn(&Job) -> bool) -> JobRepositoryResult<Vec<Job>> {
        let jobs = self.jobs.read().map_err(|err| poisoned(&err))?;
        let mut selected: Vec<Job> = jobs.values().filter(|job| predicate(job)).cloned().collect();
        selected.sort_by_key(|job| (Reverse(job.created_at()), job.id()));
        Ok(selected)
    }
}

fn poisoned(err: &impl ToString) -> JobRepositoryError {
    JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut jobs = self.jobs.write().map_err(|err| poisoned(&err))?;
        if jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        let jobs = self.jobs.read().map_err(|err| poisoned(&err))?;
        Ok(jobs.get(&id).cloned())
    }

    async fn find_by_status(&self, status: JobStatus) -> JobRepositoryResult<Vec<Job>> {
        self.select(|job| job.status() == status)
    }

    async fn find_by_employer(&self, employer: UserId) -> JobRepositoryResult<Vec<Job>> {
        self.select(|job| job.employer_id() == employer)
    }

    async fn find_by_diarist(&self, diarist: UserId) -> JobRepositoryResult<Vec<Job>> {
        self.select(|job| job.diarist_id() == Some(diarist))
    }

    async fn find_active_for_diarist(&self, diarist: UserId) -> JobRepositoryResult<Option<Job>> {
        let jobs = self.jobs.read().map_err(|err| poisoned(&err))?;
        Ok(jobs
            .values()
            .find(|job| job.diarist_id() == Some(diarist) && job.status().is_active())
            .cloned())
    }

    async fn apply_transition(
        &self,
        plan: &TransitionPlan,
        at: DateTime<Utc>,
    ) -> JobRepositoryResult<Job> {
        let mut jobs = self.jobs.write().map_err(|err| poisoned(&err))?;

        if let Some(diarist) = plan.assign_diarist {
            let holds_other = jobs.values().any(|job| {
                job.id() != plan.job_id
                    && job.diarist_id() == Some(diarist)
                    && job.status().is_active()
            });
            if holds_other {
                return Err(JobRepositoryError::DiaristHasActiveJob(diarist));
            }
        }

        let job = jobs
            .get_mut(&plan.job_id)
            .ok_or(JobRepositoryError::NotFound(plan.job_id))?;
        if !job.matches(plan) {
            return Err(JobRepositoryError::StaleState(plan.job_id));
        }
        job.apply(plan, at);
        Ok(job.clone())
    }
}

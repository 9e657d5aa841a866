//! Shared world state for job lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use diaristlink::geo::adapters::StaticGeocoder;
use diaristlink::job::{
    adapters::memory::InMemoryJobRepository,
    domain::{Job, JobDetails, TransitionPolicy},
    services::{CreateJobRequest, JobLifecycleError, JobLifecycleService},
};
use diaristlink::profile::{
    adapters::memory::InMemoryProfileRepository,
    domain::{Profile, Role, UserId},
    ports::ProfileRepository,
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestJobService = JobLifecycleService<
    InMemoryJobRepository,
    InMemoryProfileRepository,
    StaticGeocoder,
    DefaultClock,
>;

/// Scenario world for job lifecycle behaviour tests.
pub struct JobLifecycleWorld {
    pub service: TestJobService,
    pub profiles: Arc<InMemoryProfileRepository>,
    pub actors: HashMap<String, UserId>,
    pub job: Option<Job>,
    pub second_job: Option<Job>,
    pub last_result: Option<Result<Job, JobLifecycleError>>,
}

impl JobLifecycleWorld {
    /// Creates a world with no actors or jobs.
    #[must_use]
    pub fn new() -> Self {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let service = JobLifecycleService::new(
            Arc::new(InMemoryJobRepository::new()),
            Arc::clone(&profiles),
            Arc::new(StaticGeocoder::new()),
            TransitionPolicy::default(),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            profiles,
            actors: HashMap::new(),
            job: None,
            second_job: None,
            last_result: None,
        }
    }

    /// Registers a named actor with a fresh profile.
    pub fn register(&mut self, name: &str, role: Role) -> Result<(), eyre::Report> {
        let id = UserId::new();
        let email = format!("{}@example.com", name.to_lowercase());
        let profile = Profile::new(id, role, name, &email, &DefaultClock)
            .wrap_err("build scenario profile")?;
        run_async(self.profiles.store(&profile)).wrap_err("store scenario profile")?;
        self.actors.insert(name.to_owned(), id);
        Ok(())
    }

    /// Looks up a named actor.
    pub fn actor(&self, name: &str) -> Result<UserId, eyre::Report> {
        self.actors
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown actor {name} in scenario world"))
    }

    /// Posts a job on behalf of a named employer.
    pub fn post_job(&self, employer: &str) -> Result<Job, eyre::Report> {
        let id = self.actor(employer)?;
        let details = JobDetails {
            title: "Faxina completa".to_owned(),
            description: "Apartamento de dois quartos".to_owned(),
            service_type: "residential".to_owned(),
            address: "Rua Augusta, 500".to_owned(),
            price_cents: 18_000,
            duration_minutes: 240,
            scheduled_at: Utc::now(),
        };
        run_async(self.service.create_job(id, CreateJobRequest::new(details)))
            .wrap_err("post scenario job")
    }

    /// Returns the primary job.
    pub fn current_job(&self) -> Result<&Job, eyre::Report> {
        self.job
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing posted job in scenario world"))
    }

    /// Returns the second job.
    pub fn current_second_job(&self) -> Result<&Job, eyre::Report> {
        self.second_job
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing second job in scenario world"))
    }
}

impl Default for JobLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> JobLifecycleWorld {
    JobLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

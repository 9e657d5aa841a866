//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Each test gets its own database cloned from a migrated template on the
//! embedded cluster. The clone is dropped with the [`TestDatabase`].

use super::cluster::{PostgresCluster, TemporaryDatabase, postgres_cluster};
use chrono::Utc;
use diaristlink::geo::domain::Coordinates;
use diaristlink::job::{
    adapters::postgres::PostgresJobRepository,
    domain::{Job, JobDetails},
    ports::JobRepository,
};
use diaristlink::persistence::{SCHEMA_SQL, apply_schema, connect};
use diaristlink::profile::{
    adapters::postgres::PostgresProfileRepository,
    domain::{Profile, Role, UserId},
    ports::ProfileRepository,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A database of its own with repositories bound to it.
///
/// Repositories are declared first so their pools close before the
/// database is dropped.
pub struct TestDatabase {
    pub jobs: Arc<PostgresJobRepository>,
    pub profiles: Arc<PostgresProfileRepository>,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    async fn create(cluster: PostgresCluster) -> eyre::Result<Self> {
        tokio::task::spawn_blocking(move || -> eyre::Result<Self> {
            let template = template_name();
            cluster.ensure_template(&template, |url| Ok(apply_schema(&connect(url, 1)?)?))?;
            let database = cluster.temporary_database(&template)?;
            let pool = connect(database.url(), 8)?;
            Ok(Self {
                jobs: Arc::new(PostgresJobRepository::new(pool.clone())),
                profiles: Arc::new(PostgresProfileRepository::new(pool)),
                _database: database,
            })
        })
        .await?
    }

    /// Stores a fresh profile and returns its identifier.
    pub async fn profile(&self, role: Role, location: Option<Coordinates>) -> eyre::Result<UserId> {
        let id = UserId::new();
        let mut profile = Profile::new(id, role, "Teste", "teste@example.com", &DefaultClock)?;
        if let Some(point) = location {
            profile.set_location(point, &DefaultClock);
        }
        self.profiles.store(&profile).await?;
        Ok(id)
    }

    /// Stores a fresh pending job for `employer`.
    pub async fn job(&self, employer: UserId, location: Option<Coordinates>) -> eyre::Result<Job> {
        let job = Job::post(employer, job_details(), location, &DefaultClock)?;
        self.jobs.store(&job).await?;
        Ok(job)
    }
}

/// Valid details for a house-cleaning job.
pub fn job_details() -> JobDetails {
    JobDetails {
        title: "Faxina".to_owned(),
        description: "Dois quartos".to_owned(),
        service_type: "residential".to_owned(),
        address: "Rua Augusta, 500".to_owned(),
        price_cents: 18_000,
        duration_minutes: 240,
        scheduled_at: Utc::now(),
    }
}

/// Template names follow the schema so an edited schema never reuses a
/// stale template left in a persistent data directory.
fn template_name() -> String {
    let mut hasher = DefaultHasher::new();
    SCHEMA_SQL.hash(&mut hasher);
    format!("diaristlink_template_{:x}", hasher.finish())
}

/// Fixture cloning the schema template into a fresh database.
#[fixture]
pub async fn database(postgres_cluster: PostgresCluster) -> eyre::Result<TestDatabase> {
    TestDatabase::create(postgres_cluster).await
}

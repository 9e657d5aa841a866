//! `PostgreSQL` repository implementation for job storage.

use super::{
    models::{JobRow, NewJobRow},
    schema::jobs,
};
use crate::geo::domain::Coordinates;
use crate::job::{
    domain::{Job, JobDetails, JobId, JobStatus, PersistedJobData, TransitionPlan},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};
use crate::persistence::PgPool;
use crate::profile::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Nullable, Timestamptz, Uuid as SqlUuid, Varchar};

/// Partial unique index backing the single-active-job invariant.
const ONE_ACTIVE_PER_DIARIST_INDEX: &str = "idx_jobs_one_active_per_diarist";

/// `PostgreSQL`-backed job repository.
#[derive(Debug, Clone)]
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> JobRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> JobRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(JobRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(JobRepositoryError::persistence)?
    }

    async fn load_where<F>(&self, filter: F) -> JobRepositoryResult<Vec<Job>>
    where
        F: FnOnce(jobs::BoxedQuery<'static, diesel::pg::Pg>) -> jobs::BoxedQuery<'static, diesel::pg::Pg>
            + Send
            + 'static,
    {
        self.run_blocking(move |connection| {
            let rows = filter(jobs::table.into_boxed())
                .order((jobs::created_at.desc(), jobs::id.asc()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }
}

impl From<DieselError> for JobRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let new_row = to_new_row(job)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(jobs::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        JobRepositoryError::DuplicateJob(job_id)
                    }
                    _ => JobRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        self.run_blocking(move |connection| {
            let row = jobs::table
                .find(id.into_inner())
                .select(JobRow::as_select())
                .first::<JobRow>(connection)
                .optional()
                .map_err(JobRepositoryError::persistence)?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn find_by_status(&self, status: JobStatus) -> JobRepositoryResult<Vec<Job>> {
        self.load_where(move |query| query.filter(jobs::status.eq(status.as_str())))
            .await
    }

    async fn find_by_employer(&self, employer: UserId) -> JobRepositoryResult<Vec<Job>> {
        self.load_where(move |query| query.filter(jobs::employer_id.eq(employer.into_inner())))
            .await
    }

    async fn find_by_diarist(&self, diarist: UserId) -> JobRepositoryResult<Vec<Job>> {
        self.load_where(move |query| {
            query.filter(jobs::diarist_id.eq(Some(diarist.into_inner())))
        })
        .await
    }

    async fn find_active_for_diarist(&self, diarist: UserId) -> JobRepositoryResult<Option<Job>> {
        self.run_blocking(move |connection| {
            let row = active_job_row(connection, diarist)?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn apply_transition(
        &self,
        plan: &TransitionPlan,
        at: DateTime<Utc>,
    ) -> JobRepositoryResult<Job> {
        let request = *plan;
        self.run_blocking(move |connection| {
            connection.transaction::<_, JobRepositoryError, _>(|tx| {
                if let Some(diarist) = request.assign_diarist {
                    let holds_other = active_job_row(tx, diarist)?
                        .is_some_and(|row| row.id != request.job_id.into_inner());
                    if holds_other {
                        return Err(JobRepositoryError::DiaristHasActiveJob(diarist));
                    }
                }

                match conditional_update(tx, &request, at)? {
                    Some(row) => row_to_job(row),
                    None => Err(missing_row_error(tx, request.job_id)?),
                }
            })
        })
        .await
    }
}

/// Writes the plan only if the row still holds the expected
/// `(status, diarist_id)` pair. Zero affected rows yields `None`.
fn conditional_update(
    connection: &mut PgConnection,
    plan: &TransitionPlan,
    at: DateTime<Utc>,
) -> JobRepositoryResult<Option<JobRow>> {
    let expected_diarist = plan.expected_diarist.map(UserId::into_inner);
    let assigned = plan.assign_diarist.map(UserId::into_inner);
    diesel::sql_query(concat!(
        "UPDATE jobs SET status = $1, diarist_id = COALESCE($2, diarist_id), updated_at = $3 ",
        "WHERE id = $4 AND status = $5 AND diarist_id IS NOT DISTINCT FROM $6 ",
        "RETURNING id, employer_id, diarist_id, status, title, description, service_type, ",
        "address, price_cents, duration_minutes, scheduled_at, latitude, longitude, ",
        "created_at, updated_at",
    ))
    .bind::<Varchar, _>(plan.to.as_str())
    .bind::<Nullable<SqlUuid>, _>(assigned)
    .bind::<Timestamptz, _>(at)
    .bind::<SqlUuid, _>(plan.job_id.into_inner())
    .bind::<Varchar, _>(plan.from.as_str())
    .bind::<Nullable<SqlUuid>, _>(expected_diarist)
    .get_result::<JobRow>(connection)
    .optional()
    .map_err(|err| match (err, plan.assign_diarist) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info), Some(diarist))
            if is_active_job_violation(info.as_ref()) =>
        {
            JobRepositoryError::DiaristHasActiveJob(diarist)
        }
        (other, _) => JobRepositoryError::persistence(other),
    })
}

fn missing_row_error(
    connection: &mut PgConnection,
    job_id: JobId,
) -> JobRepositoryResult<JobRepositoryError> {
    let exists: i64 = jobs::table
        .filter(jobs::id.eq(job_id.into_inner()))
        .count()
        .get_result(connection)?;
    Ok(if exists > 0 {
        JobRepositoryError::StaleState(job_id)
    } else {
        JobRepositoryError::NotFound(job_id)
    })
}

fn active_job_row(
    connection: &mut PgConnection,
    diarist: UserId,
) -> JobRepositoryResult<Option<JobRow>> {
    let active = [JobStatus::Accepted.as_str(), JobStatus::InProgress.as_str()];
    jobs::table
        .filter(jobs::diarist_id.eq(Some(diarist.into_inner())))
        .filter(jobs::status.eq_any(active))
        .select(JobRow::as_select())
        .first::<JobRow>(connection)
        .optional()
        .map_err(JobRepositoryError::persistence)
}

fn is_active_job_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == ONE_ACTIVE_PER_DIARIST_INDEX)
}

fn to_new_row(job: &Job) -> JobRepositoryResult<NewJobRow> {
    let details = job.details().clone();
    let price_cents =
        i64::try_from(details.price_cents).map_err(JobRepositoryError::persistence)?;
    let duration_minutes =
        i32::try_from(details.duration_minutes).map_err(JobRepositoryError::persistence)?;
    let location = job.location();
    Ok(NewJobRow {
        id: job.id().into_inner(),
        employer_id: job.employer_id().into_inner(),
        diarist_id: job.diarist_id().map(UserId::into_inner),
        status: job.status().as_str().to_owned(),
        title: details.title,
        description: details.description,
        service_type: details.service_type,
        address: details.address,
        price_cents,
        duration_minutes,
        scheduled_at: details.scheduled_at,
        latitude: location.map(Coordinates::latitude),
        longitude: location.map(Coordinates::longitude),
        created_at: job.created_at(),
        updated_at: job.updated_at(),
    })
}

fn row_to_job(row: JobRow) -> JobRepositoryResult<Job> {
    let status = JobStatus::try_from(row.status.as_str()).map_err(JobRepositoryError::persistence)?;
    let location = Coordinates::from_optional(row.latitude, row.longitude)
        .map_err(JobRepositoryError::persistence)?;
    let price_cents = u64::try_from(row.price_cents).map_err(JobRepositoryError::persistence)?;
    let duration_minutes =
        u32::try_from(row.duration_minutes).map_err(JobRepositoryError::persistence)?;

    Ok(Job::from_persisted(PersistedJobData {
        id: JobId::from_uuid(row.id),
        employer_id: UserId::from_uuid(row.employer_id),
        diarist_id: row.diarist_id.map(UserId::from_uuid),
        status,
        details: JobDetails {
            title: row.title,
            description: row.description,
            service_type: row.service_type,
            address: row.address,
            price_cents,
            duration_minutes,
            scheduled_at: row.scheduled_at,
        },
        location,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

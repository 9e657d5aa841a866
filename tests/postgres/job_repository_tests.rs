//! `PostgreSQL` job repository tests: storage, listing order, and the
//! compare-and-swap acceptance guard.

use crate::postgres::helpers::{TestDatabase, database, job_details};
use chrono::Utc;
use diaristlink::geo::domain::Coordinates;
use diaristlink::job::{
    domain::{Actor, Job, JobStatus, TransitionPlan, TransitionPolicy},
    ports::{JobRepository, JobRepositoryError},
};
use diaristlink::profile::domain::{Role, UserId};
use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use rstest::rstest;
use std::time::Duration;

fn plan_for(job: &Job, actor: UserId, role: Role, target: JobStatus) -> eyre::Result<TransitionPlan> {
    Ok(TransitionPolicy::default().evaluate(job, Actor::new(actor, role), target)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_job_round_trips(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let location = Coordinates::new(-23.5505, -46.6333)?;
    let job = db.job(employer, Some(location)).await?;

    let found = db.jobs.find_by_id(job.id()).await?.ok_or_eyre("job missing")?;
    assert_eq!(found.id(), job.id());
    assert_eq!(found.employer_id(), employer);
    assert_eq!(found.status(), JobStatus::Pending);
    assert_eq!(found.diarist_id(), None);
    assert_eq!(found.location(), Some(location));
    assert_eq!(found.details().title, job.details().title);
    assert_eq!(found.details().price_cents, 18_000);
    assert_eq!(found.details().duration_minutes, 240);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_the_same_job_twice_is_rejected(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let job = db.job(employer, None).await?;

    let result = db.jobs.store(&job).await;
    ensure!(
        matches!(result, Err(JobRepositoryError::DuplicateJob(id)) if id == job.id()),
        "expected DuplicateJob, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_are_newest_first(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let older = db.job(employer, None).await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newer = db.job(employer, None).await?;

    let posted: Vec<_> = db
        .jobs
        .find_by_employer(employer)
        .await?
        .iter()
        .map(Job::id)
        .collect();
    assert_eq!(posted, vec![newer.id(), older.id()]);

    let pending: Vec<_> = db
        .jobs
        .find_by_status(JobStatus::Pending)
        .await?
        .iter()
        .map(Job::id)
        .collect();
    assert_eq!(pending, vec![newer.id(), older.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn acceptance_assigns_the_diarist_and_stale_plans_fail(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let first = db.profile(Role::Diarist, None).await?;
    let second = db.profile(Role::Diarist, None).await?;
    let job = db.job(employer, None).await?;

    let winning = plan_for(&job, first, Role::Diarist, JobStatus::Accepted)?;
    let losing = plan_for(&job, second, Role::Diarist, JobStatus::Accepted)?;

    let accepted = db.jobs.apply_transition(&winning, Utc::now()).await?;
    assert_eq!(accepted.status(), JobStatus::Accepted);
    assert_eq!(accepted.diarist_id(), Some(first));

    let result = db.jobs.apply_transition(&losing, Utc::now()).await;
    ensure!(
        matches!(result, Err(JobRepositoryError::StaleState(id)) if id == job.id()),
        "expected StaleState, got {result:?}"
    );

    let active = db
        .jobs
        .find_active_for_diarist(first)
        .await?
        .ok_or_eyre("first diarist should hold the job")?;
    assert_eq!(active.id(), job.id());
    assert!(db.jobs.find_active_for_diarist(second).await?.is_none());
    assert_eq!(db.jobs.find_by_diarist(first).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_diarist_cannot_accept_a_second_active_job(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let diarist = db.profile(Role::Diarist, None).await?;
    let first_job = db.job(employer, None).await?;
    let second_job = db.job(employer, None).await?;

    let first_plan = plan_for(&first_job, diarist, Role::Diarist, JobStatus::Accepted)?;
    db.jobs.apply_transition(&first_plan, Utc::now()).await?;

    let second_plan = plan_for(&second_job, diarist, Role::Diarist, JobStatus::Accepted)?;
    let result = db.jobs.apply_transition(&second_plan, Utc::now()).await;
    ensure!(
        matches!(result, Err(JobRepositoryError::DiaristHasActiveJob(id)) if id == diarist),
        "expected DiaristHasActiveJob, got {result:?}"
    );

    let untouched = db
        .jobs
        .find_by_id(second_job.id())
        .await?
        .ok_or_eyre("second job missing")?;
    assert_eq!(untouched.status(), JobStatus::Pending);
    assert_eq!(untouched.diarist_id(), None);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transitions_against_unknown_jobs_report_not_found(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let diarist = db.profile(Role::Diarist, None).await?;
    let job = Job::post(employer, job_details(), None, &DefaultClock)?;

    let plan = plan_for(&job, diarist, Role::Diarist, JobStatus::Accepted)?;
    let result = db.jobs.apply_transition(&plan, Utc::now()).await;
    ensure!(
        matches!(result, Err(JobRepositoryError::NotFound(id)) if id == job.id()),
        "expected NotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_acceptances_have_exactly_one_winner(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let job = db.job(employer, None).await?;

    let mut plans = Vec::new();
    for _ in 0..4 {
        let diarist = db.profile(Role::Diarist, None).await?;
        plans.push(plan_for(&job, diarist, Role::Diarist, JobStatus::Accepted)?);
    }

    let attempts = plans.into_iter().map(|plan| {
        let jobs = db.jobs.clone();
        tokio::spawn(async move { jobs.apply_transition(&plan, Utc::now()).await })
    });
    let mut winners = 0;
    for attempt in attempts.collect::<Vec<_>>() {
        match attempt.await? {
            Ok(_) => winners += 1,
            Err(JobRepositoryError::StaleState(_)) => {}
            Err(other) => return Err(other.into()),
        }
    }
    assert_eq!(winners, 1);

    let stored = db.jobs.find_by_id(job.id()).await?.ok_or_eyre("job missing")?;
    assert_eq!(stored.status(), JobStatus::Accepted);
    assert!(stored.diarist_id().is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_diarist_racing_for_two_jobs_wins_at_most_one(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let diarist = db.profile(Role::Diarist, None).await?;
    let first = db.job(employer, None).await?;
    let second = db.job(employer, None).await?;

    let plans = [
        plan_for(&first, diarist, Role::Diarist, JobStatus::Accepted)?,
        plan_for(&second, diarist, Role::Diarist, JobStatus::Accepted)?,
    ];
    let attempts: Vec<_> = plans
        .into_iter()
        .map(|plan| {
            let jobs = db.jobs.clone();
            tokio::spawn(async move { jobs.apply_transition(&plan, Utc::now()).await })
        })
        .collect();

    let mut winners = 0;
    for attempt in attempts {
        match attempt.await? {
            Ok(_) => winners += 1,
            Err(JobRepositoryError::DiaristHasActiveJob(id)) if id == diarist => {}
            Err(other) => return Err(other.into()),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(db.jobs.find_by_diarist(diarist).await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employer_transitions_follow_the_stored_state(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let employer = db.profile(Role::Employer, None).await?;
    let diarist = db.profile(Role::Diarist, None).await?;
    let job = db.job(employer, None).await?;

    let accept = plan_for(&job, diarist, Role::Diarist, JobStatus::Accepted)?;
    let accepted = db.jobs.apply_transition(&accept, Utc::now()).await?;
    let start = plan_for(&accepted, employer, Role::Employer, JobStatus::InProgress)?;
    let started = db.jobs.apply_transition(&start, Utc::now()).await?;
    let complete = plan_for(&started, diarist, Role::Diarist, JobStatus::Completed)?;
    let completed = db.jobs.apply_transition(&complete, Utc::now()).await?;

    assert_eq!(completed.status(), JobStatus::Completed);
    assert_eq!(completed.diarist_id(), Some(diarist));
    assert!(db.jobs.find_active_for_diarist(diarist).await?.is_none());

    // Replaying the start plan must not resurrect the completed job.
    let replay = db.jobs.apply_transition(&start, Utc::now()).await;
    ensure!(
        matches!(replay, Err(JobRepositoryError::StaleState(_))),
        "expected StaleState, got {replay:?}"
    );
    Ok(())
}

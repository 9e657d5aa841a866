//! Then steps for job lifecycle BDD scenarios.

use super::world::{JobLifecycleWorld, run_async};
use diaristlink::job::domain::JobStatus;
use rstest_bdd_macros::then;

#[then(r#"the job status is "{status}""#)]
fn job_status_is(world: &JobLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = JobStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let job_id = world.current_job()?.id();
    let stored = run_async(world.service.find_job(job_id))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"the job is assigned to "{diarist}""#)]
fn job_assigned_to(world: &JobLifecycleWorld, diarist: String) -> Result<(), eyre::Report> {
    let expected = world.actor(&diarist)?;
    let job_id = world.current_job()?.id();
    let stored = run_async(world.service.find_job(job_id))?;

    if stored.diarist_id() != Some(expected) {
        return Err(eyre::eyre!(
            "expected diarist {expected}, found {:?}",
            stored.diarist_id()
        ));
    }
    Ok(())
}

#[then(r#"the request fails with kind "{kind}""#)]
fn request_fails_with_kind(world: &JobLifecycleWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;

    match result {
        Err(err) if err.kind().as_str() == kind => Ok(()),
        other => Err(eyre::eyre!("expected a {kind} failure, got {other:?}")),
    }
}

#[then(r#"the error message is "{message}""#)]
fn error_message_is(world: &JobLifecycleWorld, message: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;

    match result {
        Err(err) if err.to_string() == message => Ok(()),
        other => Err(eyre::eyre!("expected error \"{message}\", got {other:?}")),
    }
}

#[then("the second job is still pending and unassigned")]
fn second_job_untouched(world: &JobLifecycleWorld) -> Result<(), eyre::Report> {
    let job_id = world.current_second_job()?.id();
    let stored = run_async(world.service.find_job(job_id))?;

    if stored.status() != JobStatus::Pending || stored.diarist_id().is_some() {
        return Err(eyre::eyre!(
            "expected a pending unassigned job, found {} assigned to {:?}",
            stored.status(),
            stored.diarist_id()
        ));
    }
    Ok(())
}

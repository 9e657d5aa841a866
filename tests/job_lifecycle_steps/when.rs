//! When steps for job lifecycle BDD scenarios.

use super::world::{JobLifecycleWorld, run_async};
use diaristlink::job::domain::{JobId, JobStatus};
use rstest_bdd_macros::when;

fn request(
    world: &mut JobLifecycleWorld,
    actor: &str,
    job_id: JobId,
    status: &str,
) -> Result<(), eyre::Report> {
    let id = world.actor(actor)?;
    let target = JobStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let result = run_async(world.service.update_status(job_id, id, target));
    world.last_result = Some(result);
    Ok(())
}

#[when(r#""{actor}" sets the job to "{status}""#)]
fn actor_sets_job(
    world: &mut JobLifecycleWorld,
    actor: String,
    status: String,
) -> Result<(), eyre::Report> {
    let job_id = world.current_job()?.id();
    request(world, &actor, job_id, &status)?;
    if let Some(Ok(updated)) = world.last_result.as_ref() {
        world.job = Some(updated.clone());
    }
    Ok(())
}

#[when(r#""{actor}" sets the second job to "{status}""#)]
fn actor_sets_second_job(
    world: &mut JobLifecycleWorld,
    actor: String,
    status: String,
) -> Result<(), eyre::Report> {
    let job_id = world.current_second_job()?.id();
    request(world, &actor, job_id, &status)
}

//! Given steps for job lifecycle BDD scenarios.

use super::world::{JobLifecycleWorld, run_async};
use diaristlink::job::domain::JobStatus;
use diaristlink::profile::domain::Role;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"an employer named "{name}""#)]
fn employer_named(world: &mut JobLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    world.register(&name, Role::Employer)
}

#[given(r#"a diarist named "{name}""#)]
fn diarist_named(world: &mut JobLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    world.register(&name, Role::Diarist)
}

#[given(r#""{employer}" has posted a job"#)]
fn employer_posted_job(
    world: &mut JobLifecycleWorld,
    employer: String,
) -> Result<(), eyre::Report> {
    world.job = Some(world.post_job(&employer)?);
    Ok(())
}

#[given(r#""{employer}" has posted a second job"#)]
fn employer_posted_second_job(
    world: &mut JobLifecycleWorld,
    employer: String,
) -> Result<(), eyre::Report> {
    world.second_job = Some(world.post_job(&employer)?);
    Ok(())
}

fn advance(
    world: &mut JobLifecycleWorld,
    actor: &str,
    target: JobStatus,
) -> Result<(), eyre::Report> {
    let id = world.actor(actor)?;
    let job_id = world.current_job()?.id();
    let updated = run_async(world.service.update_status(job_id, id, target))
        .wrap_err_with(|| format!("move scenario job to {target}"))?;
    world.job = Some(updated);
    Ok(())
}

#[given(r#""{diarist}" has accepted the job"#)]
fn diarist_accepted_job(
    world: &mut JobLifecycleWorld,
    diarist: String,
) -> Result<(), eyre::Report> {
    advance(world, &diarist, JobStatus::Accepted)
}

#[given(r#""{diarist}" has started the job"#)]
fn diarist_started_job(
    world: &mut JobLifecycleWorld,
    diarist: String,
) -> Result<(), eyre::Report> {
    advance(world, &diarist, JobStatus::InProgress)
}

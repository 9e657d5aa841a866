//! `PostgreSQL` profile repository tests.

use crate::postgres::helpers::{TestDatabase, database};
use diaristlink::geo::domain::Coordinates;
use diaristlink::profile::{
    domain::{Profile, ProfileAddress, Role, UserId},
    ports::{ProfileRepository, ProfileRepositoryError},
};
use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_profile_for_the_same_actor_is_rejected(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let id = db.profile(Role::Diarist, None).await?;
    let duplicate = Profile::new(id, Role::Employer, "Outra", "outra@example.com", &DefaultClock)?;

    let result = db.profiles.store(&duplicate).await;
    ensure!(
        matches!(result, Err(ProfileRepositoryError::DuplicateProfile(found)) if found == id),
        "expected DuplicateProfile, got {result:?}"
    );
    let stored = db.profiles.find_by_id(id).await?.ok_or_eyre("profile missing")?;
    assert_eq!(stored.role(), Role::Diarist);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn relocation_persists_address_and_coordinates(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let id = db.profile(Role::Diarist, None).await?;
    let mut profile = db.profiles.find_by_id(id).await?.ok_or_eyre("profile missing")?;
    let address = ProfileAddress {
        address: Some("Avenida Paulista, 1000".to_owned()),
        city: Some("São Paulo".to_owned()),
        state: Some("SP".to_owned()),
        zip_code: Some("01310-100".to_owned()),
    };
    let location = Coordinates::new(-23.5614, -46.6558)?;
    profile.relocate(address.clone(), location, &DefaultClock);

    db.profiles.update(&profile).await?;

    let stored = db.profiles.find_by_id(id).await?.ok_or_eyre("profile missing")?;
    assert_eq!(stored.address(), &address);
    assert_eq!(stored.location(), Some(location));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_an_unknown_profile_reports_not_found(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let profile = Profile::new(UserId::new(), Role::Employer, "Ana", "ana@example.com", &DefaultClock)?;

    let result = db.profiles.update(&profile).await;
    ensure!(
        matches!(result, Err(ProfileRepositoryError::NotFound(id)) if id == profile.id()),
        "expected NotFound, got {result:?}"
    );
    assert!(db.profiles.find_by_id(profile.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn located_lookup_filters_by_role_and_location(
    #[future] database: eyre::Result<TestDatabase>,
) -> eyre::Result<()> {
    let db = database.await?;
    let paulista = Coordinates::new(-23.5614, -46.6558)?;
    let located_diarist = db.profile(Role::Diarist, Some(paulista)).await?;
    db.profile(Role::Diarist, None).await?;
    db.profile(Role::Employer, Some(paulista)).await?;

    let found: Vec<_> = db
        .profiles
        .find_located_by_role(Role::Diarist)
        .await?
        .iter()
        .map(Profile::id)
        .collect();
    assert_eq!(found, vec![located_diarist]);
    Ok(())
}

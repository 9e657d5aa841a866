//! `PostgreSQL` repository implementation for profile storage.

use super::{
    models::{ProfileRecord, ProfileRow},
    schema::profiles,
};
use crate::geo::domain::Coordinates;
use crate::persistence::PgPool;
use crate::profile::{
    domain::{PersistedProfileData, Profile, ProfileAddress, Role, UserId},
    ports::{ProfileRepository, ProfileRepositoryError, ProfileRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed profile repository.
#[derive(Debug, Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProfileRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProfileRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProfileRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProfileRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn store(&self, profile: &Profile) -> ProfileRepositoryResult<()> {
        let id = profile.id();
        let record = to_record(profile);
        self.run_blocking(move |connection| {
            diesel::insert_into(profiles::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProfileRepositoryError::DuplicateProfile(id)
                    }
                    _ => ProfileRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, profile: &Profile) -> ProfileRepositoryResult<()> {
        let id = profile.id();
        let record = to_record(profile);
        self.run_blocking(move |connection| {
            let affected = diesel::update(profiles::table.find(id.into_inner()))
                .set(&record)
                .execute(connection)
                .map_err(ProfileRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProfileRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> ProfileRepositoryResult<Option<Profile>> {
        self.run_blocking(move |connection| {
            let row = profiles::table
                .find(id.into_inner())
                .select(ProfileRow::as_select())
                .first::<ProfileRow>(connection)
                .optional()
                .map_err(ProfileRepositoryError::persistence)?;
            row.map(row_to_profile).transpose()
        })
        .await
    }

    async fn find_located_by_role(&self, role: Role) -> ProfileRepositoryResult<Vec<Profile>> {
        self.run_blocking(move |connection| {
            let rows = profiles::table
                .filter(profiles::role.eq(role.as_str()))
                .filter(profiles::latitude.is_not_null())
                .filter(profiles::longitude.is_not_null())
                .order(profiles::created_at.asc())
                .select(ProfileRow::as_select())
                .load::<ProfileRow>(connection)
                .map_err(ProfileRepositoryError::persistence)?;
            rows.into_iter().map(row_to_profile).collect()
        })
        .await
    }
}

fn to_record(profile: &Profile) -> ProfileRecord {
    let ProfileAddress {
        address,
        city,
        state,
        zip_code,
    } = profile.address().clone();
    let location = profile.location();
    ProfileRecord {
        id: profile.id().into_inner(),
        role: profile.role().as_str().to_owned(),
        name: profile.name().to_owned(),
        email: profile.email().to_owned(),
        address,
        city,
        state,
        zip_code,
        latitude: location.map(Coordinates::latitude),
        longitude: location.map(Coordinates::longitude),
        created_at: profile.created_at(),
        updated_at: profile.updated_at(),
    }
}

fn row_to_profile(row: ProfileRow) -> ProfileRepositoryResult<Profile> {
    let role = Role::try_from(row.role.as_str()).map_err(ProfileRepositoryError::persistence)?;
    let location = Coordinates::from_optional(row.latitude, row.longitude)
        .map_err(ProfileRepositoryError::persistence)?;
    Ok(Profile::from_persisted(PersistedProfileData {
        id: UserId::from_uuid(row.id),
        role,
        name: row.name,
        email: row.email,
        address: ProfileAddress {
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
        },
        location,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

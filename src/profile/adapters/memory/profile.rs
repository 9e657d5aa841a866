//! In-memory profile repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::profile::{
    domain::{Profile, Role, UserId},
    ports::{ProfileRepository, ProfileRepositoryError, ProfileRepositoryResult},
};

/// Thread-safe in-memory profile repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
}

impl InMemoryProfileRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: &impl ToString) -> ProfileRepositoryError {
    ProfileRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn store(&self, profile: &Profile) -> ProfileRepositoryResult<()> {
        let mut profiles = self.profiles.write().map_err(|err| poisoned(&err))?;
        if profiles.contains_key(&profile.id()) {
            return Err(ProfileRepositoryError::DuplicateProfile(profile.id()));
        }
        profiles.insert(profile.id(), profile.clone());
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> ProfileRepositoryResult<()> {
        let mut profiles = self.profiles.write().map_err(|err| poisoned(&err))?;
        let slot = profiles
            .get_mut(&profile.id())
            .ok_or(ProfileRepositoryError::NotFound(profile.id()))?;
        *slot = profile.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> ProfileRepositoryResult<Option<Profile>> {
        let profiles = self.profiles.read().map_err(|err| poisoned(&err))?;
        Ok(profiles.get(&id).cloned())
    }

    async fn find_located_by_role(&self, role: Role) -> ProfileRepositoryResult<Vec<Profile>> {
        let profiles = self.profiles.read().map_err(|err| poisoned(&err))?;
        let mut located: Vec<Profile> = profiles
            .values()
            .filter(|profile| profile.role() == role && profile.location().is_some())
            .cloned()
            .collect();
        located.sort_by_key(Profile::created_at);
        Ok(located)
    }
}

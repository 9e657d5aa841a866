//! Profile aggregate root.

use super::{ProfileDomainError, Role, UserId};
use crate::geo::domain::{Coordinates, Located};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Address fields typed by the actor, kept alongside the resolved location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAddress {
    /// Street and number.
    pub address: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// State code.
    pub state: Option<String>,
    /// Postal code as typed.
    pub zip_code: Option<String>,
}

/// Actor profile: role plus an optional location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    id: UserId,
    role: Role,
    name: String,
    email: String,
    #[serde(flatten)]
    address: ProfileAddress,
    location: Option<Coordinates>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted profile.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedProfileData {
    /// Persisted actor identifier.
    pub id: UserId,
    /// Persisted role.
    pub role: Role,
    /// Persisted display name.
    pub name: String,
    /// Persisted email.
    pub email: String,
    /// Persisted address fields.
    pub address: ProfileAddress,
    /// Persisted location, if any.
    pub location: Option<Coordinates>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Creates a profile without a location.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileDomainError::EmptyName`] for a blank name and
    /// [`ProfileDomainError::InvalidEmail`] when the email has no `@`
    /// between a local part and a domain.
    pub fn new(
        id: UserId,
        role: Role,
        name: &str,
        email: &str,
        clock: &impl Clock,
    ) -> Result<Self, ProfileDomainError> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            return Err(ProfileDomainError::EmptyName);
        }
        let trimmed_email = email.trim();
        let is_plausible = trimmed_email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !is_plausible {
            return Err(ProfileDomainError::InvalidEmail(email.to_owned()));
        }

        let timestamp = clock.utc();
        Ok(Self {
            id,
            role,
            name: trimmed_name.to_owned(),
            email: trimmed_email.to_owned(),
            address: ProfileAddress::default(),
            location: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a profile from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProfileData) -> Self {
        Self {
            id: data.id,
            role: data.role,
            name: data.name,
            email: data.email,
            address: data.address,
            location: data.location,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the typed address fields.
    #[must_use]
    pub const fn address(&self) -> &ProfileAddress {
        &self.address
    }

    /// Returns the stored location, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Coordinates> {
        self.location
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Stores a location reported directly by the actor's device.
    pub fn set_location(&mut self, location: Coordinates, clock: &impl Clock) {
        self.location = Some(location);
        self.updated_at = clock.utc();
    }

    /// Stores a typed address together with the location it resolved to.
    pub fn relocate(&mut self, address: ProfileAddress, location: Coordinates, clock: &impl Clock) {
        self.address = address;
        self.set_location(location, clock);
    }
}

impl Located for Profile {
    fn location(&self) -> Option<Coordinates> {
        self.location
    }
}

//! The closed set of marketplace roles.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role an actor plays in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Posts jobs and may cancel, start, or complete them.
    Employer,
    /// Accepts, starts, and completes jobs.
    Diarist,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employer => "employer",
            Self::Diarist => "diarist",
        }
    }

    /// Returns the role on the other side of the marketplace.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Employer => Self::Diarist,
            Self::Diarist => Self::Employer,
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employer" => Ok(Self::Employer),
            "diarist" => Ok(Self::Diarist),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

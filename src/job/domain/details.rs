//! Descriptive job fields fixed at creation.

use super::JobDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the employer is asking for. Immutable once the job is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    /// Short title shown in listings.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Kind of cleaning requested.
    pub service_type: String,
    /// Street address where the work takes place.
    pub address: String,
    /// Offered price in cents.
    pub price_cents: u64,
    /// Expected duration in minutes.
    pub duration_minutes: u32,
    /// When the work is scheduled to start.
    pub scheduled_at: DateTime<Utc>,
}

impl JobDetails {
    /// Largest price representable in the persisted `BIGINT` column.
    const MAX_PRICE_CENTS: u64 = i64::MAX as u64;

    /// Largest duration representable in the persisted `INTEGER` column.
    const MAX_DURATION_MINUTES: u32 = i32::MAX as u32;

    /// Trims text fields and validates every value.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyField`] for a blank title, service
    /// type, or address, and [`JobDomainError::InvalidPrice`] or
    /// [`JobDomainError::InvalidDuration`] for non-positive amounts.
    pub fn validated(self) -> Result<Self, JobDomainError> {
        let title = required(&self.title, "title")?;
        let service_type = required(&self.service_type, "service type")?;
        let address = required(&self.address, "address")?;
        if self.price_cents == 0 || self.price_cents > Self::MAX_PRICE_CENTS {
            return Err(JobDomainError::InvalidPrice(self.price_cents));
        }
        if self.duration_minutes == 0 || self.duration_minutes > Self::MAX_DURATION_MINUTES {
            return Err(JobDomainError::InvalidDuration(self.duration_minutes));
        }
        Ok(Self {
            title,
            description: self.description.trim().to_owned(),
            service_type,
            address,
            ..self
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, JobDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JobDomainError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}

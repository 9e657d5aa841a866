//! Diesel row models for job persistence.

use super::schema::jobs;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for job records.
///
/// Also loaded by name from the `RETURNING` clause of conditional updates.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRow {
    /// Job identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Employer who posted the job.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub employer_id: uuid::Uuid,
    /// Diarist assigned on acceptance.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Uuid>)]
    pub diarist_id: Option<uuid::Uuid>,
    /// Lifecycle status in snake case.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Listing title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Free-text description.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub description: String,
    /// Kind of cleaning requested.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub service_type: String,
    /// Street address of the work.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub address: String,
    /// Offered price in cents.
    #[diesel(sql_type = diesel::sql_types::Int8)]
    pub price_cents: i64,
    /// Expected duration in minutes.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub duration_minutes: i32,
    /// Scheduled start.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub scheduled_at: DateTime<Utc>,
    /// Latitude, present only when geocoding succeeded.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Float8>)]
    pub latitude: Option<f64>,
    /// Longitude, present only when geocoding succeeded.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Float8>)]
    pub longitude: Option<f64>,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last transition timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for job records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = jobs)]
pub struct NewJobRow {
    /// Job identifier.
    pub id: uuid::Uuid,
    /// Employer who posted the job.
    pub employer_id: uuid::Uuid,
    /// Diarist assigned on acceptance.
    pub diarist_id: Option<uuid::Uuid>,
    /// Lifecycle status in snake case.
    pub status: String,
    /// Listing title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Kind of cleaning requested.
    pub service_type: String,
    /// Street address of the work.
    pub address: String,
    /// Offered price in cents.
    pub price_cents: i64,
    /// Expected duration in minutes.
    pub duration_minutes: i32,
    /// Scheduled start.
    pub scheduled_at: DateTime<Utc>,
    /// Latitude, present only when geocoding succeeded.
    pub latitude: Option<f64>,
    /// Longitude, present only when geocoding succeeded.
    pub longitude: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last transition timestamp.
    pub updated_at: DateTime<Utc>,
}

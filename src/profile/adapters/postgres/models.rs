//! Diesel row models for profile persistence.

use super::schema::profiles;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for profile records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    /// Actor identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Marketplace role in snake case.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub role: String,
    /// Display name.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub name: String,
    /// Contact email.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub email: String,
    /// Street and number as typed.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub address: Option<String>,
    /// City as typed.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub city: Option<String>,
    /// State code as typed.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub state: Option<String>,
    /// Postal code as typed.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Varchar>)]
    pub zip_code: Option<String>,
    /// Latitude of the resolved location.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Float8>)]
    pub latitude: Option<f64>,
    /// Longitude of the resolved location.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Float8>)]
    pub longitude: Option<f64>,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for profile records.
///
/// `None` clears the column on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub struct ProfileRecord {
    /// Actor identifier.
    pub id: uuid::Uuid,
    /// Marketplace role in snake case.
    pub role: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Street and number as typed.
    pub address: Option<String>,
    /// City as typed.
    pub city: Option<String>,
    /// State code as typed.
    pub state: Option<String>,
    /// Postal code as typed.
    pub zip_code: Option<String>,
    /// Latitude of the resolved location.
    pub latitude: Option<f64>,
    /// Longitude of the resolved location.
    pub longitude: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

//! `PostgreSQL` connection pooling and schema bootstrap.
//!
//! Repositories share one r2d2 pool; blocking Diesel calls are moved onto
//! Tokio's blocking thread pool by each adapter.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by every adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied by [`apply_schema`].
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-19-000000_create_profiles_and_jobs/up.sql");

/// Errors raised while preparing the datastore.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),

    /// A schema statement failed.
    #[error("schema migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
}

/// Builds a pool for `database_url` holding at most `max_size` connections.
///
/// # Errors
///
/// Returns [`PersistenceError::Pool`] when the initial connections cannot be
/// established.
pub fn connect(database_url: &str, max_size: u32) -> Result<PgPool, PersistenceError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::builder().max_size(max_size).build(manager)?)
}

/// Applies the idempotent schema to the pooled database.
///
/// # Errors
///
/// Returns [`PersistenceError`] when no connection is available or a
/// statement fails.
pub fn apply_schema(pool: &PgPool) -> Result<(), PersistenceError> {
    let mut connection = pool.get()?;
    connection.batch_execute(SCHEMA_SQL)?;
    tracing::info!("database schema is up to date");
    Ok(())
}

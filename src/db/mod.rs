pub mod enums;
pub mod models;
pub mod repositories;

use std::time::Duration;

use diesel::PgConnection;
use diesel::r2d2::{self, ConnectionManager as DbConnectionManager};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::config::DatabaseConfig;

pub type DbPool = r2d2::Pool<DbConnectionManager<PgConnection>>;
pub type DbConn = r2d2::PooledConnection<DbConnectionManager<PgConnection>>;

/// Builds the connection pool without blocking on the first connection,
/// so the service can start while the database is still down.
pub fn create_pool(config: &DatabaseConfig) -> DbPool {
    let manager = DbConnectionManager::<PgConnection>::new(&config.url);
    r2d2::Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build_unchecked(manager)
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("unique constraint violated: {0}")]
    Duplicate(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Duplicate(
                    info.constraint_name()
                        .unwrap_or("unique constraint")
                        .to_string(),
                )
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                StoreError::Unavailable(info.message().to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<r2d2::PoolError> for StoreError {
    fn from(err: r2d2::PoolError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

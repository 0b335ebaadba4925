use thiserror::Error;

use crate::db::traits::DealStoreError;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Could not prepare the database directory: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<SqliteDatabaseError> for DealStoreError {
    fn from(e: SqliteDatabaseError) -> Self {
        DealStoreError::DatabaseError(e.to_string())
    }
}

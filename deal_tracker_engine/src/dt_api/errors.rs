use thiserror::Error;

use crate::db::traits::DealStoreError;

#[derive(Debug, Clone, Error)]
pub enum DealApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DealStoreError> for DealApiError {
    fn from(e: DealStoreError) -> Self {
        DealApiError::DatabaseError(e.to_string())
    }
}

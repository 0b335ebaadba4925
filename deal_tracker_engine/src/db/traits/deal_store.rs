use thiserror::Error;

use crate::db_types::{Deal, DealTimestamps, NewDeal};

#[derive(Debug, Clone, Error)]
pub enum DealStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for DealStoreError {
    fn from(e: sqlx::Error) -> Self {
        DealStoreError::DatabaseError(e.to_string())
    }
}

/// The `DealStore` trait defines the storage operations that the deal reconciler relies on.
///
/// Backends must make each call atomic. They make no attempt to interpret the deal's timestamps; create, update and
/// delete decisions are made by [`crate::DealFlowApi`].
#[allow(async_fn_in_trait)]
pub trait DealStore {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Persists a new deal and returns the id the store assigned to it.
    ///
    /// No check is made on the uniqueness of the deal reference.
    async fn insert_deal(&self, deal: NewDeal) -> Result<i64, DealStoreError>;

    /// A snapshot of every deal in the store. The order of the result is unspecified.
    async fn fetch_all_deals(&self) -> Result<Vec<Deal>, DealStoreError>;

    /// Fetches the deal with the given id. If there is no such deal, `None` is returned.
    async fn fetch_deal_by_id(&self, id: i64) -> Result<Option<Deal>, DealStoreError>;

    /// Fetches the first deal with the given business reference, or `None` if there isn't one.
    async fn fetch_deal_by_reference(&self, deal_reference: &str) -> Result<Option<Deal>, DealStoreError>;

    /// Overwrites the timestamps of the deal with the given id, in a single conditional statement. Timestamps that
    /// are absent in `timestamps` keep their stored value.
    ///
    /// Returns the updated deal, or `None` if no deal with that id exists.
    async fn update_deal_timestamps(&self, id: i64, timestamps: DealTimestamps)
        -> Result<Option<Deal>, DealStoreError>;

    /// Removes the deal with the given id and returns it. If there was no such deal, `None` is returned and the store
    /// is left unchanged.
    async fn delete_deal_by_id(&self, id: i64) -> Result<Option<Deal>, DealStoreError>;

    /// Releases the resources held by the backend.
    async fn close(&mut self) -> Result<(), DealStoreError>;
}

//! Storage traits for the deal tracker.
//!
//! * [`DealStore`] is the durable keyed mapping from a store-assigned id to a [`crate::db_types::Deal`]. Every method
//!   is a single atomic operation against the backend.
mod deal_store;

pub use deal_store::{DealStore, DealStoreError};

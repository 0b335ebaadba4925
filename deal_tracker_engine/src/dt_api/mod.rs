//! # Deal tracker public API
//!
//! The `dt_api` module exposes the programmatic API of the deal tracker.
//!
//! * [`deal_flow_api`] holds the reconciliation rules. Incoming deal submissions are turned into create, update or
//!   delete operations against a [`crate::DealStore`], and the stored deals are classified as waiting or in
//!   processing.
//! * [`deal_objects`] contains the result types returned by the API.
//!
//! # API usage
//!
//! An API instance is created by supplying a storage backend that implements [`crate::DealStore`]:
//!
//! ```rust,ignore
//! use deal_tracker_engine::{events::EventProducers, DealFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/deal_tracker.db", 5).await?;
//! let api = DealFlowApi::new(db, EventProducers::default());
//! let waiting = api.deals_waiting().await?;
//! ```
pub mod deal_flow_api;
pub mod deal_objects;
pub mod errors;

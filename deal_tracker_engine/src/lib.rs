//! Deal Tracker Engine
//!
//! The deal tracker follows financial deals through a settlement pipeline: a deal arrives, is sent, is vest
//! completed and is finally acknowledged ("app complete") by the consuming application. The tracker keeps exactly one
//! record per in-flight deal and removes it once the deal is app complete.
//!
//! The library is divided into two main sections:
//! 1. Storage. The [`DealStore`] trait is the contract a storage backend must fulfil. A SQLite backend,
//!    [`SqliteDatabase`], ships with the engine.
//! 2. The public API ([`mod@dt_api`]). [`DealFlowApi`] decides whether an incoming deal creates, updates or deletes a
//!    stored record, and classifies the stored deals as waiting or in processing. The deal data types live in
//!    [`db_types`].
//!
//! The engine also publishes events when deals are created, updated or completed (see [`events`]), so that callers
//! can hook into the deal flow without touching the store.
mod db;

pub mod db_types;
pub mod dt_api;
pub mod events;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{db::SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{DealStore, DealStoreError};
pub use dt_api::{deal_flow_api::DealFlowApi, deal_objects::ProcessOutcome, errors::DealApiError};

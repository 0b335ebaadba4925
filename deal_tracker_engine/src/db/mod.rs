//! #  Database management and control.
//!
//! This module provides the interface contract that deal tracker storage *backends* must fulfil ([`traits`]), and
//! the SQLite backend that ships with the engine ([`sqlite`]).
//!
//! The reconciliation rules do not live here. Backends only offer atomic keyed storage operations; deciding whether
//! an incoming deal is created, updated or deleted is the job of [`crate::DealFlowApi`].
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::db_types::Deal;

/// A deal was registered with the tracker for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealCreatedEvent {
    pub deal: Deal,
}

impl DealCreatedEvent {
    pub fn new(deal: Deal) -> Self {
        Self { deal }
    }
}

/// The timestamps of a stored deal changed. `old_deal` is the record as it was before the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealUpdatedEvent {
    pub old_deal: Deal,
    pub new_deal: Deal,
}

impl DealUpdatedEvent {
    pub fn new(old_deal: Deal, new_deal: Deal) -> Self {
        Self { old_deal, new_deal }
    }
}

/// A deal was submitted with its app complete time set and has been removed from the store. `deal` is the last
/// stored version of the record with the app complete time applied. Completed deals are not archived, so this event
/// is the only remaining trace of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealCompletedEvent {
    pub deal: Deal,
}

impl DealCompletedEvent {
    pub fn new(deal: Deal) -> Self {
        Self { deal }
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::Deal;

/// The branch taken by [`crate::DealFlowApi::process`] for a submitted deal.
///
/// The HTTP surface does not expose this; clients see the same response whether or not the submitted deal was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessOutcome {
    /// The deal was new and has been stored. This is the stored record, id included.
    Created(Deal),
    /// The stored deal's timestamps were updated. This is the record after the update.
    Updated(Deal),
    /// The deal is app complete and the stored record has been deleted. This is the last stored version with the app
    /// complete time applied.
    Completed(Deal),
    /// No stored deal matched the submission. Nothing was changed.
    NotFound,
}

impl ProcessOutcome {
    pub fn deal(&self) -> Option<&Deal> {
        match self {
            ProcessOutcome::Created(d) | ProcessOutcome::Updated(d) | ProcessOutcome::Completed(d) => Some(d),
            ProcessOutcome::NotFound => None,
        }
    }
}

impl Display for ProcessOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessOutcome::Created(d) => write!(f, "created [{}] with id {}", d.deal_reference, d.id),
            ProcessOutcome::Updated(d) => write!(f, "updated [{}]", d.deal_reference),
            ProcessOutcome::Completed(d) => write!(f, "completed and deleted [{}]", d.deal_reference),
            ProcessOutcome::NotFound => write!(f, "not found"),
        }
    }
}

use std::{cmp::Ordering, fmt::Display};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------     DealStatus       ---------------------------------------------------------
/// Where a deal sits in the settlement pipeline.
///
/// The status is never stored. It is derived from which of the deal's timestamps are populated, see
/// [`DealTimestamps::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStatus {
    /// The deal has arrived, but nothing else has happened to it yet.
    Waiting,
    /// The deal has been sent and/or vest-completed, but the consuming application has not acknowledged it.
    InProcessing,
    /// The consuming application has acknowledged the deal. Deals in this state are removed from the store.
    Complete,
}

impl Display for DealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealStatus::Waiting => write!(f, "Waiting"),
            DealStatus::InProcessing => write!(f, "InProcessing"),
            DealStatus::Complete => write!(f, "Complete"),
        }
    }
}

//--------------------------------------   DealTimestamps     ---------------------------------------------------------
/// The four optional stage timestamps of a deal. These are the only fields of a stored deal that may change after it
/// is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealTimestamps {
    pub arrival_time: Option<NaiveDateTime>,
    pub sent_time: Option<NaiveDateTime>,
    pub vest_complete_time: Option<NaiveDateTime>,
    pub app_complete_time: Option<NaiveDateTime>,
}

impl DealTimestamps {
    pub fn arrived(at: NaiveDateTime) -> Self {
        Self { arrival_time: Some(at), ..Default::default() }
    }

    pub fn with_sent_time(mut self, at: NaiveDateTime) -> Self {
        self.sent_time = Some(at);
        self
    }

    pub fn with_vest_complete_time(mut self, at: NaiveDateTime) -> Self {
        self.vest_complete_time = Some(at);
        self
    }

    pub fn with_app_complete_time(mut self, at: NaiveDateTime) -> Self {
        self.app_complete_time = Some(at);
        self
    }

    pub fn is_app_complete(&self) -> bool {
        self.app_complete_time.is_some()
    }

    /// A deal is waiting when only (at most) the arrival time is set.
    pub fn is_waiting(&self) -> bool {
        self.sent_time.is_none() && self.vest_complete_time.is_none() && self.app_complete_time.is_none()
    }

    /// Classifies the deal purely from the timestamps that are present.
    pub fn status(&self) -> DealStatus {
        if self.is_app_complete() {
            DealStatus::Complete
        } else if self.is_waiting() {
            DealStatus::Waiting
        } else {
            DealStatus::InProcessing
        }
    }

    /// Overlays `update` onto these timestamps. Fields that are set in `update` replace the current values; fields
    /// that are absent in `update` leave the current value in place, so a timestamp is never unset.
    pub fn merge(self, update: DealTimestamps) -> Self {
        Self {
            arrival_time: update.arrival_time.or(self.arrival_time),
            sent_time: update.sent_time.or(self.sent_time),
            vest_complete_time: update.vest_complete_time.or(self.vest_complete_time),
            app_complete_time: update.app_complete_time.or(self.app_complete_time),
        }
    }
}

//--------------------------------------        Deal          ---------------------------------------------------------
/// A deal record as it is held in the store.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: i64,
    pub deal_reference: String,
    pub chain: String,
    pub chain_number: i32,
    pub arrival_time: Option<NaiveDateTime>,
    pub sent_time: Option<NaiveDateTime>,
    pub vest_complete_time: Option<NaiveDateTime>,
    pub app_complete_time: Option<NaiveDateTime>,
}

impl Deal {
    pub fn timestamps(&self) -> DealTimestamps {
        DealTimestamps {
            arrival_time: self.arrival_time,
            sent_time: self.sent_time,
            vest_complete_time: self.vest_complete_time,
            app_complete_time: self.app_complete_time,
        }
    }

    pub fn set_timestamps(&mut self, timestamps: DealTimestamps) {
        self.arrival_time = timestamps.arrival_time;
        self.sent_time = timestamps.sent_time;
        self.vest_complete_time = timestamps.vest_complete_time;
        self.app_complete_time = timestamps.app_complete_time;
    }

    pub fn status(&self) -> DealStatus {
        self.timestamps().status()
    }

    pub fn is_waiting(&self) -> bool {
        self.timestamps().is_waiting()
    }

    pub fn is_in_processing(&self) -> bool {
        !self.is_waiting()
    }
}

impl Display for Deal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deal #{} [{}] {}/{} ({})", self.id, self.deal_reference, self.chain, self.chain_number, self.status())
    }
}

/// Orders deals by chain, then chain number, then deal reference, all ascending.
///
/// Chain and reference compare lexicographically, the chain number numerically.
pub fn compare_by_chain(a: &Deal, b: &Deal) -> Ordering {
    a.chain
        .cmp(&b.chain)
        .then_with(|| a.chain_number.cmp(&b.chain_number))
        .then_with(|| a.deal_reference.cmp(&b.deal_reference))
}

/// Sorts the deals in place using [`compare_by_chain`].
pub fn sort_by_chain(deals: &mut [Deal]) {
    deals.sort_by(compare_by_chain);
}

//--------------------------------------       NewDeal        ---------------------------------------------------------
/// A deal that has not been stored yet, and so has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeal {
    pub deal_reference: String,
    pub chain: String,
    pub chain_number: i32,
    #[serde(flatten)]
    pub timestamps: DealTimestamps,
}

impl NewDeal {
    pub fn new<S1: Into<String>, S2: Into<String>>(deal_reference: S1, chain: S2, chain_number: i32) -> Self {
        Self {
            deal_reference: deal_reference.into(),
            chain: chain.into(),
            chain_number,
            timestamps: DealTimestamps::default(),
        }
    }

    pub fn with_timestamps(mut self, timestamps: DealTimestamps) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn into_deal(self, id: i64) -> Deal {
        let mut deal = Deal {
            id,
            deal_reference: self.deal_reference,
            chain: self.chain,
            chain_number: self.chain_number,
            arrival_time: None,
            sent_time: None,
            vest_complete_time: None,
            app_complete_time: None,
        };
        deal.set_timestamps(self.timestamps);
        deal
    }
}

//--------------------------------------   DealSubmission     ---------------------------------------------------------
/// A deal record as submitted by a client.
///
/// This is the wire shape of a deal. The id is absent for deals that have never been stored. Clients typically fetch
/// a deal, set one more timestamp on it, and submit it back, id included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSubmission {
    #[serde(default)]
    pub id: Option<i64>,
    pub deal_reference: String,
    #[serde(default)]
    pub chain: String,
    #[serde(default)]
    pub chain_number: i32,
    #[serde(default)]
    pub arrival_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub sent_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub vest_complete_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub app_complete_time: Option<NaiveDateTime>,
}

impl DealSubmission {
    pub fn new<S1: Into<String>, S2: Into<String>>(deal_reference: S1, chain: S2, chain_number: i32) -> Self {
        Self {
            id: None,
            deal_reference: deal_reference.into(),
            chain: chain.into(),
            chain_number,
            arrival_time: None,
            sent_time: None,
            vest_complete_time: None,
            app_complete_time: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_timestamps(mut self, timestamps: DealTimestamps) -> Self {
        self.arrival_time = timestamps.arrival_time;
        self.sent_time = timestamps.sent_time;
        self.vest_complete_time = timestamps.vest_complete_time;
        self.app_complete_time = timestamps.app_complete_time;
        self
    }

    pub fn timestamps(&self) -> DealTimestamps {
        DealTimestamps {
            arrival_time: self.arrival_time,
            sent_time: self.sent_time,
            vest_complete_time: self.vest_complete_time,
            app_complete_time: self.app_complete_time,
        }
    }

    pub fn to_new_deal(&self) -> NewDeal {
        NewDeal::new(self.deal_reference.clone(), self.chain.clone(), self.chain_number)
            .with_timestamps(self.timestamps())
    }
}

impl From<Deal> for DealSubmission {
    fn from(deal: Deal) -> Self {
        let timestamps = deal.timestamps();
        Self::new(deal.deal_reference, deal.chain, deal.chain_number).with_id(deal.id).with_timestamps(timestamps)
    }
}

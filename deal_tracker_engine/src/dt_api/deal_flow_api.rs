use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::DealStore,
    db_types::{sort_by_chain, Deal, DealSubmission, NewDeal},
    dt_api::{deal_objects::ProcessOutcome, errors::DealApiError},
    events::{DealCompletedEvent, DealCreatedEvent, DealUpdatedEvent, EventProducers},
};

/// `DealFlowApi` is the primary API of the deal tracker. It reconciles deal submissions against the store and answers
/// queries about the deals currently in flight.
///
/// A deal's status is never stored. Whether a deal is waiting or in processing is derived from which of its timestamps
/// are set, see [`crate::db_types::DealTimestamps::status`].
pub struct DealFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for DealFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DealFlowApi")
    }
}

impl<B> DealFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}

impl<B> DealFlowApi<B>
where B: DealStore
{
    /// Reconciles a submitted deal with the store.
    ///
    /// The rules are applied in order:
    /// 1. A deal with no id and no app complete time is new, and is inserted.
    /// 2. Otherwise the stored deal with the submitted id is looked up. If there is none, the submission is logged and
    ///    ignored.
    /// 3. If the submission carries an app complete time, the stored deal is deleted.
    /// 4. Otherwise the stored deal's timestamps are overwritten with the submitted ones. The reference, chain and
    ///    chain number of a stored deal never change.
    ///
    /// A submission that matches nothing is not an error. The returned [`ProcessOutcome`] says which branch was taken.
    pub async fn process(&self, incoming: DealSubmission) -> Result<ProcessOutcome, DealApiError> {
        info!("🔄️ Processing deal [{}]", incoming.deal_reference);
        let timestamps = incoming.timestamps();
        let id = match incoming.id {
            None if !timestamps.is_app_complete() => {
                info!("🔄️ Persisting new deal [{}]", incoming.deal_reference);
                let deal = self.create(incoming.to_new_deal()).await?;
                return Ok(ProcessOutcome::Created(deal));
            },
            None => {
                error!(
                    "🔄️ Deal [{}] is app complete but has no id, so there is no stored deal to remove",
                    incoming.deal_reference
                );
                return Ok(ProcessOutcome::NotFound);
            },
            Some(id) => id,
        };
        let Some(stored) = self.db.fetch_deal_by_id(id).await? else {
            error!("🔄️ Could not find deal id {id} [{}]", incoming.deal_reference);
            return Ok(ProcessOutcome::NotFound);
        };
        if timestamps.is_app_complete() {
            info!("🔄️ Deleting app complete deal [{}]", stored.deal_reference);
            let Some(mut deleted) = self.db.delete_deal_by_id(id).await? else {
                warn!("🔄️ Deal #{id} [{}] was removed by another request before it could be deleted", stored.deal_reference);
                return Ok(ProcessOutcome::NotFound);
            };
            deleted.set_timestamps(deleted.timestamps().merge(timestamps));
            self.call_deal_completed_hook(&deleted).await;
            return Ok(ProcessOutcome::Completed(deleted));
        }
        match self.db.update_deal_timestamps(id, timestamps).await? {
            Some(updated) => {
                info!("🔄️ Updated deal [{}]. It is now {}", updated.deal_reference, updated.status());
                self.call_deal_updated_hook(stored, &updated).await;
                Ok(ProcessOutcome::Updated(updated))
            },
            None => {
                warn!("🔄️ Deal #{id} [{}] was removed by another request before it could be updated", stored.deal_reference);
                Ok(ProcessOutcome::NotFound)
            },
        }
    }

    /// Every deal in the store, in no particular order.
    pub async fn all_deals(&self) -> Result<Vec<Deal>, DealApiError> {
        let deals = self.db.fetch_all_deals().await?;
        Ok(deals)
    }

    /// The deals that have arrived but have not been sent, vest completed or app completed, sorted by chain, chain
    /// number and deal reference.
    pub async fn deals_waiting(&self) -> Result<Vec<Deal>, DealApiError> {
        debug!("🔄️ Fetching deals waiting");
        self.sorted_deals_where(Deal::is_waiting).await
    }

    /// The deals that have been sent and/or vest completed, sorted by chain, chain number and deal reference.
    pub async fn deals_in_processing(&self) -> Result<Vec<Deal>, DealApiError> {
        debug!("🔄️ Fetching deals in processing");
        self.sorted_deals_where(Deal::is_in_processing).await
    }

    async fn sorted_deals_where(&self, predicate: fn(&Deal) -> bool) -> Result<Vec<Deal>, DealApiError> {
        let mut deals = self.db.fetch_all_deals().await?.into_iter().filter(predicate).collect::<Vec<_>>();
        sort_by_chain(&mut deals);
        deals.iter().for_each(|d| {
            trace!(
                "🔄️ tracking deal [{}] {:?} {:?} {:?} {:?}",
                d.deal_reference,
                d.arrival_time,
                d.sent_time,
                d.vest_complete_time,
                d.app_complete_time
            )
        });
        Ok(deals)
    }

    /// The stored deal with the given business reference, if there is one.
    pub async fn deal_by_reference(&self, deal_reference: &str) -> Result<Option<Deal>, DealApiError> {
        debug!("🔄️ Fetching deal by reference [{deal_reference}]");
        let deal = self.db.fetch_deal_by_reference(deal_reference).await?;
        Ok(deal)
    }

    /// Stores a deal directly, without going through the [`Self::process`] rules. The deal is always inserted, even
    /// if it is already app complete.
    pub async fn create(&self, deal: NewDeal) -> Result<Deal, DealApiError> {
        let id = self.db.insert_deal(deal.clone()).await?;
        let deal = deal.into_deal(id);
        info!("🔄️ Created deal instance for [{}] with id {id}", deal.deal_reference);
        self.call_deal_created_hook(&deal).await;
        Ok(deal)
    }

    /// Overwrites the timestamps of the stored deal with the same id as `deal`. If there is no such deal, the request is
    /// logged and ignored, and `None` is returned.
    pub async fn update(&self, deal: &DealSubmission) -> Result<Option<Deal>, DealApiError> {
        let Some(id) = deal.id else {
            error!("🔄️ Could not update deal [{}]. It has no id", deal.deal_reference);
            return Ok(None);
        };
        let Some(stored) = self.db.fetch_deal_by_id(id).await? else {
            error!("🔄️ Could not update deal id {id} [{}]. It does not exist", deal.deal_reference);
            return Ok(None);
        };
        let updated = self.db.update_deal_timestamps(id, deal.timestamps()).await?;
        match &updated {
            Some(d) => {
                info!("🔄️ Updated deal [{}]", d.deal_reference);
                self.call_deal_updated_hook(stored, d).await;
            },
            None => error!("🔄️ Could not update deal id {id}. It was removed by another request"),
        }
        Ok(updated)
    }

    /// Removes the stored deal with the same id as `deal`. A missing deal is logged, not reported as an error.
    pub async fn delete(&self, deal: &DealSubmission) -> Result<Option<Deal>, DealApiError> {
        let Some(id) = deal.id else {
            error!("🔄️ Could not delete deal [{}]. It has no id", deal.deal_reference);
            return Ok(None);
        };
        let deleted = self.db.delete_deal_by_id(id).await?;
        match &deleted {
            Some(d) => info!("🔄️ Deleted deal #{id} [{}]", d.deal_reference),
            None => error!("🔄️ Could not delete deal id {id}. It does not exist"),
        }
        Ok(deleted)
    }

    /// Removes the stored deal with the given business reference. A missing deal is logged, not reported as an error.
    pub async fn delete_by_reference(&self, deal_reference: &str) -> Result<Option<Deal>, DealApiError> {
        let deleted = match self.db.fetch_deal_by_reference(deal_reference).await? {
            Some(deal) => self.db.delete_deal_by_id(deal.id).await?,
            None => None,
        };
        match &deleted {
            Some(d) => info!("🔄️ Deleted deal #{} by reference [{deal_reference}]", d.id),
            None => info!("🔄️ No deal to delete for reference [{deal_reference}]"),
        }
        Ok(deleted)
    }

    async fn call_deal_created_hook(&self, deal: &Deal) {
        for emitter in &self.producers.deal_created_producer {
            debug!("🔄️ Notifying deal created hook subscribers");
            emitter.publish_event(DealCreatedEvent::new(deal.clone())).await;
        }
    }

    async fn call_deal_updated_hook(&self, old_deal: Deal, new_deal: &Deal) {
        for emitter in &self.producers.deal_updated_producer {
            debug!("🔄️ Notifying deal updated hook subscribers");
            emitter.publish_event(DealUpdatedEvent::new(old_deal.clone(), new_deal.clone())).await;
        }
    }

    async fn call_deal_completed_hook(&self, deal: &Deal) {
        for emitter in &self.producers.deal_completed_producer {
            debug!("🔄️ Notifying deal completed hook subscribers");
            emitter.publish_event(DealCompletedEvent::new(deal.clone())).await;
        }
    }
}

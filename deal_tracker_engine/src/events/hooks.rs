use std::{future::Future, pin::Pin, sync::Arc};

use tokio::task::JoinHandle;

use crate::events::{DealCompletedEvent, DealCreatedEvent, DealUpdatedEvent, EventHandler, EventProducer, Handler};

type HookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// The publishing ends of the deal event channels. An empty set of producers (the default) publishes nothing.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub deal_created_producer: Vec<EventProducer<DealCreatedEvent>>,
    pub deal_updated_producer: Vec<EventProducer<DealUpdatedEvent>>,
    pub deal_completed_producer: Vec<EventProducer<DealCompletedEvent>>,
}

pub struct EventHandlers {
    pub on_deal_created: Option<EventHandler<DealCreatedEvent>>,
    pub on_deal_updated: Option<EventHandler<DealUpdatedEvent>>,
    pub on_deal_completed: Option<EventHandler<DealCompletedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_deal_created = hooks.on_deal_created.map(|f| EventHandler::new(buffer_size, f));
        let on_deal_updated = hooks.on_deal_updated.map(|f| EventHandler::new(buffer_size, f));
        let on_deal_completed = hooks.on_deal_completed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_deal_created, on_deal_updated, on_deal_completed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_deal_created {
            result.deal_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_deal_updated {
            result.deal_updated_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_deal_completed {
            result.deal_completed_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns a task for each registered handler. The tasks end once every producer has been dropped and the
    /// pending events have been handled.
    pub fn start_handlers(self) -> Vec<JoinHandle<()>> {
        let mut tasks = Vec::with_capacity(3);
        if let Some(handler) = self.on_deal_created {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        if let Some(handler) = self.on_deal_updated {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        if let Some(handler) = self.on_deal_completed {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        tasks
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_deal_created: Option<Handler<DealCreatedEvent>>,
    pub on_deal_updated: Option<Handler<DealUpdatedEvent>>,
    pub on_deal_completed: Option<Handler<DealCompletedEvent>>,
}

impl EventHooks {
    pub fn on_deal_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DealCreatedEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_deal_created = Some(Arc::new(f));
        self
    }

    pub fn on_deal_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DealUpdatedEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_deal_updated = Some(Arc::new(f));
        self
    }

    pub fn on_deal_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DealCompletedEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_deal_completed = Some(Arc::new(f));
        self
    }
}

use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use chrono::{NaiveDate, NaiveDateTime};
use deal_tracker_engine::{
    db_types::{DealTimestamps, NewDeal},
    events::{EventHandlers, EventHooks},
    DealFlowApi,
    DealStore,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        json_config,
        DealsInProcessingRoute,
        DealsWaitingRoute,
        DeleteByReferenceRoute,
        GetAllRoute,
        GetByReferenceRoute,
        ProcessDealRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 50;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if config.max_connections == 0 {
        return Err(ServerError::ConfigurationError("DT_MAX_CONNECTIONS must be at least 1".into()));
    }
    if config.create_database {
        SqliteDatabase::create_if_missing(&config.database_url).await?;
    }
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections).await?;
    if config.create_database {
        db.run_migrations().await?;
    }
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, event_hooks());
    let producers = handlers.producers();
    // The handler tasks wind down by themselves once the api, and with it every producer, is dropped
    let _handler_tasks = handlers.start_handlers();
    let api = DealFlowApi::new(db, producers);
    if config.seed_demo_deal {
        seed_demo_deal(&api).await?;
    }
    let srv = create_server_instance(config, api)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, api: DealFlowApi<SqliteDatabase>) -> Result<Server, ServerError> {
    let api = web::Data::new(api);
    let srv = HttpServer::new(move || {
        let deals_scope = web::scope("/dealtracker")
            .service(GetAllRoute::<SqliteDatabase>::new())
            .service(GetByReferenceRoute::<SqliteDatabase>::new())
            .service(DealsWaitingRoute::<SqliteDatabase>::new())
            .service(DealsInProcessingRoute::<SqliteDatabase>::new())
            .service(ProcessDealRoute::<SqliteDatabase>::new())
            .service(DeleteByReferenceRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("dt::access_log"))
            .app_data(api.clone())
            .app_data(json_config())
            .service(health)
            .service(deals_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Once a deal is app complete its record is deleted, so the completion event is the only trace it leaves behind.
fn event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_deal_completed(|ev| {
        Box::pin(async move {
            info!("📬️ Deal completed and removed from the tracker: {}", ev.deal);
        })
    });
    hooks
}

fn demo_time(day: u32, hour: u32, minute: u32) -> Result<NaiveDateTime, ServerError> {
    NaiveDate::from_ymd_opt(2024, 9, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| ServerError::Unspecified(format!("Invalid demo timestamp: 2024-09-{day} {hour}:{minute}")))
}

/// Inserts a sample deal so that its JSON can be fetched, edited by hand and submitted back.
async fn seed_demo_deal<B: DealStore>(api: &DealFlowApi<B>) -> Result<(), ServerError> {
    let timestamps = DealTimestamps::arrived(demo_time(4, 5, 6)?)
        .with_sent_time(demo_time(5, 6, 7)?)
        .with_vest_complete_time(demo_time(6, 7, 8)?)
        .with_app_complete_time(demo_time(7, 8, 9)?);
    let deal = NewDeal::new("abc123::1", "chainABC", 1).with_timestamps(timestamps);
    let deal = api.create(deal).await?;
    info!("🚀️ Added demo deal {deal}");
    Ok(())
}

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{NaiveDate, NaiveDateTime};
use deal_tracker_engine::{
    db_types::{Deal, DealTimestamps, NewDeal},
    DealStoreError,
};
use mockall::predicate::{always, eq};
use serde_json::Value;

use super::{
    helpers::{configure_api, delete_request, get_request, post_request},
    mocks::MockStore,
};
use crate::routes::{
    DealsInProcessingRoute,
    DealsWaitingRoute,
    DeleteByReferenceRoute,
    GetAllRoute,
    GetByReferenceRoute,
    ProcessDealRoute,
};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, day).unwrap().and_hms_opt(hour, 6, 7).unwrap()
}

fn waiting(id: i64, reference: &str, chain: &str, chain_number: i32) -> Deal {
    NewDeal::new(reference, chain, chain_number).with_timestamps(DealTimestamps::arrived(at(4, 5))).into_deal(id)
}

fn sent(id: i64, reference: &str, chain: &str, chain_number: i32) -> Deal {
    NewDeal::new(reference, chain, chain_number)
        .with_timestamps(DealTimestamps::arrived(at(4, 5)).with_sent_time(at(5, 6)))
        .into_deal(id)
}

fn mixed_deals() -> Vec<Deal> {
    vec![
        sent(1, "chain123::1", "chainBCD", 1),
        waiting(2, "chain123::2", "chainBCD", 2),
        waiting(3, "chain123::3", "chainABC", 2),
        sent(4, "chain123::4", "chainABC", 1),
        waiting(5, "chain123::5", "chainABC", 2),
        sent(6, "chain123::6", "chainABC", 1),
    ]
}

fn configure(cfg: &mut ServiceConfig, store: MockStore) {
    configure_api(cfg, store);
    cfg.service(
        web::scope("/dealtracker")
            .service(GetAllRoute::<MockStore>::new())
            .service(GetByReferenceRoute::<MockStore>::new())
            .service(DealsWaitingRoute::<MockStore>::new())
            .service(DealsInProcessingRoute::<MockStore>::new())
            .service(ProcessDealRoute::<MockStore>::new())
            .service(DeleteByReferenceRoute::<MockStore>::new()),
    );
}

fn references(body: &str) -> Vec<String> {
    let deals: Vec<Deal> = serde_json::from_str(body).expect("Body is not a list of deals");
    deals.into_iter().map(|d| d.deal_reference).collect()
}

#[actix_web::test]
async fn fetch_all_deals() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_all_deals().times(1).returning(|| Ok(mixed_deals()));
    let (status, body) = get_request("/dealtracker/getAll", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::OK);
    let deals: Vec<Deal> = serde_json::from_str(&body).expect("Body is not a list of deals");
    assert_eq!(deals, mixed_deals());
}

#[actix_web::test]
async fn fetch_deal_by_reference() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_deal_by_reference().times(1).returning(|r| {
        assert_eq!(r, "chain123::1");
        Ok(Some(sent(1, "chain123::1", "chainABC", 1)))
    });
    let (status, body) = get_request("/dealtracker/get/chain123::1", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["dealReference"], "chain123::1");
    assert_eq!(json["chain"], "chainABC");
    assert_eq!(json["chainNumber"], 1);
    assert_eq!(json["arrivalTime"], "2024-09-04T05:06:07");
    assert_eq!(json["sentTime"], "2024-09-05T06:06:07");
    assert_eq!(json["vestCompleteTime"], Value::Null);
    assert_eq!(json["appCompleteTime"], Value::Null);
}

#[actix_web::test]
async fn fetch_unknown_deal_is_null() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_deal_by_reference().times(1).returning(|_| Ok(None));
    let (status, body) = get_request("/dealtracker/get/nope", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "null");
}

#[actix_web::test]
async fn deals_waiting_are_sorted_by_chain() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_all_deals().returning(|| Ok(mixed_deals()));
    let (status, body) = get_request("/dealtracker/getDealsWaiting", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(references(&body), vec!["chain123::3", "chain123::5", "chain123::2"]);
}

#[actix_web::test]
async fn deals_in_processing_are_sorted_by_chain() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_all_deals().returning(|| Ok(mixed_deals()));
    let (status, body) = get_request("/dealtracker/getDealsInProcessing", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(references(&body), vec!["chain123::4", "chain123::6", "chain123::1"]);
}

#[actix_web::test]
async fn process_new_deal() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_insert_deal()
        .withf(|d| {
            d.deal_reference == "chain123::1" &&
                d.chain == "chainABC" &&
                d.chain_number == 1 &&
                d.timestamps == DealTimestamps::arrived(at(4, 5))
        })
        .times(1)
        .returning(|_| Ok(1));
    let body = r#"{"dealReference":"chain123::1","chain":"chainABC","chainNumber":1,"arrivalTime":"2024-09-04T05:06:07"}"#;
    let (status, body) = post_request("/dealtracker/process", body, move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn process_sent_deal_updates_it() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_deal_by_id().with(eq(1)).times(1).returning(|_| Ok(Some(waiting(1, "chain123::1", "chainABC", 1))));
    store
        .expect_update_deal_timestamps()
        .with(eq(1), always())
        .times(1)
        .returning(|id, ts| {
            assert_eq!(ts.sent_time, Some(at(5, 6)));
            let mut deal = waiting(id, "chain123::1", "chainABC", 1);
            deal.set_timestamps(ts);
            Ok(Some(deal))
        });
    let body = r#"{"id":1,"dealReference":"chain123::1","chain":"chainABC","chainNumber":1,
        "arrivalTime":"2024-09-04T05:06:07","sentTime":"2024-09-05T06:06:07"}"#;
    let (status, _) = post_request("/dealtracker/process", body, move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn process_app_complete_deal_deletes_it() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_deal_by_id().with(eq(4)).times(1).returning(|_| Ok(Some(sent(4, "chain123::4", "chainABC", 1))));
    store.expect_delete_deal_by_id().with(eq(4)).times(1).returning(|_| Ok(Some(sent(4, "chain123::4", "chainABC", 1))));
    let body = r#"{"id":4,"dealReference":"chain123::4","chain":"chainABC","chainNumber":1,
        "arrivalTime":"2024-09-04T05:06:07","sentTime":"2024-09-05T06:06:07","appCompleteTime":"2024-09-07T08:06:07"}"#;
    let (status, _) = post_request("/dealtracker/process", body, move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn process_unknown_id_is_ignored() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_deal_by_id().with(eq(99)).times(1).returning(|_| Ok(None));
    let body = r#"{"id":99,"dealReference":"ghost","chain":"chainABC","chainNumber":1,"sentTime":"2024-09-05T06:06:07"}"#;
    let (status, _) = post_request("/dealtracker/process", body, move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn process_app_complete_without_id_is_ignored() {
    let _ = env_logger::try_init().ok();
    // No expectations: any call into the store fails the test
    let store = MockStore::new();
    let body = r#"{"dealReference":"orphan","chain":"chainABC","chainNumber":1,"appCompleteTime":"2024-09-07T08:06:07"}"#;
    let (status, _) = post_request("/dealtracker/process", body, move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn process_malformed_deal() {
    let _ = env_logger::try_init().ok();
    let store = MockStore::new();
    let body = r#"{"dealReference":"chain123::1","arrivalTime":"yesterday"}"#;
    let (status, body) = post_request("/dealtracker/process", body, move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn delete_deal_by_reference() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_fetch_deal_by_reference()
        .times(1)
        .returning(|_| Ok(Some(waiting(3, "chain123::3", "chainABC", 2))));
    store.expect_delete_deal_by_id().with(eq(3)).times(1).returning(|_| Ok(Some(waiting(3, "chain123::3", "chainABC", 2))));
    let (status, body) = delete_request("/dealtracker/delete/chain123::3", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[actix_web::test]
async fn delete_unknown_deal() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_deal_by_reference().times(1).returning(|_| Ok(None));
    let (status, _) = delete_request("/dealtracker/delete/nope", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn wrong_method_is_not_routed() {
    let _ = env_logger::try_init().ok();
    let store = MockStore::new();
    let (status, _) = get_request("/dealtracker/process", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn database_errors_are_reported() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_all_deals().returning(|| Err(DealStoreError::DatabaseError("disk on fire".into())));
    let (status, body) = get_request("/dealtracker/getDealsWaiting", move |cfg| configure(cfg, store)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json["error"],
        "An error occurred on the backend of the server. Database error: Database error: disk on fire"
    );
}

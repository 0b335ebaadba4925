use std::str::FromStr;

use chrono::NaiveDateTime;
use cucumber::{then, when};
use deal_tracker_engine::{
    db_types::{Deal, DealSubmission, DealTimestamps, NewDeal},
    ProcessOutcome,
};

use crate::cucumber::DealWorld;

fn timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::from_str(s).unwrap_or_else(|e| panic!("{s} is not a valid timestamp. {e}"))
}

async fn refresh_client_copy(world: &mut DealWorld, deal_reference: &str) {
    let stored = world.api().deal_by_reference(deal_reference).await.expect("Error fetching deal");
    match stored {
        Some(deal) => {
            world.client_copies.insert(deal_reference.to_string(), DealSubmission::from(deal));
        },
        None => {
            world.client_copies.remove(deal_reference);
        },
    }
}

async fn submit(world: &mut DealWorld, submission: DealSubmission) -> ProcessOutcome {
    let deal_reference = submission.deal_reference.clone();
    let outcome = world.api().process(submission).await.expect("Error processing deal");
    refresh_client_copy(world, &deal_reference).await;
    outcome
}

async fn fetch_deal(world: &DealWorld, deal_reference: &str) -> Option<Deal> {
    world.api().deal_by_reference(deal_reference).await.expect("Error fetching deal")
}

#[when(expr = "deal {word} on chain {word} number {int} arrives at {string}")]
async fn deal_arrives(world: &mut DealWorld, deal_reference: String, chain: String, chain_number: i32, at: String) {
    let submission = DealSubmission::new(deal_reference, chain, chain_number)
        .with_timestamps(DealTimestamps::arrived(timestamp(&at)));
    let outcome = submit(world, submission).await;
    assert!(matches!(outcome, ProcessOutcome::Created(_)), "Expected a new deal, got {outcome:?}");
}

#[when(expr = "deal {word} is sent at {string}")]
async fn deal_sent(world: &mut DealWorld, deal_reference: String, at: String) {
    let copy = world.client_copy(&deal_reference);
    copy.sent_time = Some(timestamp(&at));
    let submission = copy.clone();
    submit(world, submission).await;
}

#[when(expr = "deal {word} is vest complete at {string}")]
async fn deal_vest_complete(world: &mut DealWorld, deal_reference: String, at: String) {
    let copy = world.client_copy(&deal_reference);
    copy.vest_complete_time = Some(timestamp(&at));
    let submission = copy.clone();
    submit(world, submission).await;
}

#[when(expr = "deal {word} is app complete at {string}")]
async fn deal_app_complete(world: &mut DealWorld, deal_reference: String, at: String) {
    let copy = world.client_copy(&deal_reference);
    copy.app_complete_time = Some(timestamp(&at));
    let submission = copy.clone();
    let outcome = submit(world, submission).await;
    assert!(matches!(outcome, ProcessOutcome::Completed(_)), "Expected the deal to complete, got {outcome:?}");
}

#[when(expr = "deal {word} is submitted with id {int} and sent at {string}")]
async fn submit_with_unknown_id(world: &mut DealWorld, deal_reference: String, id: i64, at: String) {
    let submission = DealSubmission::new(deal_reference, "unknown", 0)
        .with_id(id)
        .with_timestamps(DealTimestamps::default().with_sent_time(timestamp(&at)));
    let outcome = world.api().process(submission).await.expect("Error processing deal");
    assert_eq!(outcome, ProcessOutcome::NotFound);
}

#[when(expr = "deal {word} is deleted by reference")]
async fn delete_by_reference(world: &mut DealWorld, deal_reference: String) {
    world.api().delete_by_reference(&deal_reference).await.expect("Error deleting deal");
    refresh_client_copy(world, &deal_reference).await;
}

#[when(expr = "deal {word} on chain {word} number {int} is registered as app complete at {string}")]
async fn create_completed_deal(
    world: &mut DealWorld,
    deal_reference: String,
    chain: String,
    chain_number: i32,
    at: String,
) {
    let at = timestamp(&at);
    let deal = NewDeal::new(deal_reference.clone(), chain, chain_number)
        .with_timestamps(DealTimestamps::arrived(at).with_app_complete_time(at));
    world.api().create(deal).await.expect("Error creating deal");
    refresh_client_copy(world, &deal_reference).await;
}

#[then(expr = "there is/are {int} deal(s) waiting")]
async fn count_waiting(world: &mut DealWorld, count: usize) {
    let deals = world.api().deals_waiting().await.expect("Error fetching waiting deals");
    assert_eq!(deals.len(), count, "Unexpected number of waiting deals");
}

#[then(expr = "there is/are {int} deal(s) in processing")]
async fn count_processing(world: &mut DealWorld, count: usize) {
    let deals = world.api().deals_in_processing().await.expect("Error fetching deals in processing");
    assert_eq!(deals.len(), count, "Unexpected number of deals in processing");
}

#[then(expr = "there is/are {int} deal(s) in total")]
async fn count_all(world: &mut DealWorld, count: usize) {
    let deals = world.api().all_deals().await.expect("Error fetching deals");
    assert_eq!(deals.len(), count, "Unexpected number of deals");
}

#[then(expr = "deal {word} does not exist")]
async fn deal_does_not_exist(world: &mut DealWorld, deal_reference: String) {
    let deal = fetch_deal(world, &deal_reference).await;
    assert!(deal.is_none(), "Deal {deal_reference} should not exist, but found {deal:?}");
}

#[then(expr = "deal {word} has {word} of {string}")]
async fn deal_field(world: &mut DealWorld, deal_reference: String, field: String, value: String) {
    let deal = fetch_deal(world, &deal_reference).await.unwrap_or_else(|| panic!("Deal {deal_reference} does not exist"));
    let expected_time = || if value == "null" { None } else { Some(timestamp(&value)) };
    match field.as_str() {
        "chain" => assert_eq!(deal.chain, value, "Chain is incorrect"),
        "chainNumber" => assert_eq!(deal.chain_number.to_string(), value, "Chain number is incorrect"),
        "status" => assert_eq!(deal.status().to_string(), value, "Status is incorrect"),
        "arrivalTime" => assert_eq!(deal.arrival_time, expected_time(), "Arrival time is incorrect"),
        "sentTime" => assert_eq!(deal.sent_time, expected_time(), "Sent time is incorrect"),
        "vestCompleteTime" => assert_eq!(deal.vest_complete_time, expected_time(), "Vest complete time is incorrect"),
        "appCompleteTime" => assert_eq!(deal.app_complete_time, expected_time(), "App complete time is incorrect"),
        _ => panic!("Unknown field {field}"),
    }
}

fn references(deals: &[Deal]) -> String {
    deals.iter().map(|d| d.deal_reference.as_str()).collect::<Vec<_>>().join(",")
}

#[then(expr = "the waiting deals are {string}")]
async fn waiting_order(world: &mut DealWorld, expected: String) {
    let deals = world.api().deals_waiting().await.expect("Error fetching waiting deals");
    assert_eq!(references(&deals), expected, "Waiting deals are not in the expected order");
}

#[then(expr = "the deals in processing are {string}")]
async fn processing_order(world: &mut DealWorld, expected: String) {
    let deals = world.api().deals_in_processing().await.expect("Error fetching deals in processing");
    assert_eq!(references(&deals), expected, "Deals in processing are not in the expected order");
}

//! Tests for the list view state machine: load transitions, the stale-fetch
//! guard, criteria and paging, and mutation outcomes.

use serde_json::{Map, Value, json};

use crate::error::{ErrorKind, RentalError};
use crate::query::{DateRange, PriceRange, SortPreset};
use crate::record::{Record, RecordId};
use crate::remote::{MemoryCollaborator, WriteMethod};
use crate::session::Session;

use super::{ListAction, ListView, LoadState, ViewConfig};
use super::list::FetchReason;

// ============================================================================
// Helpers
// ============================================================================

const READ_PATH: &str = "api/lost-and-found/admin/all";

fn report(id: u32) -> Record {
    let kind = if id % 2 == 0 { "found" } else { "lost" };
    Record::from_value(json!({
        "id": id,
        "title": format!("Report {id}"),
        "description": "left near the parking lot",
        "type": kind,
        "status": "active",
        "location": "Kathmandu",
        "user": { "fname": "Ram" },
        "createdAt": format!("2024-03-{id:02}T10:00:00Z"),
        "date": format!("2024-03-{id:02}"),
    }))
    .unwrap()
}

fn reports(n: u32) -> Vec<Record> {
    (1..=n).map(report).collect()
}

fn api(records: Vec<Record>) -> MemoryCollaborator {
    MemoryCollaborator::new()
        .with_list(READ_PATH, records)
        .with_route("api/lost-and-found", READ_PATH)
        .with_route("api/lost-and-found/edit", READ_PATH)
        .with_route("api/lost-and-found/resolve", READ_PATH)
}

fn admin() -> Session {
    Session::admin("1", "Admin")
}

fn visible_ids(view: &ListView) -> Vec<String> {
    view.visible()
        .items
        .iter()
        .map(|r| r.id().to_string())
        .collect()
}

fn record_ids(view: &ListView) -> Vec<String> {
    view.records().iter().map(|r| r.id().to_string()).collect()
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

async fn loaded(n: u32) -> (ListView, MemoryCollaborator) {
    let api = api(reports(n));
    let mut view = ListView::new(ViewConfig::lost_and_found());
    view.load(&api, &admin()).await.unwrap();
    (view, api)
}

// ============================================================================
// Load state machine
// ============================================================================

#[test]
fn test_new_view_is_idle_and_empty() {
    let view = ListView::new(ViewConfig::lost_and_found());
    assert_eq!(view.load_state(), LoadState::Idle);
    let page = view.visible();
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.current_page, 1);
}

#[test]
fn test_begin_fetch_enters_loading() {
    let mut view = ListView::new(ViewConfig::lost_and_found());
    let ticket = view.begin_fetch(FetchReason::Initial);
    assert!(view.is_loading());
    assert_eq!(ticket.generation(), 1);
    assert!(view.complete_fetch(ticket, Ok(reports(3))));
    assert_eq!(view.load_state(), LoadState::Loaded);
    assert_eq!(view.records().len(), 3);
}

#[test]
fn test_stale_fetch_is_discarded() {
    let mut view = ListView::new(ViewConfig::lost_and_found());
    let first = view.begin_fetch(FetchReason::Initial);
    let second = view.begin_fetch(FetchReason::Refresh);

    assert!(view.complete_fetch(second, Ok(reports(2))));
    assert!(!view.complete_fetch(first, Ok(reports(9))));

    assert_eq!(view.records().len(), 2);
    assert_eq!(view.load_state(), LoadState::Loaded);
}

#[test]
fn test_stale_failure_is_discarded() {
    let mut view = ListView::new(ViewConfig::lost_and_found());
    let first = view.begin_fetch(FetchReason::Initial);
    let second = view.begin_fetch(FetchReason::Initial);
    assert!(view.complete_fetch(second, Ok(reports(2))));
    assert!(!view.complete_fetch(first, Err(RentalError::Network("late".to_string()))));
    assert_eq!(view.last_error(), None);
    assert!(view.toast().is_none());
}

#[tokio::test]
async fn test_failed_refresh_keeps_records() {
    let (mut view, api) = loaded(4).await;
    api.fail_next(RentalError::Status {
        status: 500,
        message: "Internal Server Error".to_string(),
    });

    let err = view.refresh(&api, &admin()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(view.load_state(), LoadState::Failed);
    assert_eq!(view.records().len(), 4);
    assert_eq!(
        view.last_error(),
        Some("request failed with HTTP 500: Internal Server Error")
    );
    assert!(view.toast().is_some_and(|t| t.is_error()));
}

#[tokio::test]
async fn test_refresh_preserves_criteria_initial_load_resets() {
    let (mut view, api) = loaded(10).await;
    view.set_status("lost").unwrap();
    view.set_query("report").unwrap();

    view.refresh(&api, &admin()).await.unwrap();
    assert_eq!(view.criteria().status, "lost");
    assert_eq!(view.filtered().len(), 5);

    view.load(&api, &admin()).await.unwrap();
    assert!(view.criteria().is_empty());
    assert_eq!(view.filtered().len(), 10);
}

// ============================================================================
// Criteria, sort and paging
// ============================================================================

#[tokio::test]
async fn test_default_order_is_newest_first_and_paged() {
    let (mut view, _api) = loaded(10).await;
    assert_eq!(visible_ids(&view), vec!["10", "9", "8", "7", "6", "5"]);

    view.next_page();
    assert_eq!(view.current_page(), 2);
    assert_eq!(visible_ids(&view), vec!["4", "3", "2", "1"]);

    view.next_page();
    assert_eq!(view.current_page(), 2);
    view.jump_to(7);
    assert_eq!(view.current_page(), 2);
}

#[tokio::test]
async fn test_paging_actions_match_direct_calls() {
    let (mut view, _api) = loaded(14).await;

    view.apply(ListAction::NextPage).unwrap();
    view.next_page();
    assert_eq!(view.current_page(), 3);
    view.apply(ListAction::NextPage).unwrap();
    assert_eq!(view.current_page(), 3);

    view.previous_page();
    assert_eq!(view.current_page(), 2);
    view.apply(ListAction::PreviousPage).unwrap();
    view.previous_page();
    assert_eq!(view.current_page(), 1);

    view.apply(ListAction::JumpTo(3)).unwrap();
    assert_eq!(view.current_page(), 3);
    view.apply(ListAction::JumpTo(0)).unwrap();
    assert_eq!(view.current_page(), 3);
}

#[tokio::test]
async fn test_criteria_change_returns_to_first_page() {
    let (mut view, _api) = loaded(10).await;
    view.jump_to(2);
    view.set_query("report").unwrap();
    assert_eq!(view.current_page(), 1);

    view.jump_to(2);
    view.set_sort_preset(SortPreset::DateOldest).unwrap();
    assert_eq!(view.current_page(), 1);
    assert_eq!(visible_ids(&view)[0], "1");
}

#[tokio::test]
async fn test_invalid_criteria_leave_view_untouched() {
    let (mut view, _api) = loaded(10).await;
    view.set_status("found").unwrap();

    let err = view.set_status("archived").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(view.criteria().status, "found");

    // lost-and-found has no prices
    assert!(view
        .set_price_range(Some(PriceRange::new(Some(1.0), None)))
        .is_err());
    assert!(view.set_sort_preset(SortPreset::PriceLow).is_err());
    assert_eq!(view.filtered().len(), 5);
}

#[tokio::test]
async fn test_date_range_uses_report_date() {
    let (mut view, _api) = loaded(10).await;
    let range = DateRange::new(
        "2024-03-03T00:00:00Z".parse().ok(),
        "2024-03-05T23:59:59Z".parse().ok(),
    );
    view.set_date_range(Some(range)).unwrap();
    let mut ids = visible_ids(&view);
    ids.sort();
    assert_eq!(ids, vec!["3", "4", "5"]);

    view.reset_filters().unwrap();
    assert_eq!(view.filtered().len(), 10);
}

#[test]
fn test_date_range_rejected_on_listing() {
    let mut view = ListView::new(ViewConfig::listings());
    let range = DateRange::new("2024-03-03T00:00:00Z".parse().ok(), None);
    assert!(view.set_date_range(Some(range)).is_err());
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_delete_keeps_order_of_the_rest() {
    let (mut view, api) = loaded(6).await;
    view.delete(&api, &admin(), &RecordId::from(5u64))
        .await
        .unwrap();

    assert_eq!(record_ids(&view), vec!["1", "2", "3", "4", "6"]);
    assert!(view.toast().is_some_and(|t| !t.is_error()));
    assert_eq!(
        api.writes(),
        vec![(WriteMethod::Delete, "api/lost-and-found/5".to_string())]
    );
}

#[tokio::test]
async fn test_delete_clamps_page() {
    let (mut view, api) = loaded(7).await;
    view.jump_to(2);
    assert_eq!(visible_ids(&view), vec!["1"]);

    view.delete(&api, &admin(), &RecordId::from(1u64))
        .await
        .unwrap();
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.visible().total_pages, 1);
}

#[tokio::test]
async fn test_delete_vanished_record_refetches() {
    let (mut view, api) = loaded(6).await;
    api.remove(READ_PATH, &RecordId::from(3u64));

    let err = view
        .delete(&api, &admin(), &RecordId::from(3u64))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(api.fetch_count(), 2);
    assert_eq!(record_ids(&view), vec!["1", "2", "4", "5", "6"]);
    assert!(view.toast().is_some_and(|t| t.is_error()));
}

#[tokio::test]
async fn test_delete_unknown_id_reconciles_without_writing() {
    let (mut view, api) = loaded(6).await;

    let err = view
        .delete(&api, &admin(), &RecordId::from(99u64))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(api.writes().is_empty());
    assert_eq!(api.fetch_count(), 2);
    assert_eq!(view.records().len(), 6);
    assert!(
        view.toast()
            .is_some_and(|t| t.is_error() && t.message.ends_with("The list was refreshed."))
    );
}

#[tokio::test]
async fn test_network_error_on_write_leaves_state() {
    let (mut view, api) = loaded(6).await;
    api.fail_next(RentalError::Network("connection reset".to_string()));

    let err = view
        .delete(&api, &admin(), &RecordId::from(2u64))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(view.records().len(), 6);
    assert_eq!(api.fetch_count(), 1);
    assert!(view.toast().is_some_and(|t| t.is_error()));
}

#[tokio::test]
async fn test_update_status_patches_without_reload() {
    let api = api(reports(3)).acknowledge_only();
    let mut view = ListView::new(ViewConfig::lost_and_found());
    view.load(&api, &admin()).await.unwrap();

    view.update_status(&api, &admin(), &RecordId::from(2u64), "resolved")
        .await
        .unwrap();

    let record = view.find(&RecordId::from(2u64)).unwrap();
    assert_eq!(record.text("status").as_deref(), Some("resolved"));
    assert_eq!(api.fetch_count(), 1);
    assert_eq!(
        api.writes(),
        vec![(WriteMethod::Put, "api/lost-and-found/resolve/2".to_string())]
    );

    view.set_status("resolved").unwrap();
    assert_eq!(visible_ids(&view), vec!["2"]);
}

#[tokio::test]
async fn test_edit_replaces_with_returned_record() {
    let (mut view, api) = loaded(3).await;
    let patch = fields(json!({ "title": "Lost Swift Keys", "location": "Pokhara" }));
    view.edit(&api, &admin(), &RecordId::from(1u64), patch)
        .await
        .unwrap();

    let record = view.find(&RecordId::from(1u64)).unwrap();
    assert_eq!(record.text("title").as_deref(), Some("Lost Swift Keys"));
    assert_eq!(record.text("location").as_deref(), Some("Pokhara"));
    assert_eq!(record_ids(&view), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_edit_validation() {
    let (mut view, api) = loaded(3).await;
    let id = RecordId::from(1u64);

    let blank = fields(json!({ "title": "  " }));
    let err = view.edit(&api, &admin(), &id, blank).await.unwrap_err();
    assert!(matches!(err, RentalError::MissingField(ref f) if f == "title"));

    let rename = fields(json!({ "id": 99 }));
    assert!(view.edit(&api, &admin(), &id, rename).await.is_err());

    let same = fields(json!({ "id": "1", "location": "Butwal" }));
    assert!(view.edit(&api, &admin(), &id, same).await.is_ok());

    assert_eq!(api.writes().len(), 1);
}

#[tokio::test]
async fn test_create_appends_and_requires_fields() {
    let (mut view, api) = loaded(2).await;

    let partial = fields(json!({ "title": "Helmet" }));
    let err = view.create(&api, &admin(), partial).await.unwrap_err();
    assert!(matches!(err, RentalError::MissingField(ref f) if f == "description"));
    assert!(api.writes().is_empty());

    let full = fields(json!({
        "title": "Helmet",
        "description": "black, full face",
        "type": "found",
        "location": "Lakeside",
    }));
    view.create(&api, &admin(), full).await.unwrap();
    assert_eq!(record_ids(&view), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_create_stamps_owner_id() {
    let (mut view, api) = loaded(2).await;
    let report = fields(json!({
        "title": "Wallet",
        "description": "brown leather",
        "type": "lost",
        "location": "Thamel",
    }));
    view.create(&api, &Session::admin("42", "Sita"), report)
        .await
        .unwrap();

    let stored = api.records(READ_PATH);
    let created = stored.last().unwrap();
    assert_eq!(created.id().as_str(), "3");
    assert_eq!(created.text("userId").as_deref(), Some("42"));
}

#[tokio::test]
async fn test_create_without_owner_field_sends_fields_only() {
    let api = MemoryCollaborator::new()
        .with_list("wishlist/7", Vec::new())
        .with_route("api/wishlist", "wishlist/7");
    let mut view = ListView::new(ViewConfig::wishlist());
    let session = Session::user("7", "Ram");
    view.load(&api, &session).await.unwrap();

    let item = fields(json!({ "vehicleName": "Swift", "purpose": "rent" }));
    view.create(&api, &session, item).await.unwrap();
    let stored = api.records("wishlist/7");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text("userId"), None);
}

#[tokio::test]
async fn test_customer_cannot_modify_admin_view() {
    let (mut view, api) = loaded(3).await;
    let err = view
        .delete(&api, &Session::user("7", "Ram"), &RecordId::from(1u64))
        .await
        .unwrap_err();
    assert!(matches!(err, RentalError::PermissionDenied(_)));
    assert!(api.writes().is_empty());
    assert_eq!(view.records().len(), 3);
}

#[tokio::test]
async fn test_mutation_before_load_rejected() {
    let api = api(reports(3));
    let mut view = ListView::new(ViewConfig::lost_and_found());
    let err = view
        .delete(&api, &admin(), &RecordId::from(1u64))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_read_only_view_rejects_writes() {
    let api = MemoryCollaborator::new().with_list("api/transaction", Vec::new());
    let mut view = ListView::new(ViewConfig::transactions());
    view.load(&api, &admin()).await.unwrap();
    let err = view
        .delete(&api, &admin(), &RecordId::from(1u64))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "transactions does not support deleting");
}

// ============================================================================
// Session scoping
// ============================================================================

#[tokio::test]
async fn test_guest_wishlist_requires_sign_in() {
    let api = MemoryCollaborator::new();
    let mut view = ListView::new(ViewConfig::wishlist());
    let err = view.load(&api, &Session::guest()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(view.load_state(), LoadState::Idle);
    assert_eq!(api.fetch_count(), 0);
}

#[tokio::test]
async fn test_wishlist_loads_for_user() {
    let items = vec![
        Record::from_value(json!({ "id": 1, "vehicleName": "Swift", "purpose": "rent", "status": "pending" }))
            .unwrap(),
    ];
    let api = MemoryCollaborator::new().with_list("wishlist/7", items);
    let mut view = ListView::new(ViewConfig::wishlist());
    view.load(&api, &Session::user("7", "Ram")).await.unwrap();
    assert_eq!(view.records().len(), 1);
}

#[tokio::test]
async fn test_transaction_summary_covers_all_records() {
    let records = vec![
        Record::from_value(json!({ "id": 1, "amount": 100, "status": "paid" })).unwrap(),
        Record::from_value(json!({ "id": 2, "amount": 50, "status": "pending" })).unwrap(),
    ];
    let api = MemoryCollaborator::new().with_list("api/transaction", records);
    let mut view = ListView::new(ViewConfig::transactions());
    view.load(&api, &admin()).await.unwrap();
    view.set_status("paid").unwrap();

    let summary = view.summary().unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.paid, 100.0);
    assert_eq!(summary.pending, 50.0);
    assert!(ListView::new(ViewConfig::vehicles()).summary().is_none());
}

//! Cache identity and invalidation scope of the resource repositories.
//!
//! - Pages and filters are independent entries
//! - Result mutations reach the owning plan's case and result lists only
//! - List views keep rows while a page loads
//! - Detail queries with a missing id never reach the network

use std::sync::Arc;

use kingyo_auth::{MemoryTokenStore, RecordingNavigator, TokenManager};
use kingyo_cache::{CacheEvent, QueryCache};
use kingyo_client::{
    Kingyo, ListView, TestCaseFilters, TestCaseListParams, TestResultListParams, keys,
};
use kingyo_config::{KingyoConfig, TokenStoreKind};
use kingyo_core::enums::{Browser, Os, Outcome, TestCaseStatus};
use kingyo_core::payloads::NewTestResult;
use kingyo_http::{AuthTransport, MockBackend, RetryPolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

const API_ROOT: &str = "http://localhost:8000/api/v1";

fn test_client() -> (Kingyo, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let cache = Arc::new(QueryCache::new());
    let session = Arc::new(TokenManager::new(
        Arc::clone(&backend) as _,
        API_ROOT,
        Arc::new(MemoryTokenStore::with_tokens("access-1", "refresh-1")),
        Arc::clone(&cache),
        Arc::new(RecordingNavigator::new()),
    ));
    let transport = AuthTransport::new(
        Arc::clone(&backend) as _,
        Arc::clone(&session) as _,
        API_ROOT,
        RetryPolicy::default(),
    );
    (Kingyo::new(transport, cache, session), backend)
}

fn case_json(plan: u64, id: u64, title: &str) -> Value {
    json!({
        "id": id, "plan": plan, "title": title, "description": "",
        "status": "ready", "latest_result": "in_progress",
        "created_at": "2025-03-01T09:00:00Z", "updated_at": "2025-03-01T09:00:00Z",
        "executed_at": null
    })
}

fn case_page(plan: u64, ids: &[u64], count: u64) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| case_json(plan, *id, &format!("case {id}")))
        .collect();
    json!({"count": count, "next": null, "previous": null, "results": results})
}

fn result_page() -> Value {
    json!({"count": 0, "next": null, "previous": null, "results": []})
}

fn created_result(case: u64, id: u64) -> Value {
    json!({
        "id": id, "case": case, "tester": 2, "result": "pass",
        "browser": "firefox", "os": "macos", "configuration": "firefox on macos",
        "comment": "", "executed_at": "2025-03-04T12:00:00Z", "updated_at": null
    })
}

// ---------------------------------------------------------------------------
// Cache identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_page_does_not_touch_the_first() {
    let (client, backend) = test_client();
    backend
        .push_json(200, &case_page(3, &[1, 2], 12))
        .push_json(200, &case_page(3, &[11, 12], 12));

    let page1 = TestCaseListParams::new();
    let page2 = TestCaseListParams::new().page(2);
    let first = client.list_test_cases(3, &page1).await.unwrap();
    client.list_test_cases(3, &page2).await.unwrap();

    let key1 = page1.key(keys::test_cases(3));
    let key2 = page2.key(keys::test_cases(3));
    assert_eq!(key1.to_string(), r#"["testcases", 3, 1, "", null, null]"#);
    assert_ne!(key1, key2);

    let cached = client.list_test_cases(3, &page1).await.unwrap();
    assert_eq!(cached, first);
    assert_eq!(backend.request_count(), 2);
}

#[tokio::test]
async fn changing_a_filter_fetches_independently() {
    let (client, backend) = test_client();
    backend
        .push_json(200, &case_page(3, &[1, 2], 2))
        .push_json(200, &case_page(3, &[2], 1));

    let all = TestCaseListParams::new();
    let ready = TestCaseListParams::new().filters(TestCaseFilters {
        status: Some(TestCaseStatus::Ready),
        latest_result: None,
    });
    client.list_test_cases(3, &all).await.unwrap();
    let filtered = client.list_test_cases(3, &ready).await.unwrap();

    assert_eq!(filtered.count, 1);
    assert_eq!(
        backend.request_lines(),
        vec![
            "GET http://localhost:8000/api/v1/testplans/3/testcases/?page=1",
            "GET http://localhost:8000/api/v1/testplans/3/testcases/?page=1&status=ready",
        ]
    );
}

// ---------------------------------------------------------------------------
// Invalidation scope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn creating_a_result_invalidates_only_its_plan() {
    let (client, backend) = test_client();
    backend
        .push_json(200, &case_page(3, &[7], 1))
        .push_json(200, &case_page(3, &[21], 11))
        .push_json(200, &case_page(4, &[8], 1))
        .push_json(200, &result_page());

    let page1 = TestCaseListParams::new();
    let page2 = TestCaseListParams::new().page(2);
    client.list_test_cases(3, &page1).await.unwrap();
    client.list_test_cases(3, &page2).await.unwrap();
    client.list_test_cases(4, &page1).await.unwrap();
    client
        .list_test_results(3, &TestResultListParams::new())
        .await
        .unwrap();

    backend.push_json(201, &created_result(7, 40));
    client
        .create_test_result(
            3,
            &NewTestResult {
                case: 7,
                tester: 2,
                result: Outcome::Pass,
                browser: Browser::Firefox,
                os: Os::Macos,
            },
        )
        .await
        .unwrap();

    let cache = client.cache();
    assert_eq!(cache.is_stale(&page1.key(keys::test_cases(3))), Some(true));
    assert_eq!(cache.is_stale(&page2.key(keys::test_cases(3))), Some(true));
    assert_eq!(
        cache.is_stale(&TestResultListParams::new().key(keys::test_results(3))),
        Some(true)
    );
    assert_eq!(cache.is_stale(&page1.key(keys::test_cases(4))), Some(false));
    assert_eq!(
        backend.request_lines().last().map(String::as_str),
        Some("POST http://localhost:8000/api/v1/testplans/3/testcases/7/testresults/")
    );

    // Stale data is still served until the refetch lands.
    backend.push_json(200, &case_page(3, &[7], 1));
    client.list_test_cases(3, &page1).await.unwrap();
    assert_eq!(cache.is_stale(&page1.key(keys::test_cases(3))), Some(false));
}

#[tokio::test]
async fn invalidations_are_broadcast() {
    let (client, backend) = test_client();
    backend.push_json(200, &case_page(3, &[7], 1));
    client
        .list_test_cases(3, &TestCaseListParams::new())
        .await
        .unwrap();

    let mut events = client.cache().subscribe();
    backend.push_json(201, &case_json(3, 8, "new"));
    client
        .create_test_case(3, kingyo_core::payloads::NewTestCase::new("new"))
        .await
        .unwrap();

    let event = events.recv().await.unwrap();
    let list_key = TestCaseListParams::new().key(keys::test_cases(3));
    assert!(event.touches(&list_key));
    assert!(matches!(event, CacheEvent::Invalidated(_)));
}

// ---------------------------------------------------------------------------
// List views
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_view_tracks_count_and_keeps_rows_on_failure() {
    let (client, backend) = test_client();
    let view = ListView::new();
    backend
        .push_json(200, &case_page(3, &[1, 2], 12))
        .push_json(500, &json!({"detail": "boom"}));

    view.load(client.list_test_cases(3, &TestCaseListParams::new()))
        .await
        .unwrap();
    assert_eq!(view.count(), 12);
    assert_eq!(view.page_count(), 2);

    let err = view
        .load(client.list_test_cases(3, &TestCaseListParams::new().page(2)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));

    let state = view.snapshot();
    assert_eq!(
        state.rows.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(state.error.is_some());
    assert!(!state.is_fetching);
}

#[rstest]
#[case::no_plan(0, 7, 40)]
#[case::no_case(3, 0, 40)]
#[case::no_result(3, 7, 0)]
#[tokio::test]
async fn detail_queries_with_a_zero_id_are_disabled(
    #[case] plan: u64,
    #[case] case: u64,
    #[case] id: u64,
) {
    let (client, backend) = test_client();

    assert_eq!(client.get_test_result(plan, case, id).await.unwrap(), None);
    assert_eq!(client.list_test_result_steps(plan, case, id).await.unwrap(), Vec::new());
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn client_built_from_config_uses_its_api_root() {
    let backend = Arc::new(MockBackend::new());
    backend.push_json(200, &json!({"id": 2, "username": "qa", "email": "qa@example.com"}));
    let mut config = KingyoConfig::default();
    config.api.base_url = "https://qa.example.com".into();
    config.auth.store = TokenStoreKind::Memory;

    let client = Kingyo::from_config(
        &config,
        Arc::clone(&backend) as _,
        Arc::new(RecordingNavigator::new()),
    )
    .unwrap();
    let me = client.current_user().await.unwrap();

    assert_eq!(me.username, "qa");
    let request = &backend.requests()[0];
    assert_eq!(request.url, "https://qa.example.com/api/v1/users/me/");
    assert_eq!(request.header_value("Authorization"), None);
}

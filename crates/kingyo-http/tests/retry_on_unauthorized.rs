//! The 401 refresh-and-retry loop against a scripted backend.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kingyo_http::{
    ApiError, ApiRequest, AuthTransport, MockBackend, RefreshError, RetryPolicy, TokenRefresher,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

#[derive(Default)]
struct FakeRefresher {
    token: Mutex<Option<String>>,
    refreshes: AtomicU32,
    fail: bool,
    expired: AtomicBool,
}

impl FakeRefresher {
    fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
            ..Self::default()
        }
    }

    fn failing(token: &str) -> Self {
        Self {
            fail: true,
            ..Self::with_token(token)
        }
    }
}

#[async_trait]
impl TokenRefresher for FakeRefresher {
    fn access_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    async fn refresh(&self, _rejected: Option<&str>) -> Result<(), RefreshError> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(Box::new(ApiError::RequestFailed {
                status: 401,
                body: "token_not_valid".into(),
            }));
        }
        *self.token.lock().unwrap() = Some(format!("access-{n}"));
        Ok(())
    }

    fn session_expired(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }
}

fn transport(
    backend: &Arc<MockBackend>,
    refresher: &Arc<FakeRefresher>,
    policy: RetryPolicy,
) -> AuthTransport {
    AuthTransport::new(
        Arc::clone(backend) as _,
        Arc::clone(refresher) as _,
        "http://localhost:8000/api/v1/",
        policy,
    )
}

#[tokio::test]
async fn refresh_then_retry_returns_success() {
    let backend = Arc::new(MockBackend::new());
    backend
        .push_status(401)
        .push_json(200, &json!({"id": 2, "username": "qa", "email": "qa@example.com"}));
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    let user: serde_json::Value = transport
        .send_json(ApiRequest::get(transport.url("users/me/")))
        .await
        .unwrap();

    assert_eq!(user["username"], "qa");
    assert_eq!(refresher.refreshes.load(Ordering::SeqCst), 1);
    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "http://localhost:8000/api/v1/users/me/");
    assert_eq!(requests[0].bearer_token(), Some("access-0"));
    assert_eq!(requests[1].bearer_token(), Some("access-1"));
    assert!(!refresher.expired.load(Ordering::SeqCst));
}

#[tokio::test]
async fn fourth_unauthorized_is_surfaced_without_retry() {
    let backend = Arc::new(MockBackend::new());
    for _ in 0..4 {
        backend.push_status(401);
    }
    // A fifth response that must never be consumed.
    backend.push_json(200, &json!({}));
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    let err = transport
        .send(ApiRequest::get(transport.url("testplans/")))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthExpired { attempts: 4 }));
    assert_eq!(backend.request_count(), 4);
    assert_eq!(backend.remaining(), 1);
    assert_eq!(refresher.refreshes.load(Ordering::SeqCst), 3);
    assert!(refresher.expired.load(Ordering::SeqCst));
}

#[tokio::test]
async fn failed_refresh_stops_immediately() {
    let backend = Arc::new(MockBackend::new());
    backend.push_status(401).push_json(200, &json!({}));
    let refresher = Arc::new(FakeRefresher::failing("stale"));
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    let err = transport
        .send(ApiRequest::get(transport.url("testplans/")))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthExpired { attempts: 1 }));
    assert_eq!(backend.request_count(), 1);
    assert_eq!(refresher.refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_failures_are_not_retried() {
    let backend = Arc::new(MockBackend::new());
    backend.push_bytes(400, br#"{"title": ["This field is required."]}"#.to_vec());
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    let err = transport
        .send(ApiRequest::post(transport.url("testplans/")))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("This field is required."));
    assert_eq!(refresher.refreshes.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case::forbidden(403)]
#[case::not_found(404)]
#[case::conflict(409)]
#[case::server_error(500)]
#[case::unavailable(503)]
#[tokio::test]
async fn non_auth_statuses_fail_once(#[case] status: u16) {
    let backend = Arc::new(MockBackend::new());
    backend.push_status(status);
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    let err = transport
        .send(ApiRequest::get(transport.url("testplans/3/")))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(status));
    assert_eq!(backend.request_count(), 1);
    assert_eq!(refresher.refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retry_preserves_method_body_and_headers() {
    let backend = Arc::new(MockBackend::new());
    backend.push_status(401).push_json(201, &json!({"id": 9}));
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    let request = ApiRequest::post(transport.url("testplans/"))
        .header("X-Request-Source", "cli")
        .json(&json!({"title": "Regression"}))
        .unwrap();
    transport.send(request).await.unwrap();

    let requests = backend.requests();
    let strip_auth = |r: &ApiRequest| {
        let mut r = r.clone();
        r.headers.retain(|(n, _)| n != "Authorization");
        r
    };
    assert_eq!(strip_auth(&requests[0]), strip_auth(&requests[1]));
    assert_eq!(requests[1].header_value("X-Request-Source"), Some("cli"));
}

#[tokio::test]
async fn missing_token_sends_no_authorization_header() {
    let backend = Arc::new(MockBackend::new());
    backend.push_json(200, &json!([]));
    let refresher = Arc::new(FakeRefresher::default());
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    transport.send(ApiRequest::get(transport.url("users/"))).await.unwrap();

    assert_eq!(backend.requests()[0].header_value("Authorization"), None);
}

#[tokio::test]
async fn zero_budget_surfaces_first_unauthorized() {
    let backend = Arc::new(MockBackend::new());
    backend.push_status(401);
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let policy = RetryPolicy {
        max_auth_retries: 0,
        ..RetryPolicy::default()
    };
    let transport = transport(&backend, &refresher, policy);

    let err = transport.send(ApiRequest::get(transport.url("users/"))).await.unwrap_err();
    assert!(matches!(err, ApiError::AuthExpired { attempts: 1 }));
    assert_eq!(refresher.refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn backoff_waits_before_each_retry() {
    let backend = Arc::new(MockBackend::new());
    backend.push_status(401).push_status(401).push_json(200, &json!({}));
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let policy = RetryPolicy {
        max_auth_retries: 3,
        backoff: Duration::from_millis(100),
    };
    let transport = transport(&backend, &refresher, policy);

    let start = tokio::time::Instant::now();
    transport.send(ApiRequest::get(transport.url("users/"))).await.unwrap();

    // 100ms after the first refresh, 200ms after the second.
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn network_errors_propagate() {
    let backend = Arc::new(MockBackend::new());
    backend.push_error(ApiError::Network("connection refused".into()));
    let refresher = Arc::new(FakeRefresher::with_token("access-0"));
    let transport = transport(&backend, &refresher, RetryPolicy::default());

    let err = transport.send(ApiRequest::get(transport.url("users/"))).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

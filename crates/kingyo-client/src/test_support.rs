//! Shared fixtures for the repository unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::Arc;

    use kingyo_auth::{MemoryTokenStore, RecordingNavigator, TokenManager};
    use kingyo_cache::QueryCache;
    use kingyo_http::{AuthTransport, MockBackend, RetryPolicy};
    use serde_json::{Value, json};

    use crate::service::Kingyo;

    pub const API_ROOT: &str = "http://localhost:8000/api/v1";

    /// A signed-in client over a scripted backend.
    pub fn test_client() -> (Kingyo, Arc<MockBackend>) {
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

    pub fn plan_json(id: u64, title: &str) -> Value {
        json!({
            "id": id, "title": title, "description": "", "status": "not_started",
            "created_at": "2025-03-01T09:00:00Z", "updated_at": "2025-03-01T09:00:00Z"
        })
    }

    pub fn case_json(plan: u64, id: u64, title: &str) -> Value {
        json!({
            "id": id, "plan": plan, "title": title, "description": "",
            "status": "design", "latest_result": "in_progress",
            "created_at": "2025-03-01T09:00:00Z", "updated_at": "2025-03-01T09:00:00Z",
            "executed_at": null
        })
    }

    pub fn step_json(case: u64, id: u64, order: u32) -> Value {
        json!({
            "id": id, "case": case, "order": order,
            "action": format!("action {order}"), "expected_result": format!("expected {order}")
        })
    }

    pub fn result_json(case: u64, id: u64, result: &str) -> Value {
        json!({
            "id": id, "case": case, "tester": 2, "result": result,
            "browser": "chrome", "os": "linux", "configuration": "chrome on linux",
            "comment": "", "executed_at": "2025-03-04T12:00:00Z", "updated_at": null
        })
    }

    pub fn result_step_json(result: u64, id: u64, order: u32, status: &str) -> Value {
        json!({
            "id": id, "result": result, "step": null, "order": order,
            "action": format!("action {order}"), "expected_result": format!("expected {order}"),
            "status": status, "comment": ""
        })
    }

    pub fn user_json(id: u64, username: &str) -> Value {
        json!({"id": id, "username": username, "email": format!("{username}@example.com")})
    }
}

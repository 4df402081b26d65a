//! Scripted in-memory backend for offline tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Serialize;

use crate::backend::HttpBackend;
use crate::error::ApiError;
use crate::request::{ApiRequest, ApiResponse};

/// Replays queued responses in order and records every request it receives.
///
/// When the queue is empty the backend answers with a network error, so a
/// test that issues an unexpected request fails loudly.
#[derive(Debug, Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ApiResponse) -> &Self {
        lock(&self.script).push_back(Ok(response));
        self
    }

    /// Queue a JSON response. Panics if `body` does not serialize.
    #[allow(clippy::missing_panics_doc)]
    pub fn push_json<T: Serialize>(&self, status: u16, body: &T) -> &Self {
        let body = serde_json::to_vec(body).unwrap_or_else(|e| panic!("mock body: {e}"));
        self.push(ApiResponse::new(status, body))
    }

    /// Queue an empty-bodied response.
    pub fn push_status(&self, status: u16) -> &Self {
        self.push(ApiResponse::new(status, Vec::new()))
    }

    pub fn push_bytes(&self, status: u16, body: Vec<u8>) -> &Self {
        self.push(ApiResponse::new(status, body))
    }

    pub fn push_error(&self, error: ApiError) -> &Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Method and URL of every request, e.g. `"GET http://x/api/v1/users/me/"`.
    #[must_use]
    pub fn request_lines(&self) -> Vec<String> {
        lock(&self.requests)
            .iter()
            .map(|r| format!("{} {}", r.method, r.url))
            .collect()
    }

    /// Responses still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

#[async_trait]
impl HttpBackend for MockBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let line = format!("{} {}", request.method, request.url);
        lock(&self.requests).push(request);
        lock(&self.script).pop_front().unwrap_or_else(|| {
            Err(ApiError::Network(
                format!("no scripted response for {line}").into(),
            ))
        })
    }
}

//! Bearer-token transport with a bounded refresh-and-retry loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kingyo_config::ApiConfig;
use serde::de::DeserializeOwned;

use crate::backend::HttpBackend;
use crate::error::ApiError;
use crate::request::{ApiRequest, ApiResponse, check_response};

const UNAUTHORIZED: u16 = 401;

/// Error returned by a failed [`TokenRefresher::refresh`]. The transport only
/// logs it.
pub type RefreshError = Box<dyn std::error::Error + Send + Sync>;

/// Supplies and renews the access token for [`AuthTransport`].
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// The token to send, if any.
    fn access_token(&self) -> Option<String>;

    /// Obtain a new access token. `rejected` is the token the server just
    /// refused, so an implementation can skip the call when another request
    /// already replaced it.
    ///
    /// An implementation that fails is responsible for its own recovery
    /// (dropping credentials, redirecting to login).
    async fn refresh(&self, rejected: Option<&str>) -> Result<(), RefreshError>;

    /// The server kept rejecting freshly refreshed tokens; end the session.
    fn session_expired(&self);
}

/// How many 401s are answered with a refresh, and how long to wait before
/// each retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_auth_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_auth_retries: 3,
            backoff: Duration::ZERO,
        }
    }
}

impl From<&ApiConfig> for RetryPolicy {
    fn from(config: &ApiConfig) -> Self {
        Self {
            max_auth_retries: config.max_auth_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// Sends requests with the current bearer token and recovers from 401s.
#[derive(Clone)]
pub struct AuthTransport {
    backend: Arc<dyn HttpBackend>,
    refresher: Arc<dyn TokenRefresher>,
    api_root: String,
    policy: RetryPolicy,
}

impl std::fmt::Debug for AuthTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTransport")
            .field("api_root", &self.api_root)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AuthTransport {
    #[must_use]
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        refresher: Arc<dyn TokenRefresher>,
        api_root: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            refresher,
            api_root: api_root.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    #[must_use]
    pub fn from_config(
        config: &ApiConfig,
        backend: Arc<dyn HttpBackend>,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Self {
        Self::new(backend, refresher, config.api_root(), RetryPolicy::from(config))
    }

    /// Absolute URL for a path relative to the API root, e.g.
    /// `url("testplans/3/")`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Send `request`, refreshing the token and resending on each 401 until
    /// `max_auth_retries` refreshes have been spent.
    ///
    /// # Errors
    ///
    /// - `ApiError::AuthExpired` when a 401 arrives with the budget spent (the
    ///   session is ended first) or when the refresh itself fails.
    /// - `ApiError::RequestFailed` for any other non-success status.
    /// - `ApiError::Network` when the backend cannot reach the server.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut retries: u32 = 0;
        loop {
            let attempt = retries + 1;
            let token = self.refresher.access_token();
            let outbound = match token.as_deref() {
                Some(token) => request.clone().bearer(token),
                None => request.clone(),
            };

            tracing::debug!(method = %request.method, url = %request.url, attempt, "sending request");
            let response = self.backend.execute(outbound).await?;

            if response.status != UNAUTHORIZED {
                return check_response(response);
            }

            if retries >= self.policy.max_auth_retries {
                tracing::warn!(url = %request.url, attempts = attempt, "retry budget exhausted on 401");
                self.refresher.session_expired();
                return Err(ApiError::AuthExpired { attempts: attempt });
            }

            tracing::warn!(url = %request.url, attempt, "401 received; refreshing access token");
            if let Err(error) = self.refresher.refresh(token.as_deref()).await {
                tracing::warn!(%error, "token refresh failed");
                return Err(ApiError::AuthExpired { attempts: attempt });
            }

            retries += 1;
            if !self.policy.backoff.is_zero() {
                tokio::time::sleep(self.policy.backoff * retries).await;
            }
        }
    }

    /// [`Self::send`] and decode the JSON body.
    ///
    /// # Errors
    ///
    /// As [`Self::send`], plus `ApiError::Decode` for an unexpected body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }
}

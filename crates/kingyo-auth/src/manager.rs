//! Sign-in, token refresh and sign-out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kingyo_cache::QueryCache;
use kingyo_config::KingyoConfig;
use kingyo_http::{
    ApiError, ApiRequest, ApiResponse, HttpBackend, RefreshError, TokenRefresher, check_response,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::AuthError;
use crate::expiry::decode_expiry;
use crate::navigator::{Navigator, Route};
use crate::token_store::{TokenKind, TokenStore, open_token_store};

const SIGN_IN_FAILED: &str = "Failed to sign in. Please check your credentials.";

/// Whether the client currently holds a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Snapshot of the stored credentials for status display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenStatus {
    pub session: SessionState,
    pub source: &'static str,
    pub has_refresh_token: bool,
    pub access_expires_at: Option<DateTime<Utc>>,
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshedToken {
    access: String,
    /// Present when the server rotates refresh tokens.
    #[serde(default)]
    refresh: Option<String>,
}

/// Resets the in-flight flag however sign-in ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns the session: stored tokens, session state and the recovery path when
/// the session cannot be renewed.
///
/// Token endpoint calls go straight to the [`HttpBackend`], never through the
/// retrying transport, so a rejected sign-in or refresh cannot trigger another
/// refresh.
pub struct TokenManager {
    backend: Arc<dyn HttpBackend>,
    api_root: String,
    store: Arc<dyn TokenStore>,
    cache: Arc<QueryCache>,
    navigator: Arc<dyn Navigator>,
    signing_in: AtomicBool,
    error_message: Mutex<Option<String>>,
    session: watch::Sender<SessionState>,
    refresh_gate: Option<tokio::sync::Mutex<()>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("api_root", &self.api_root)
            .field("store", &self.store.source())
            .field("session", &*self.session.borrow())
            .field("single_flight", &self.refresh_gate.is_some())
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    #[must_use]
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        api_root: impl Into<String>,
        store: Arc<dyn TokenStore>,
        cache: Arc<QueryCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let initial = if store.get(TokenKind::Access).is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        };
        let (session, _) = watch::channel(initial);
        Self {
            backend,
            api_root: api_root.into().trim_end_matches('/').to_string(),
            store,
            cache,
            navigator,
            signing_in: AtomicBool::new(false),
            error_message: Mutex::new(None),
            session,
            refresh_gate: None,
        }
    }

    /// Build from configuration, opening the configured token store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if the store cannot be opened.
    pub fn from_config(
        config: &KingyoConfig,
        backend: Arc<dyn HttpBackend>,
        cache: Arc<QueryCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AuthError> {
        let store = open_token_store(&config.auth)?;
        Ok(Self::new(backend, config.api.api_root(), store, cache, navigator)
            .single_flight(config.api.single_flight_refresh))
    }

    /// Serialize refreshes and skip one when the rejected token was already
    /// replaced by a concurrent refresh.
    #[must_use]
    pub fn single_flight(mut self, enabled: bool) -> Self {
        self.refresh_gate = enabled.then(|| tokio::sync::Mutex::new(()));
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_root)
    }

    async fn post_unauthenticated(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        tracing::debug!(url = %request.url, "sending token request");
        check_response(self.backend.execute(request).await?)
    }

    #[must_use]
    pub fn session(&self) -> SessionState {
        *self.session.borrow()
    }

    /// Observe session transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    /// `true` while a sign-in request is outstanding.
    #[must_use]
    pub fn is_signing_in(&self) -> bool {
        self.signing_in.load(Ordering::SeqCst)
    }

    /// User-visible message from the last failed sign-in, cleared when the
    /// next sign-in starts.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_error_message(&self, message: Option<String>) {
        *self
            .error_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Exchange credentials for an access/refresh pair and persist both.
    ///
    /// Nothing is persisted on failure.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SignInFailed` with the user-visible message, or
    /// `AuthError::TokenStore` if the tokens cannot be saved.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.signing_in.store(true, Ordering::SeqCst);
        let _in_flight = InFlight(&self.signing_in);
        self.set_error_message(None);

        let exchange = async {
            let request =
                ApiRequest::post(self.url("token/")).json(&Credentials { username, password })?;
            self.post_unauthenticated(request).await?.json::<TokenPair>()
        };

        let pair = match exchange.await {
            Ok(pair) => pair,
            Err(source) => {
                tracing::warn!(error = %source, username, "sign-in failed");
                self.set_error_message(Some(SIGN_IN_FAILED.to_string()));
                return Err(AuthError::SignInFailed {
                    message: SIGN_IN_FAILED.to_string(),
                    source,
                });
            }
        };

        if let Err(error) = self.persist(&pair) {
            tracing::warn!(%error, username, "sign-in succeeded but tokens were not saved");
            self.set_error_message(Some(error.to_string()));
            return Err(error);
        }
        self.session.send_replace(SessionState::Authenticated);
        tracing::info!(username, "signed in");
        Ok(())
    }

    /// Save both tokens, or neither.
    fn persist(&self, pair: &TokenPair) -> Result<(), AuthError> {
        self.store.set(TokenKind::Access, &pair.access)?;
        if let Err(error) = self.store.set(TokenKind::Refresh, &pair.refresh) {
            if let Err(cleanup) = self.store.remove(TokenKind::Access) {
                tracing::warn!(error = %cleanup, "failed to drop the unpaired access token");
            }
            return Err(error);
        }
        Ok(())
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Any failure ends the session: the cache is cleared, both tokens are
    /// removed and the host is sent to the login route.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoRefreshToken` when none is stored, otherwise
    /// `AuthError::RefreshFailed` or `AuthError::TokenStore`.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let result = self.try_refresh().await;
        if let Err(error) = &result {
            tracing::warn!(%error, "token refresh failed; signing out");
            self.sign_out();
        }
        result
    }

    async fn try_refresh(&self) -> Result<(), AuthError> {
        let refresh = self
            .store
            .get(TokenKind::Refresh)
            .ok_or(AuthError::NoRefreshToken)?;

        let exchange = async {
            let request = ApiRequest::post(self.url("token/refresh/")).json(&RefreshRequest {
                refresh: &refresh,
            })?;
            self.post_unauthenticated(request)
                .await?
                .json::<RefreshedToken>()
        };
        let token = exchange.await.map_err(AuthError::RefreshFailed)?;

        self.store.set(TokenKind::Access, &token.access)?;
        if let Some(rotated) = token.refresh {
            self.store.set(TokenKind::Refresh, &rotated)?;
        }
        self.session.send_replace(SessionState::Authenticated);
        tracing::debug!("access token refreshed");
        Ok(())
    }

    /// Clear the cache, drop both tokens and send the host to login. Makes no
    /// network call and cannot fail; store errors are logged.
    pub fn sign_out(&self) {
        self.cache.clear();
        for kind in TokenKind::ALL {
            if let Err(error) = self.store.remove(kind) {
                tracing::warn!(%error, token = kind.key(), "failed to remove stored token");
            }
        }
        self.session.send_replace(SessionState::Anonymous);
        self.navigator.navigate(Route::Login);
        tracing::info!("signed out");
    }

    /// Current stored credentials and their decoded expiry.
    #[must_use]
    pub fn status(&self) -> TokenStatus {
        let access = self.store.get(TokenKind::Access);
        let refresh = self.store.get(TokenKind::Refresh);
        TokenStatus {
            session: self.session(),
            source: self.store.source(),
            has_refresh_token: refresh.is_some(),
            access_expires_at: access.as_deref().and_then(|t| decode_expiry(t).ok()),
            refresh_expires_at: refresh.as_deref().and_then(|t| decode_expiry(t).ok()),
        }
    }
}

#[async_trait]
impl TokenRefresher for TokenManager {
    fn access_token(&self) -> Option<String> {
        self.store.get(TokenKind::Access)
    }

    async fn refresh(&self, rejected: Option<&str>) -> Result<(), RefreshError> {
        let Some(gate) = &self.refresh_gate else {
            return Self::refresh(self).await.map_err(Into::into);
        };

        let _held = gate.lock().await;
        let current = self.store.get(TokenKind::Access);
        if current.is_some() && current.as_deref() != rejected {
            tracing::debug!("access token already replaced by a concurrent refresh");
            return Ok(());
        }
        Self::refresh(self).await.map_err(Into::into)
    }

    fn session_expired(&self) {
        tracing::warn!("server keeps rejecting refreshed tokens; signing out");
        self.sign_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::make_jwt_with_exp;
    use crate::navigator::RecordingNavigator;
    use crate::token_store::MemoryTokenStore;
    use kingyo_http::MockBackend;

    fn manager(store: MemoryTokenStore) -> TokenManager {
        TokenManager::new(
            Arc::new(MockBackend::new()),
            "http://localhost:8000/api/v1",
            Arc::new(store),
            Arc::new(QueryCache::new()),
            Arc::new(RecordingNavigator::new()),
        )
    }

    #[test]
    fn initial_state_follows_stored_access_token() {
        assert_eq!(manager(MemoryTokenStore::new()).session(), SessionState::Anonymous);
        assert_eq!(
            manager(MemoryTokenStore::with_tokens("a", "r")).session(),
            SessionState::Authenticated
        );
    }

    #[test]
    fn status_decodes_expiry_when_possible() {
        let exp = Utc::now().timestamp() + 600;
        let manager = manager(MemoryTokenStore::with_tokens(&make_jwt_with_exp(exp), "opaque"));
        let status = manager.status();
        assert_eq!(status.source, "memory");
        assert!(status.has_refresh_token);
        assert_eq!(status.access_expires_at.map(|t| t.timestamp()), Some(exp));
        assert_eq!(status.refresh_expires_at, None);
    }
}

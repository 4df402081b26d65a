//! The `Kingyo` handle shared by every resource module.
//!
//! `Kingyo` wraps the authenticated transport, the injected query cache and
//! the session that owns the tokens. All resource operations are implemented
//! as `impl Kingyo` blocks under [`crate::repos`].

use std::sync::Arc;
use std::time::Duration;

use kingyo_auth::{Navigator, TokenManager};
use kingyo_cache::{QueryCache, QueryFilter, QueryKey};
use kingyo_config::KingyoConfig;
use kingyo_http::{ApiRequest, AuthTransport, HttpBackend, ReqwestBackend};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Cached access to the test-management API.
#[derive(Debug, Clone)]
pub struct Kingyo {
    transport: AuthTransport,
    cache: Arc<QueryCache>,
    session: Arc<TokenManager>,
}

impl Kingyo {
    /// Assemble from parts. `session` must clear the same `cache` on sign-out
    /// and should be the refresher behind `transport`.
    #[must_use]
    pub const fn new(
        transport: AuthTransport,
        cache: Arc<QueryCache>,
        session: Arc<TokenManager>,
    ) -> Self {
        Self {
            transport,
            cache,
            session,
        }
    }

    /// Wire a fresh cache, session and transport over `backend`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Auth` if the configured token store cannot be
    /// opened.
    pub fn from_config(
        config: &KingyoConfig,
        backend: Arc<dyn HttpBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let cache = Arc::new(QueryCache::new());
        let session = Arc::new(TokenManager::from_config(
            config,
            Arc::clone(&backend),
            Arc::clone(&cache),
            navigator,
        )?);
        let transport = AuthTransport::from_config(&config.api, backend, Arc::clone(&session) as _);
        Ok(Self::new(transport, cache, session))
    }

    /// [`Self::from_config`] over a real HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` if the HTTP client cannot be built, or
    /// `ClientError::Auth` if the token store cannot be opened.
    pub fn connect(config: &KingyoConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ClientError> {
        let backend = ReqwestBackend::new(Duration::from_secs(config.api.timeout_secs))?;
        Self::from_config(config, Arc::new(backend), navigator)
    }

    #[must_use]
    pub const fn transport(&self) -> &AuthTransport {
        &self.transport
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<TokenManager> {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        self.transport.url(path)
    }

    /// GET `path` through the cache under `key`.
    pub(crate) async fn cached_get<T>(&self, key: &QueryKey, path: &str) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.cache
            .fetch(key, || async {
                let value: T = self.transport.send_json(ApiRequest::get(self.url(path))).await?;
                Ok(value)
            })
            .await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::post(self.url(path)).json(body)?;
        Ok(self.transport.send_json(request).await?)
    }

    pub(crate) async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::patch(self.url(path)).json(body)?;
        Ok(self.transport.send_json(request).await?)
    }

    pub(crate) async fn delete_path(&self, path: &str) -> Result<(), ClientError> {
        self.transport.send(ApiRequest::delete(self.url(path))).await?;
        Ok(())
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.transport.send(ApiRequest::get(self.url(path))).await?;
        Ok(response.body)
    }

    /// Mark every entry under `scope` stale.
    pub(crate) fn invalidate_scope(&self, scope: QueryKey) {
        self.cache.invalidate(&QueryFilter::Prefix(scope));
    }

    pub(crate) fn invalidate_entry(&self, key: QueryKey) {
        self.cache.invalidate(&QueryFilter::Exact(key));
    }

    pub(crate) fn remove_scope(&self, scope: QueryKey) {
        self.cache.remove(&QueryFilter::Prefix(scope));
    }

    pub(crate) fn remove_entry(&self, key: QueryKey) {
        self.cache.remove(&QueryFilter::Exact(key));
    }
}

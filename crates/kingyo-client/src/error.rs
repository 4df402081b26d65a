//! Error type for resource queries, mutations and workflows.

use kingyo_auth::AuthError;
use kingyo_cache::CacheError;
use kingyo_core::CoreError;
use kingyo_http::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport rejected or failed the call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Cached data could not be encoded or decoded.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A payload failed validation before any request was issued.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// Building the session failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A pending attachment could not be matched to a created row.
    #[error("Correlation failed: {0}")]
    Correlation(String),
}

impl ClientError {
    /// HTTP status of a failed request, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the session ended while serving this call.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_auth_expired())
    }
}

//! Transport error types.

use thiserror::Error;

/// Failures surfaced by the transport.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-success status other than a retried 401.
    #[error("request failed ({status}): {body}")]
    RequestFailed { status: u16, body: String },

    /// The session could not be recovered: the 401 budget ran out or the
    /// token refresh itself failed.
    #[error("authentication expired after {attempts} attempt(s)")]
    AuthExpired { attempts: u32 },

    /// A response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(Box::new(error))
    }
}

impl ApiError {
    /// HTTP status for `RequestFailed`, `401` for `AuthExpired`.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::AuthExpired { .. } => Some(401),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired { .. })
    }
}

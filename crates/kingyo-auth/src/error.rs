use kingyo_http::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not signed in; run `kingyo auth login`")]
    NotAuthenticated,

    #[error("no refresh token")]
    NoRefreshToken,

    #[error("{message}")]
    SignInFailed {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("token refresh failed: {0}")]
    RefreshFailed(#[source] ApiError),

    #[error("token store error: {0}")]
    TokenStore(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

//! # kingyo-http
//!
//! Transport layer between the resource modules and the REST server.
//!
//! - [`HttpBackend`]: the raw request seam. [`ReqwestBackend`] talks to a real
//!   server; [`MockBackend`] replays scripted responses for tests.
//! - [`AuthTransport`]: attaches the bearer token and, on 401, asks its
//!   [`TokenRefresher`] for a new token and retries within a fixed budget.
//! - [`ApiRequest`] / [`ApiResponse`]: an owned, cloneable request model so a
//!   retry resends exactly the same method, headers and body.

mod backend;
mod error;
mod mock;
mod request;
mod transport;
mod url;

pub use backend::{HttpBackend, ReqwestBackend};
pub use error::ApiError;
pub use mock::MockBackend;
pub use request::{ApiRequest, ApiResponse, FormPart, RequestBody, check_response};
pub use transport::{AuthTransport, RefreshError, RetryPolicy, TokenRefresher};
pub use url::QueryString;

pub use reqwest::Method;

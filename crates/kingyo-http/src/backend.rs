//! The raw request seam and its `reqwest` implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::ApiError;
use crate::request::{ApiRequest, ApiResponse, FormPart, RequestBody};

/// Executes one request and returns the response whatever its status.
///
/// Status classification and retries belong to [`crate::AuthTransport`].
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// [`HttpBackend`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    http: reqwest::Client,
}

impl ReqwestBackend {
    /// Build a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kingyo/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    #[must_use]
    pub const fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn multipart_form(parts: Vec<FormPart>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, file } => {
                let mut body = Part::bytes(file.bytes).file_name(file.name);
                if let Some(mime) = file.mime {
                    body = body.mime_str(&mime)?;
                }
                form.part(name, body)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self.http.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };

        let response = builder.send().await?;
        ApiResponse::from_reqwest(response).await
    }
}

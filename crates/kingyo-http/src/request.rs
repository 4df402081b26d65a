//! Owned request and response model.

use kingyo_core::AttachmentFile;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// One field of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: AttachmentFile },
}

impl FormPart {
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl ToString) -> Self {
        Self::Text {
            name: name.into(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn file(name: impl Into<String>, file: AttachmentFile) -> Self {
        Self::File {
            name: name.into(),
            file,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// A request that can be replayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    #[must_use]
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("unserializable body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Set a header, replacing any existing value (names compare
    /// case-insensitively).
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Token from the `Authorization: Bearer` header, if present.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.header_value("Authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    #[must_use]
    pub const fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Read status and body from a `reqwest` response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the body cannot be read.
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self, ApiError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(Self { status, body })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` on malformed or mismatched JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Turn a non-success response into `ApiError::RequestFailed`.
///
/// # Errors
///
/// Returns `ApiError::RequestFailed` carrying the status and body text.
pub fn check_response(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(ApiError::RequestFailed {
        status: response.status,
        body: response.text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn from_reqwest_reads_status_and_body() {
        let response = ApiResponse::from_reqwest(mock_response(201, r#"{"id": 4}"#))
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(response.json::<serde_json::Value>().unwrap()["id"], 4);
    }

    #[tokio::test]
    async fn check_response_maps_failure() {
        let response = ApiResponse::from_reqwest(mock_response(400, "title: required"))
            .await
            .unwrap();
        let err = check_response(response).unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 400, ref body } if body == "title: required"));
    }

    #[test]
    fn check_response_passes_no_content() {
        assert!(check_response(ApiResponse::new(204, Vec::new())).is_ok());
    }

    #[test]
    fn bearer_replaces_existing_authorization() {
        let request = ApiRequest::get("http://x/api/v1/users/me/")
            .bearer("old")
            .header("authorization", "Bearer new");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.bearer_token(), Some("new"));
    }

    #[test]
    fn json_body_is_stored_as_value() {
        let request = ApiRequest::post("http://x/api/v1/testplans/")
            .json(&serde_json::json!({"title": "Smoke"}))
            .unwrap();
        assert_eq!(
            request.body,
            RequestBody::Json(serde_json::json!({"title": "Smoke"}))
        );
    }
}

//! REST API endpoint and transport configuration.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_auth_retries() -> u32 {
    3
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Server origin, e.g. `https://kingyo.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix of the versioned REST API.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many times a request rejected with 401 is retried after a token
    /// refresh before the rejection is surfaced.
    #[serde(default = "default_max_auth_retries")]
    pub max_auth_retries: u32,

    /// Delay before each 401 retry. `0` retries immediately.
    #[serde(default)]
    pub retry_backoff_ms: u64,

    /// Serialize token refreshes across concurrent requests and skip a refresh
    /// when another request already replaced the rejected token.
    #[serde(default)]
    pub single_flight_refresh: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_secs: default_timeout_secs(),
            max_auth_retries: default_max_auth_retries(),
            retry_backoff_ms: 0,
            single_flight_refresh: false,
        }
    }
}

impl ApiConfig {
    /// Check that `base_url` is an absolute http(s) URL with a host.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let rest = self
            .base_url
            .strip_prefix("https://")
            .or_else(|| self.base_url.strip_prefix("http://"));
        rest.is_some_and(|r| !r.trim_start_matches('/').is_empty())
    }

    /// Root of the versioned API without a trailing slash,
    /// e.g. `http://localhost:8000/api/v1`.
    #[must_use]
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        }
    }
}

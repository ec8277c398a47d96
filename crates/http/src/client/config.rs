//! Client configuration

use serde::{Deserialize, Serialize};

/// Settings the [`ApiClient`](super::ApiClient) is constructed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every path is appended to, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// Send cookies/credentials on cross-origin requests
    pub with_credentials: bool,
    /// Value of the `X-Requested-With` default header; `None` omits it
    pub requested_with: Option<String>,
    /// Request timeout in seconds (ignored on wasm)
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            with_credentials: true,
            requested_with: Some("XMLHttpRequest".to_string()),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

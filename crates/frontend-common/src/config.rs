//! Frontend configuration

use catalog_http::ClientConfig;
use serde::{Deserialize, Serialize};

/// Settings shared by every catalog frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// HTTP client settings
    pub api: ClientConfig,
    /// Session storage key the bearer token is persisted under
    pub token_key: String,
    /// Route unauthenticated users are sent to
    pub login_route: String,
}

impl FrontendConfig {
    pub const DEFAULT_TOKEN_KEY: &'static str = "token";
    pub const DEFAULT_LOGIN_ROUTE: &'static str = "/login";
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api: ClientConfig::default(),
            token_key: Self::DEFAULT_TOKEN_KEY.to_string(),
            login_route: Self::DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }
}

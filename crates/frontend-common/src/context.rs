//! Session context: the one place the client, store and services are wired

use crate::auth::guard::RouteGuard;
use crate::auth::interceptors::{BearerToken, SessionExpiry};
use crate::auth::session::SessionStore;
use crate::config::FrontendConfig;
use crate::navigation::Navigator;
use crate::services::AuthService;
use crate::storage::{SessionStorage, TokenSlot};
use catalog_http::{ApiClient, ClientError};
use std::sync::Arc;
use tracing::debug;

/// Built once at startup and cloned into every consumer.
///
/// The client carries two middleware stages: [`BearerToken`] on requests and
/// [`SessionExpiry`] on responses.
#[derive(Clone)]
pub struct SessionContext {
    client: ApiClient,
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    config: Arc<FrontendConfig>,
}

impl SessionContext {
    pub fn new(
        config: FrontendConfig,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let slot = TokenSlot::new(storage, config.token_key.clone());
        let client = ApiClient::from_config(&config.api)?;
        let store = Arc::new(SessionStore::restore(
            slot.clone(),
            client.default_headers().clone(),
        ));

        let client = client
            .with_request_middleware(Arc::new(BearerToken::new(slot)))
            .with_response_middleware(Arc::new(SessionExpiry::new(
                store.clone(),
                navigator.clone(),
                config.login_route.clone(),
            )));

        debug!(base_url = client.base_url(), "Session context ready");

        Ok(Self {
            client,
            store,
            navigator,
            config: Arc::new(config),
        })
    }

    /// Context backed by `window.sessionStorage` and `window.location`
    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: FrontendConfig) -> Result<Self, ClientError> {
        Self::new(
            config,
            Arc::new(crate::storage::BrowserSessionStorage),
            Arc::new(crate::navigation::LocationNavigator),
        )
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.client.clone(),
            self.store.clone(),
            self.navigator.clone(),
            self.config.login_route.clone(),
        )
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.store.clone(), self.config.login_route.clone())
    }
}

//! Authentication service

use crate::auth::session::SessionStore;
use crate::error::AuthError;
use crate::navigation::Navigator;
use catalog_core::{LoginForm, RegisterForm, TokenResponse, User, Validate};
use catalog_http::{ApiClient, ClientError};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of telling the backend about a logout. Local teardown happens
/// either way; a failed notification is reported, never raised.
#[derive(Debug)]
pub enum LogoutOutcome {
    Notified,
    NotificationFailed(ClientError),
}

impl LogoutOutcome {
    pub fn backend_notified(&self) -> bool {
        matches!(self, Self::Notified)
    }
}

/// Login, registration, profile and logout on top of the session store
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl AuthService {
    pub fn new(
        client: ApiClient,
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            navigator,
            login_route: login_route.into(),
        }
    }

    /// Log in and load the profile of the account
    pub async fn login(&self, form: &LoginForm) -> Result<User, AuthError> {
        form.validate().map_err(AuthError::InvalidForm)?;
        let response = self.client.login(form).await?;
        info!(email = %form.email, "Logged in");
        self.start_session(response).await
    }

    /// Create an account and log straight into it
    pub async fn register(&self, form: &RegisterForm) -> Result<User, AuthError> {
        form.validate().map_err(AuthError::InvalidForm)?;
        let response = self.client.register(form).await?;
        info!(email = %form.email, "Registered new account");
        self.start_session(response).await
    }

    /// Load the profile of whoever the attached token belongs to
    pub async fn fetch_user(&self) -> Result<User, AuthError> {
        let user = self.client.me().await?;
        self.store.set_user(user.clone());
        Ok(user)
    }

    /// End the session. The backend call is best effort; storage, default
    /// header and in-memory state are cleared and the user is sent to the
    /// login route regardless of its result.
    pub async fn logout(&self) -> LogoutOutcome {
        let outcome = match self.client.logout().await {
            Ok(()) => LogoutOutcome::Notified,
            Err(e) => {
                warn!("Logout notification failed, clearing session anyway: {e}");
                LogoutOutcome::NotificationFailed(e)
            }
        };

        self.store.clear_session();
        self.navigator.navigate(&self.login_route);
        info!("Logged out");
        outcome
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    async fn start_session(&self, response: TokenResponse) -> Result<User, AuthError> {
        self.store.set_token(&response.access_token)?;
        self.fetch_user().await
    }
}

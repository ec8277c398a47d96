//! Auth middleware installed on the session's API client

use super::session::SessionStore;
use crate::navigation::Navigator;
use crate::storage::TokenSlot;
use catalog_http::client::headers::bearer_value;
use catalog_http::reqwest::header::AUTHORIZATION;
use catalog_http::reqwest::{Request, Response};
use catalog_http::{ClientError, RequestMiddleware, ResponseMiddleware};
use std::sync::Arc;
use tracing::{debug, warn};

/// Attaches `Authorization: Bearer <token>` from session storage to every
/// request. With no usable stored token any default `Authorization` header
/// is removed, so a token cleared elsewhere is never sent.
#[derive(Debug, Clone)]
pub struct BearerToken {
    slot: TokenSlot,
}

impl BearerToken {
    pub fn new(slot: TokenSlot) -> Self {
        Self { slot }
    }
}

impl RequestMiddleware for BearerToken {
    fn on_request(&self, mut request: Request) -> Result<Request, ClientError> {
        let value = self.slot.read().and_then(|token| match bearer_value(&token) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = self.slot.key(), "Stored token is not a valid header, not sending it: {e}");
                None
            }
        });

        match value {
            Some(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            None => {
                if request.headers_mut().remove(AUTHORIZATION).is_some() {
                    debug!(url = %request.url(), "Dropped Authorization header without stored token");
                }
            }
        }
        Ok(request)
    }
}

/// On a 401 response: tear the session down, send the user to the login
/// route, and hand the same error back to the caller.
pub struct SessionExpiry {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
}

impl SessionExpiry {
    pub fn new(
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            login_route: login_route.into(),
        }
    }
}

impl ResponseMiddleware for SessionExpiry {
    fn on_response(
        &self,
        outcome: Result<Response, ClientError>,
    ) -> Result<Response, ClientError> {
        if let Err(error) = &outcome {
            if error.is_auth_expired() {
                warn!("Session rejected by server, returning to {}", self.login_route);
                self.store.clear_session();
                self.navigator.navigate(&self.login_route);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::storage::{MemorySessionStorage, SessionStorage};
    use catalog_http::DefaultHeaders;
    use catalog_http::reqwest::Method;
    use catalog_http::reqwest::header::HeaderValue;

    fn slot(storage: &MemorySessionStorage) -> TokenSlot {
        TokenSlot::new(Arc::new(storage.clone()), "token")
    }

    fn request_with_stale_header() -> Request {
        let mut request = Request::new(Method::GET, "http://localhost/api/me".parse().unwrap());
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
        request
    }

    #[test]
    fn test_stored_token_wins_over_default_header() {
        let storage = MemorySessionStorage::new();
        storage.set_item("token", "fresh").unwrap();

        let request = BearerToken::new(slot(&storage))
            .on_request(request_with_stale_header())
            .unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer fresh");
    }

    #[test]
    fn test_missing_token_strips_header() {
        let storage = MemorySessionStorage::new();

        let request = BearerToken::new(slot(&storage))
            .on_request(request_with_stale_header())
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_unusable_stored_token_is_not_sent() {
        let storage = MemorySessionStorage::new();
        storage.set_item("token", "line\nbreak").unwrap();

        let request = BearerToken::new(slot(&storage))
            .on_request(request_with_stale_header())
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_non_auth_errors_pass_through_untouched() {
        let storage = MemorySessionStorage::new();
        let store = Arc::new(SessionStore::restore(slot(&storage), DefaultHeaders::default()));
        store.set_token("T1").unwrap();
        let navigator = HistoryNavigator::new();

        let expiry = SessionExpiry::new(store.clone(), Arc::new(navigator.clone()), "/login");
        let outcome = expiry.on_response(Err(ClientError::Forbidden("no".to_string())));

        assert!(matches!(outcome, Err(ClientError::Forbidden(_))));
        assert_eq!(store.token().as_deref(), Some("T1"));
        assert!(navigator.history().is_empty());
    }

    #[test]
    fn test_unauthorized_tears_down_once() {
        let storage = MemorySessionStorage::new();
        let store = Arc::new(SessionStore::restore(slot(&storage), DefaultHeaders::default()));
        store.set_token("T1").unwrap();
        let navigator = HistoryNavigator::new();

        let expiry = SessionExpiry::new(store.clone(), Arc::new(navigator.clone()), "/login");
        let outcome = expiry.on_response(Err(ClientError::AuthenticationFailed(
            "Unauthenticated.".to_string(),
        )));

        assert!(matches!(outcome, Err(ClientError::AuthenticationFailed(_))));
        assert!(store.token().is_none());
        assert!(storage.get_item("token").unwrap().is_none());
        assert_eq!(navigator.history(), vec!["/login"]);
    }
}

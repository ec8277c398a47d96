//! Session store: the current token and user profile
//!
//! The persisted token in session storage is the authoritative source. The
//! in-memory state and the client's default `Authorization` header are
//! mirrors, updated together by [`SessionStore::set_token`] and
//! [`SessionStore::clear_session`].

use crate::error::AuthError;
use crate::storage::TokenSlot;
use catalog_core::User;
use catalog_http::DefaultHeaders;
use catalog_http::client::headers::bearer_value;
use catalog_http::reqwest::header::AUTHORIZATION;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Snapshot of the session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Owner of the session state; consumers observe it through [`Self::subscribe`]
#[derive(Debug)]
pub struct SessionStore {
    slot: TokenSlot,
    headers: DefaultHeaders,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Restore the session left in storage, e.g. after a page reload.
    ///
    /// The user profile always starts empty and has to be fetched again.
    pub fn restore(slot: TokenSlot, headers: DefaultHeaders) -> Self {
        let token = slot.read();
        if let Some(token) = &token {
            match bearer_value(token) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => warn!("Ignoring unusable stored token: {e}"),
            }
            debug!(key = slot.key(), "Restored token from session storage");
        }

        let (state, _) = watch::channel(SessionState { token, user: None });
        Self {
            slot,
            headers,
            state,
        }
    }

    /// Store a new token in memory and storage and use it as the default
    /// `Authorization` header
    pub fn set_token(&self, token: &str) -> Result<(), AuthError> {
        let value = bearer_value(token)?;
        self.slot.write(token)?;
        self.headers.insert(AUTHORIZATION, value);
        self.state.send_modify(|state| state.token = Some(token.to_string()));
        info!("Session token stored");
        Ok(())
    }

    /// Record the fetched profile. Ignored when no token is held, so a
    /// profile never outlives its session.
    pub fn set_user(&self, user: User) {
        let stored = self.state.send_if_modified(|state| {
            if state.token.is_some() {
                state.user = Some(user);
                true
            } else {
                false
            }
        });
        if !stored {
            warn!("Discarding user profile fetched without a session token");
        }
    }

    /// Remove the token from storage and memory, drop the default
    /// `Authorization` header and forget the user. Safe to call repeatedly.
    pub fn clear_session(&self) {
        if let Err(e) = self.slot.clear() {
            warn!(key = self.slot.key(), "Failed to remove token from session storage: {e}");
        }
        self.headers.clear_bearer();
        self.state.send_modify(|state| {
            state.token = None;
            state.user = None;
        });
        info!("Session cleared");
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// In-memory token
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Whether a token is persisted in session storage
    pub fn has_token(&self) -> bool {
        self.slot.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySessionStorage, SessionStorage};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn user() -> User {
        User {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: None,
            phone: None,
            created_at: None,
            updated_at: None,
            extra: HashMap::new(),
        }
    }

    fn store_on(storage: &MemorySessionStorage) -> (SessionStore, DefaultHeaders) {
        let headers = DefaultHeaders::default();
        let slot = TokenSlot::new(Arc::new(storage.clone()), "token");
        (SessionStore::restore(slot, headers.clone()), headers)
    }

    #[test]
    fn test_set_token_updates_every_mirror() {
        let storage = MemorySessionStorage::new();
        let (store, headers) = store_on(&storage);

        store.set_token("T1").unwrap();

        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("T1"));
        assert_eq!(store.token().as_deref(), Some("T1"));
        assert_eq!(headers.authorization().as_deref(), Some("Bearer T1"));
        assert!(store.has_token());
    }

    #[test]
    fn test_restore_after_reload_keeps_token_but_not_user() {
        let storage = MemorySessionStorage::new();
        for token in ["T1", "a.b.c", "1|xyzLaravelSanctum"] {
            let (store, _) = store_on(&storage);
            store.set_token(token).unwrap();
            store.set_user(user());

            let (reloaded, headers) = store_on(&storage);
            assert_eq!(reloaded.token().as_deref(), Some(token));
            assert!(reloaded.user().is_none());
            assert_eq!(headers.authorization(), Some(format!("Bearer {token}")));
        }
    }

    #[test]
    fn test_unusable_token_is_rejected_before_storing() {
        let storage = MemorySessionStorage::new();
        let (store, _) = store_on(&storage);

        assert!(store.set_token("line\nbreak").is_err());
        assert!(storage.get_item("token").unwrap().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_clear_session_is_idempotent() {
        let storage = MemorySessionStorage::new();
        let (store, headers) = store_on(&storage);
        store.set_token("T1").unwrap();
        store.set_user(user());

        store.clear_session();
        store.clear_session();

        assert_eq!(store.state(), SessionState::default());
        assert!(storage.get_item("token").unwrap().is_none());
        assert!(headers.authorization().is_none());
    }

    #[test]
    fn test_user_requires_token() {
        let storage = MemorySessionStorage::new();
        let (store, _) = store_on(&storage);

        store.set_user(user());
        assert!(store.user().is_none());

        store.set_token("T1").unwrap();
        store.set_user(user());
        assert_eq!(store.user().map(|u| u.id), Some(1));
    }

    #[test]
    fn test_subscribers_see_changes() {
        let storage = MemorySessionStorage::new();
        let (store, _) = store_on(&storage);
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set_token("T1").unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        store.clear_session();
        assert!(!rx.borrow_and_update().is_authenticated());
    }
}

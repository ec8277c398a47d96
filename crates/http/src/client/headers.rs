//! Process-wide default headers shared by every request of a client

use super::error::ClientError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use std::sync::{Arc, PoisonError, RwLock};

/// Mutable header map applied to every outgoing request before middleware runs.
///
/// Clones share the same map, so a handle given to the session layer can set
/// or remove the default `Authorization` header seen by the client.
#[derive(Clone, Debug, Default)]
pub struct DefaultHeaders {
    inner: Arc<RwLock<HeaderMap>>,
}

impl DefaultHeaders {
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(headers)),
        }
    }

    /// Copy of the current headers
    pub fn snapshot(&self) -> HeaderMap {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn insert(&self, name: HeaderName, value: HeaderValue) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, value);
    }

    pub fn remove(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Set `Authorization: Bearer <token>` for all subsequent requests
    pub fn set_bearer(&self, token: &str) -> Result<(), ClientError> {
        self.insert(AUTHORIZATION, bearer_value(token)?);
        Ok(())
    }

    pub fn clear_bearer(&self) {
        self.remove(&AUTHORIZATION);
    }

    /// Current default `Authorization` value as text
    pub fn authorization(&self) -> Option<String> {
        self.get(&AUTHORIZATION)
            .and_then(|v| v.to_str().ok().map(str::to_string))
    }
}

/// Build a sensitive `Bearer <token>` header value
pub fn bearer_value(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| ClientError::Configuration(format!("token is not a valid header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

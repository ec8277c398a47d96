//! Route guard for protected pages

use super::session::SessionStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-route metadata read by the guard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(default)]
    pub requires_auth: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self {
        requires_auth: false,
    };
    pub const PROTECTED: Self = Self {
        requires_auth: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Redirect to `login_route` only when the route needs auth and no token is held
pub fn decide(meta: RouteMeta, token_present: bool, login_route: &str) -> GuardDecision {
    if meta.requires_auth && !token_present {
        GuardDecision::Redirect(login_route.to_string())
    } else {
        GuardDecision::Proceed
    }
}

/// Guard bound to a session store
#[derive(Clone)]
pub struct RouteGuard {
    store: Arc<SessionStore>,
    login_route: String,
}

impl RouteGuard {
    pub fn new(store: Arc<SessionStore>, login_route: impl Into<String>) -> Self {
        Self {
            store,
            login_route: login_route.into(),
        }
    }

    pub fn check(&self, meta: RouteMeta) -> GuardDecision {
        decide(meta, self.store.has_token(), &self.login_route)
    }
}

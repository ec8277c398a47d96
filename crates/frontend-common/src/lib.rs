//! Session handling shared by catalog frontends

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod navigation;
pub mod services;
pub mod storage;

pub use auth::{GuardDecision, RouteGuard, RouteMeta, SessionState, SessionStore};
pub use config::FrontendConfig;
pub use context::SessionContext;
pub use error::AuthError;
pub use navigation::{HistoryNavigator, Navigator};
pub use services::{AuthService, LogoutOutcome};
pub use storage::{MemorySessionStorage, SessionStorage, StorageError, TokenSlot};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileSessionStorage;

/// Route `tracing` events to the browser console
#[cfg(target_arch = "wasm32")]
pub fn init_browser_logging() {
    wasm_logger::init(wasm_logger::Config::default());
}

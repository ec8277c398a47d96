//! Authentication module

pub mod guard;
pub mod interceptors;
pub mod session;

// Re-export commonly used items
pub use guard::{GuardDecision, RouteGuard, RouteMeta};
pub use interceptors::{BearerToken, SessionExpiry};
pub use session::{SessionState, SessionStore};

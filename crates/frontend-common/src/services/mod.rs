pub mod auth;

pub use auth::{AuthService, LogoutOutcome};

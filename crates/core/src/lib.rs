//! Catalog core types and form validation

pub mod forms;
pub mod types;
pub mod validation;

pub use forms::{CategoryForm, LoginForm, RegisterForm};
pub use types::{Category, Product, TokenResponse, User};
pub use validation::{FieldErrors, Validate};

//! Catalog HTTP client
//!
//! A configured [`ApiClient`] issues every request through an ordered chain
//! of request and response middleware, so cross-cutting behavior such as
//! bearer token injection or 401 handling is an explicit, testable stage.

pub mod client;

pub use reqwest;

pub use client::config::ClientConfig;
pub use client::error::ClientError;
pub use client::headers::DefaultHeaders;
pub use client::middleware::{RequestMiddleware, ResponseMiddleware};
pub use client::{ApiClient, ApiClientBuilder};

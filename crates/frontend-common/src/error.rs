//! Auth error types

use crate::storage::StorageError;
use catalog_core::FieldErrors;
use catalog_http::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The form failed schema validation; nothing was sent
    #[error("Invalid form: {0}")]
    InvalidForm(FieldErrors),

    /// The request failed; propagated unmodified
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The token could not be persisted
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_auth_expired())
    }

    /// Field messages from local validation or from a 422 response
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidForm(errors) => Some(errors),
            Self::Client(e) => e.field_errors(),
            Self::Storage(_) => None,
        }
    }
}

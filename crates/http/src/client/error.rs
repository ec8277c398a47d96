//! Client error types

use catalog_core::FieldErrors;
use serde::Deserialize;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be completed
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server rejected the credentials or token (401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Server rejected the payload with field errors (422)
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Server returned another error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Error body shape used by the backend, e.g.
/// `{"message": "The email has already been taken.", "errors": {"email": [...]}}`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: FieldErrors,
}

impl ClientError {
    /// Create error from HTTP status code and raw response body
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });

        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            422 => Self::Validation {
                message,
                errors: parsed.map(|b| b.errors).unwrap_or_default(),
            },
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// True when the session is no longer accepted and the user must log in again
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }

    /// Field-level messages from a 422 response
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// HTTP status associated with the error, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Validation { .. } => Some(422),
            Self::BadRequest(_) => Some(400),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }
}

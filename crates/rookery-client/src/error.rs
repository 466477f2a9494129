//! Client error types.

use thiserror::Error;

/// Errors surfaced by an [`InteractionClient`](crate::InteractionClient).
///
/// Cloneable so failures can travel inside application events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Request could not complete (connection refused, reset, DNS).
    #[error("network failure: {0}")]
    Network(String),

    /// Viewer is not authenticated or lacks permission.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Server rejected the request body.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Target entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Response body did not match the wire model.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized(message),
            400 | 422 => Self::Validation(message),
            404 => Self::NotFound(message),
            _ => Self::Server { status, message },
        }
    }

    /// Failure caused by the viewer's permissions.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

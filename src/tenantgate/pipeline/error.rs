use axum::http::StatusCode;
use thiserror::Error;

/// Failure raised by a hook or a core operation, surfaced to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Startup errors while freezing the hook table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookLoadError {
    #[error("no hook entry loaded for endpoint {0}")]
    MissingHooks(String),
    #[error("hooks registered for unknown endpoint {0}")]
    UnknownEndpoint(String),
}

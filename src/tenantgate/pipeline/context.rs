//! Per-request state threaded through every pipeline stage.

use crate::tenantgate::model::User;
use axum::http::{HeaderMap, Method, StatusCode};
use serde::Serialize;
use std::net::IpAddr;

use super::error::ApiError;

pub const ANONYMOUS: &str = "anonymous";

/// Values accumulated by the core operation for the finalizer.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    pub message: String,
    pub status_code: Option<StatusCode>,
    pub content_type: Option<String>,
    /// Set once the status and content type have been applied to the response.
    pub formatted: bool,
}

/// Outgoing response as seen by hooks and the finalizer.
#[derive(Debug, Clone, Default)]
pub struct ResponseState {
    pub status: Option<StatusCode>,
    pub content_type: Option<String>,
    pub sent: bool,
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Original URL, query string included.
    pub path: String,
    pub headers: HeaderMap,
    pub remote_addr: Option<IpAddr>,
    pub user: Option<User>,
    pub locals: Locals,
    pub response: ResponseState,
}

impl RequestContext {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: HeaderMap::new(),
            remote_addr: None,
            user: None,
            locals: Locals::default(),
            response: ResponseState::default(),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_remote_addr(mut self, remote_addr: Option<IpAddr>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.user = user;
        self
    }

    /// Name of the acting identity for logs.
    #[must_use]
    pub fn acting_identity(&self) -> &str {
        self.user.as_ref().map_or(ANONYMOUS, User::log_name)
    }

    /// The resolved user, or `401 Unauthorized` for anonymous requests.
    ///
    /// # Errors
    /// Returns `ApiError` with `UNAUTHORIZED` when no user was resolved
    pub fn require_user(&self) -> Result<&User, ApiError> {
        self.user
            .as_ref()
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }

    /// Serialize `payload` into `locals.message` as the JSON response body.
    ///
    /// # Errors
    /// Returns `ApiError` with `INTERNAL_SERVER_ERROR` if serialization fails
    pub fn set_json<T: Serialize>(&mut self, payload: &T) -> Result<(), ApiError> {
        self.locals.message = serde_json::to_string(payload).map_err(|e| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to serialize response: {e}"),
            )
        })?;
        Ok(())
    }
}

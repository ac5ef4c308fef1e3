//! Acting identity for a request.

use super::{directory::Directory, model::User};
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::debug;

/// Header set by the authenticating reverse proxy.
pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// Resolves the user behind a request. `None` means anonymous.
pub trait IdentitySource: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<User>;
}

/// Never resolves anyone.
#[derive(Clone, Debug)]
pub struct AnonymousIdentity;

impl IdentitySource for AnonymousIdentity {
    fn resolve(&self, _headers: &HeaderMap) -> Option<User> {
        None
    }
}

/// Trusts [`REMOTE_USER_HEADER`] and looks the username up in the directory.
///
/// The header is not authenticated here; deploy behind a proxy that sets it.
#[derive(Clone, Debug)]
pub struct HeaderIdentity {
    directory: Arc<Directory>,
}

impl HeaderIdentity {
    #[must_use]
    pub fn new(directory: Arc<Directory>) -> Self {
        Self { directory }
    }
}

impl IdentitySource for HeaderIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Option<User> {
        let username = headers
            .get(REMOTE_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())?;

        let user = self.directory.user(username).cloned();
        if user.is_none() {
            debug!("Unknown remote user: {username}");
        }
        user
    }
}

//! Project access decisions.
//!
//! Rules for a non-admin user, evaluated in order with the first match winning:
//! 1. `admin` grant: visible, archived or not.
//! 2. `write`/`read` grant: visible while the project is not archived.
//! 3. no grant: visible when the project is `internal` and not archived.
//!
//! Site admins see everything.

use super::model::{PermissionLevel, Project, User, Visibility};

/// Effective permission of `user` on `project`.
///
/// Site admins report `Admin`; otherwise the explicit grant, or `None`.
#[must_use]
pub fn effective_level(user: &User, project: &Project) -> PermissionLevel {
    if user.admin {
        return PermissionLevel::Admin;
    }

    project
        .grant_for(&user.username)
        .unwrap_or(PermissionLevel::None)
}

/// Whether `project` is exposed to `user` in listings and lookups.
#[must_use]
pub fn is_visible(user: &User, project: &Project) -> bool {
    if user.admin {
        return true;
    }

    match project
        .grant_for(&user.username)
        .unwrap_or(PermissionLevel::None)
    {
        PermissionLevel::Admin => true,
        PermissionLevel::Write | PermissionLevel::Read => !project.archived,
        PermissionLevel::None => project.visibility == Visibility::Internal && !project.archived,
    }
}

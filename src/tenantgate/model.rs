//! In-memory records for users, organizations and projects.
//!
//! Records arrive already loaded; nothing here talks to storage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Site-wide superuser flag.
    #[serde(default)]
    pub admin: bool,
}

impl User {
    #[must_use]
    pub fn new(id: &str, username: &str, admin: bool) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            admin,
        }
    }

    /// Name written to route and audit logs: the id when present, else the username.
    #[must_use]
    pub fn log_name(&self) -> &str {
        if self.id.is_empty() {
            &self.username
        } else {
            &self.id
        }
    }
}

/// Per-project permission level granted to a username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Read,
    Write,
    Admin,
    /// Reported when no grant applies; unknown level strings also land here.
    #[serde(other)]
    None,
}

impl PermissionLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Internal,
    #[default]
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub visibility: Visibility,
    /// Username to grant. A record without a map has no explicit grants.
    #[serde(default)]
    pub permissions: HashMap<String, PermissionLevel>,
}

impl Project {
    #[must_use]
    pub fn new(id: &str, name: &str, visibility: Visibility) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            archived: false,
            visibility,
            permissions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    #[must_use]
    pub fn grant(mut self, username: &str, level: PermissionLevel) -> Self {
        self.permissions.insert(username.to_string(), level);
        self
    }

    #[must_use]
    pub fn grant_for(&self, username: &str) -> Option<PermissionLevel> {
        self.permissions.get(username).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    /// Display order.
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Organization {
    #[must_use]
    pub fn new(id: &str, name: &str, projects: Vec<Project>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            projects,
        }
    }

    #[must_use]
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == project_id)
    }
}

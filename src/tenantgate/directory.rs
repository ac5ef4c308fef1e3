//! Already-loaded users and organizations served by the API.

use super::model::{Organization, User};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Directory {
    users: Vec<User>,
    orgs: Vec<Organization>,
}

impl Directory {
    #[must_use]
    pub fn new(users: Vec<User>, orgs: Vec<Organization>) -> Self {
        Self { users, orgs }
    }

    /// Load a JSON seed of the form `{ "users": [...], "orgs": [...] }`.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read directory seed {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid directory seed {}", path.display()))
    }

    #[must_use]
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn org(&self, org_id: &str) -> Option<&Organization> {
        self.orgs.iter().find(|org| org.id == org_id)
    }

    #[must_use]
    pub fn orgs(&self) -> &[Organization] {
        &self.orgs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seed_lookups() {
        let directory: Directory = serde_json::from_value(json!({
            "users": [
                { "id": "u1", "username": "alice" },
                { "id": "u2", "username": "root", "admin": true }
            ],
            "orgs": [
                { "id": "acme", "name": "Acme", "projects": [
                    { "id": "alpha", "name": "Alpha", "visibility": "internal" }
                ] }
            ]
        }))
        .unwrap();

        assert!(directory.user("root").is_some_and(|user| user.admin));
        assert!(directory.user("carol").is_none());
        assert_eq!(directory.org("acme").map(|org| org.projects.len()), Some(1));
        assert_eq!(directory.users().len(), 2);
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("{}.json", ulid::Ulid::new()));
        assert!(Directory::from_file(&path).is_err());
    }
}

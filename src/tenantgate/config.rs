//! Service configuration loaded from a JSON file.
//!
//! Every key is optional; a missing file section falls back to its default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const fn enabled() -> bool {
    true
}

fn default_security_file() -> String {
    "security.log".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api: ApiConfig,
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(rename = "userAPI")]
    pub user_api: UserApiConfig,
}

/// Switches for the user API, keyed by lower-cased HTTP method.
#[derive(Debug, Clone, Deserialize)]
pub struct UserApiConfig {
    #[serde(default = "enabled")]
    pub get: bool,
    #[serde(default = "enabled")]
    pub post: bool,
    #[serde(default = "enabled")]
    pub put: bool,
    #[serde(default = "enabled")]
    pub patch: bool,
    #[serde(default = "enabled")]
    pub delete: bool,
    #[serde(default = "enabled", rename = "patchPassword")]
    pub patch_password: bool,
}

impl Default for UserApiConfig {
    fn default() -> Self {
        Self {
            get: true,
            post: true,
            put: true,
            patch: true,
            delete: true,
            patch_password: true,
        }
    }
}

impl UserApiConfig {
    /// Whether the user API accepts `method`. Methods without a switch are allowed.
    #[must_use]
    pub fn allows(&self, method: &str) -> bool {
        match method.to_lowercase().as_str() {
            "get" => self.get,
            "post" => self.post,
            "put" => self.put,
            "patch" => self.patch,
            "delete" => self.delete,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Security log file name, relative to the logs directory.
    pub security_file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            security_file: default_security_file(),
        }
    }
}

impl Config {
    /// Parse a configuration document.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON or has wrongly typed keys
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid configuration document")
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert!(config.server.api.user_api.allows("GET"));
        assert!(config.server.api.user_api.patch_password);
        assert!(!config.server.plugins.enabled);
        assert_eq!(config.log.security_file, "security.log");
    }

    #[test]
    fn method_switches_are_case_insensitive() {
        let config = Config::from_json(
            r#"{ "server": { "api": { "userAPI": { "patch": false, "patchPassword": false } } } }"#,
        )
        .unwrap();
        let user_api = &config.server.api.user_api;
        assert!(!user_api.allows("PATCH"));
        assert!(!user_api.allows("patch"));
        assert!(user_api.allows("DELETE"));
        assert!(user_api.allows("OPTIONS"));
        assert!(!user_api.patch_password);
    }

    #[test]
    fn nested_sections_parse() {
        let config = Config::from_json(
            r#"{ "server": { "plugins": { "enabled": true } }, "log": { "security_file": "audit.log" } }"#,
        )
        .unwrap();
        assert!(config.server.plugins.enabled);
        assert_eq!(config.log.security_file, "audit.log");
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(Config::from_json(r#"{ "server": { "plugins": { "enabled": "yes" } } }"#).is_err());
    }
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitpad.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. master gitpad.toml (data dir)
//! 3. local gitpad.toml (cwd)
//! 4. --config FILE (repeatable)
//! 5. GITPAD__* env vars
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITPAD__API__BASE_URL=http://localhost:8080 → api.base_url
//! GITPAD__AUTH__CLIENT_ID=Iv1.abc            → auth.client_id
//! GITPAD__STORAGE__NAMESPACE=work            → storage.namespace
//! ```

pub mod loader;
pub mod paths;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{ApiConfig, AuthConfig, EditorConfig, GlobalConfig, StorageConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Logging options.
    pub global: GlobalConfig,
    /// Hosting API endpoints and cache policy.
    pub api: ApiConfig,
    /// Device-flow OAuth application.
    pub auth: AuthConfig,
    /// Key-value store location.
    pub storage: StorageConfig,
    /// Editable file rules.
    pub editor: EditorConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitpad::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitpad.toml")
    ///     .with_env_prefix("GITPAD")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for an empty URL or namespace, a
    /// namespace containing `:`, or a zero file size limit.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |section: &str, key: &str, message: &str| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.api.base_url.trim().is_empty() {
            return Err(invalid("api", "base_url", "must not be empty"));
        }
        if self.api.auth_url.trim().is_empty() {
            return Err(invalid("api", "auth_url", "must not be empty"));
        }
        if self.storage.namespace.is_empty() || self.storage.namespace.contains(':') {
            return Err(invalid(
                "storage",
                "namespace",
                "must be non-empty and must not contain ':'",
            ));
        }
        if self.editor.max_file_size == 0 {
            return Err(invalid("editor", "max_file_size", "must be greater than 0"));
        }
        Ok(())
    }

    /// Client id for device-flow login.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` when `auth.client_id` is unset.
    pub fn client_id(&self) -> std::result::Result<&str, ConfigError> {
        if self.auth.client_id.is_empty() {
            Err(ConfigError::MissingKey {
                section: "auth".to_string(),
                key: "client_id".to_string(),
            })
        } else {
            Ok(&self.auth.client_id)
        }
    }

    /// Format configuration options for display, ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_api_options(&mut options);
        self.format_storage_options(&mut options);
        self.format_editor_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global.json_logs".into(), self.global.json_logs.to_string());
    }

    fn format_api_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("api.base_url".into(), self.api.base_url.clone());
        options.insert("api.auth_url".into(), self.api.auth_url.clone());
        options.insert(
            "api.cache_ttl_secs".into(),
            self.api.cache_ttl_secs.to_string(),
        );
        if !self.auth.client_id.is_empty() {
            options.insert("auth.client_id".into(), self.auth.client_id.clone());
        }
        options.insert("auth.scope".into(), self.auth.scope.clone());
    }

    fn format_storage_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "storage.file".into(),
            paths::store_file(&self.storage).display().to_string(),
        );
        options.insert("storage.namespace".into(), self.storage.namespace.clone());
        if let Some(quota) = self.storage.quota_bytes {
            options.insert("storage.quota_bytes".into(), quota.to_string());
        }
    }

    fn format_editor_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "editor.binary_extensions".into(),
            self.editor.binary_extensions.join(","),
        );
        options.insert(
            "editor.max_file_size".into(),
            self.editor.max_file_size.to_string(),
        );
    }
}

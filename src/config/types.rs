// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: GlobalConfig, ApiConfig, AuthConfig, StorageConfig, EditorConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::github::content::{DEFAULT_BINARY_EXTENSIONS, MAX_FILE_SIZE};
use crate::logging::LogLevel;

/// Global options (logging).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file, no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub json_logs: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::WARN,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
            json_logs: false,
        }
    }
}

/// Hosting API endpoints and cache policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// REST API root.
    pub base_url: String,
    /// Web root used by the device authorization flow.
    pub auth_url: String,
    /// Lifetime of cached branch and tree listings, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            auth_url: "https://github.com".to_string(),
            cache_ttl_secs: 300,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// OAuth application used for device-flow login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// OAuth app client id.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    /// Requested scope.
    pub scope: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            scope: "repo".to_string(),
        }
    }
}

/// Persistent key-value store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the store file (default: platform data dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Prefix applied to every key.
    pub namespace: String,
    /// Maximum serialized size of the store in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            namespace: "gitpad".to_string(),
            quota_bytes: None,
        }
    }
}

/// Which files may be opened for editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Extensions (without dot, lowercase) treated as binary.
    pub binary_extensions: Vec<String>,
    /// Largest editable file in bytes.
    pub max_file_size: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            binary_extensions: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

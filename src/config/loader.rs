// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::standard()        master + local gitpad.toml, GITPAD__* env
//!   .add_toml_file(path)          --config FILE, must exist
//!   .add_toml_str(toml)           tests
//!   .set(key, value)              --set KEY=VALUE, always wins
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};

use super::{Config, paths};
use crate::error::Result;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GITPAD";

/// Where a configuration layer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Master file in the data directory.
    Master(PathBuf),
    /// `gitpad.toml` in the current directory.
    Local(PathBuf),
    /// File named on the command line.
    File(PathBuf),
    /// Inline TOML.
    Inline,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master(path) => write!(f, "[master] {}", path.display()),
            Self::Local(path) => write!(f, "[local] {}", path.display()),
            Self::File(path) => write!(f, "[file] {}", path.display()),
            Self::Inline => f.write_str("[string] <inline>"),
        }
    }
}

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<Source>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    /// Loader with the usual layers: the master file, the local file and
    /// `GITPAD__*` variables. Missing files are skipped.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .add_optional(paths::master_config_file(), Source::Master)
            .add_optional(PathBuf::from(paths::CONFIG_FILE), Source::Local)
            .with_env_prefix(ENV_PREFIX)
    }

    fn add_optional(mut self, path: PathBuf, source: fn(PathBuf) -> Source) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false));
        if path.exists() {
            self.sources.push(source(path));
        }
        self
    }

    /// Adds a TOML configuration file that must exist.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.sources.push(Source::File(path.to_path_buf()));
        self
    }

    /// Adds a TOML configuration file that is skipped when missing.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_optional(path.as_ref().to_path_buf(), Source::File)
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(Source::Inline);
        self
    }

    /// Reads `PREFIX__SECTION__KEY` variables; double underscores separate
    /// levels so single underscores can appear in key names.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Apply every `(key, value)` pair with [`ConfigLoader::set`].
    ///
    /// # Errors
    ///
    /// Returns the first rejected override.
    pub fn set_all<I>(self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        overrides
            .into_iter()
            .try_fold(self, |loader, (key, value)| loader.set(&key, value))
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax or unknown keys.
    /// - Environment variables cannot be parsed.
    /// - The merged configuration fails validation.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Numbered source list for the `configs` command.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}. {source}", i + 1))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Well-known file locations.
//!
//! ```text
//! <data dir>/gitpad/
//!   gitpad.toml   (optional master config)
//!   store.json    (key-value store)
//! ```
//!
//! `<data dir>` is `dirs::data_dir()`; `GITPAD_HOME` replaces the whole
//! `<data dir>/gitpad` directory.

use std::path::{Path, PathBuf};

use super::types::StorageConfig;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "GITPAD_HOME";

/// File name of the configuration file.
pub const CONFIG_FILE: &str = "gitpad.toml";

/// File name of the key-value store.
pub const STORE_FILE: &str = "store.json";

/// Resolve the data directory: `GITPAD_HOME`, then the platform data dir,
/// then the current directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }
    dirs::data_dir().map_or_else(|| PathBuf::from(".gitpad"), |dir| dir.join("gitpad"))
}

/// Master config file inside the data directory.
#[must_use]
pub fn master_config_file() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

/// Location of the store file for the given storage settings.
#[must_use]
pub fn store_file(storage: &StorageConfig) -> PathBuf {
    storage
        .dir
        .as_deref()
        .map_or_else(data_dir, Path::to_path_buf)
        .join(STORE_FILE)
}

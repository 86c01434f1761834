// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `options` and `configs` commands.

use crate::config::loader::ConfigLoader;
use crate::config::{Config, paths};

/// Print every option, then the resolved file locations.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
    println!();
    println!("data dir   = {}", paths::data_dir().display());
    println!("store file = {}", paths::store_file(&config.storage).display());
}

/// Print the config sources `loader` picked up, in load order.
pub fn run_configs_command(loader: &ConfigLoader) {
    let lines = loader.format_loaded_files();
    if lines.is_empty() {
        println!("No configuration files loaded (defaults only)");
    }
    for line in lines {
        println!("{line}");
    }
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Config, ConfigLoader};
use crate::config::paths;
use crate::logging::LogLevel;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "https://api.github.com");
    assert_eq!(config.api.cache_ttl(), Duration::from_secs(300));
    assert_eq!(config.storage.namespace, "gitpad");
    assert_eq!(config.editor.max_file_size, 1_048_576);
    assert_eq!(config.global.output_log_level, LogLevel::WARN);
    assert!(config.editor.binary_extensions.iter().any(|e| e == "png"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_sections() {
    let config = Config::parse(
        r#"
[global]
output_log_level = 4
json_logs = true

[api]
base_url = "http://localhost:9000"
cache_ttl_secs = 60

[auth]
client_id = "Iv1.test"

[storage]
dir = "/tmp/gitpad"
namespace = "work"

[editor]
binary_extensions = ["png", "psd"]
max_file_size = 2048
"#,
    )
    .unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert!(config.global.json_logs);
    assert_eq!(config.api.base_url, "http://localhost:9000");
    assert_eq!(config.api.auth_url, "https://github.com");
    assert_eq!(config.api.cache_ttl_secs, 60);
    assert_eq!(config.client_id().unwrap(), "Iv1.test");
    assert_eq!(config.storage.namespace, "work");
    assert_eq!(
        paths::store_file(&config.storage),
        PathBuf::from("/tmp/gitpad/store.json")
    );
    assert_eq!(config.editor.binary_extensions, vec!["png", "psd"]);
    assert_eq!(config.editor.max_file_size, 2048);
}

#[test]
fn test_unknown_key_rejected() {
    let result = Config::parse(
        r#"
[api]
base_url = "https://api.github.com"
token = "do-not-put-tokens-here"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = Config::parse("[global]\noutput_log_level = 9\n");
    assert!(result.is_err());
}

#[test]
fn test_namespace_with_colon_rejected() {
    let result = Config::parse("[storage]\nnamespace = \"a:b\"\n");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("namespace"), "{err}");
}

#[test]
fn test_missing_client_id() {
    let config = Config::default();
    insta::assert_snapshot!(
        config.client_id().unwrap_err().to_string(),
        @"missing required config key 'client_id' in section '[auth]'"
    );
}

#[test]
fn test_later_sources_override_earlier() {
    let config = ConfigLoader::new()
        .add_toml_str("[api]\ncache_ttl_secs = 10\n")
        .add_toml_str("[api]\ncache_ttl_secs = 20\n")
        .build()
        .unwrap();
    assert_eq!(config.api.cache_ttl_secs, 20);
}

#[test]
fn test_set_override() {
    let config = ConfigLoader::new()
        .add_toml_str("[storage]\nnamespace = \"a\"\n")
        .set("storage.namespace", "b")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.storage.namespace, "b");
}

#[test]
fn test_format_options_sorted_and_aligned() {
    let options = Config::default().format_options();
    let keys: Vec<&str> = options
        .iter()
        .map(|line| line.split_whitespace().next().unwrap_or_default())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);

    let eq_columns: Vec<usize> = options.iter().filter_map(|l| l.find(" = ")).collect();
    assert!(eq_columns.windows(2).all(|w| w[0] == w[1]));
}

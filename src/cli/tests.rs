// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::branch::BranchSubcommand;
use crate::cli::global::GlobalOptions;
use crate::cli::{Command, try_parse_from};

#[test]
fn test_parse_version() {
    let cli = try_parse_from(["gitpad", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = try_parse_from([
        "gitpad",
        "-l",
        "4",
        "-c",
        "a.toml",
        "--config",
        "b.toml",
        "-s",
        "api.cache_ttl_secs=60",
        "status",
    ])
    .unwrap();
    assert_eq!(cli.global.log_level, Some(4));
    assert_eq!(cli.global.configs.len(), 2);
    assert_eq!(cli.global.options, vec!["api.cache_ttl_secs=60"]);
    assert!(matches!(cli.command, Some(Command::Status)));
}

#[test]
fn test_log_level_out_of_range() {
    assert!(try_parse_from(["gitpad", "-l", "6", "status"]).is_err());
}

#[test]
fn test_parse_commit_requires_message() {
    assert!(try_parse_from(["gitpad", "commit"]).is_err());

    let cli = try_parse_from(["gitpad", "commit", "-m", "Tune jump"]).unwrap();
    let Some(Command::Commit(args)) = cli.command else {
        panic!("expected commit");
    };
    assert_eq!(args.message, "Tune jump");
}

#[test]
fn test_parse_edit_from_file() {
    let cli = try_parse_from(["gitpad", "edit", "Scripts/Player.cs", "--from", "p.cs"]).unwrap();
    let Some(Command::Edit(args)) = cli.command else {
        panic!("expected edit");
    };
    assert_eq!(args.path, "Scripts/Player.cs");
    assert_eq!(args.from.as_deref(), Some(std::path::Path::new("p.cs")));
}

#[test]
fn test_parse_branch_switch_confirmed() {
    let cli = try_parse_from(["gitpad", "branch", "switch", "develop", "--yes"]).unwrap();
    let Some(Command::Branch(args)) = cli.command else {
        panic!("expected branch");
    };
    let BranchSubcommand::Switch(switch) = args.subcommand else {
        panic!("expected switch");
    };
    assert_eq!(switch.name, "develop");
    assert!(switch.yes);
}

#[test]
fn test_parse_branch_create_from() {
    let cli = try_parse_from(["gitpad", "branch", "create", "feature/x", "--from", "main"]).unwrap();
    let Some(Command::Branch(args)) = cli.command else {
        panic!("expected branch");
    };
    let BranchSubcommand::Create(create) = args.subcommand else {
        panic!("expected create");
    };
    assert_eq!(create.from.as_deref(), Some("main"));
}

#[test]
fn test_parse_rate_limit_name() {
    let cli = try_parse_from(["gitpad", "rate-limit"]).unwrap();
    assert!(matches!(cli.command, Some(Command::RateLimit)));
}

#[test]
fn test_config_overrides() {
    let global = GlobalOptions {
        log_level: Some(4),
        options: vec!["api.base_url=http://localhost:8080".into(), "broken".into()],
        ..GlobalOptions::default()
    };
    let (overrides, malformed) = global.to_config_overrides();

    assert_eq!(
        overrides,
        vec![
            ("api.base_url".to_string(), "http://localhost:8080".to_string()),
            ("global.output_log_level".to_string(), "4".to_string()),
            ("global.file_log_level".to_string(), "4".to_string()),
        ]
    );
    assert_eq!(malformed, vec!["broken"]);
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Login | Use | Edit | Commit | Branch | ...
//! ```

use std::process::ExitCode;

use gitpad::cli::global::GlobalOptions;
use gitpad::cli::{self, Command};
use gitpad::cmd::auth::{run_login, run_logout, run_whoami};
use gitpad::cmd::branch::{run_branch_command, run_compare};
use gitpad::cmd::config::{run_configs_command, run_options_command};
use gitpad::cmd::edit::{run_commit, run_discard, run_edit, run_pull, run_push, run_status};
use gitpad::cmd::repo::{
    run_pin, run_pins, run_rate_limit, run_repos, run_show, run_tree, run_unpin, run_use,
};
use gitpad::cmd::with_session;
use gitpad::config::Config;
use gitpad::config::loader::{ConfigLoader, ENV_PREFIX};
use gitpad::logging::init_logging;
use gitpad::logging::LogConfig;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .with_json(config.global.json_logs)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Configs) => {
            run_configs_command(&build_config_loader(&cli.global));
            Ok(())
        }
        Some(Command::Login) => run_login(config).await,
        Some(Command::Logout) => run_logout(config),
        Some(Command::Whoami) => with_session(config, false, run_whoami).await,
        Some(Command::Repos) => with_session(config, false, run_repos).await,
        Some(Command::Use(args)) => {
            with_session(config, false, async |s| run_use(args, s).await).await
        }
        Some(Command::Tree) => with_session(config, true, run_tree).await,
        Some(Command::Show(args)) => {
            with_session(config, true, async |s| run_show(args, s).await).await
        }
        Some(Command::Edit(args)) => {
            with_session(config, true, async |s| run_edit(args, s).await).await
        }
        Some(Command::Discard(args)) => {
            with_session(config, true, async |s| run_discard(args, s).await).await
        }
        Some(Command::Status) => with_session(config, true, async |s| run_status(s)).await,
        Some(Command::Commit(args)) => {
            with_session(config, true, async |s| run_commit(args, s).await).await
        }
        Some(Command::Pull) => with_session(config, true, run_pull).await,
        Some(Command::Push) => with_session(config, true, async |s| run_push(s)).await,
        Some(Command::Branch(args)) => {
            with_session(config, true, async |s| run_branch_command(args, s).await).await
        }
        Some(Command::Compare(args)) => {
            with_session(config, true, async |s| run_compare(args, s).await).await
        }
        Some(Command::Pin(args)) => with_session(config, true, async |s| run_pin(args, s)).await,
        Some(Command::Unpin(args)) => {
            with_session(config, true, async |s| run_unpin(args, s)).await
        }
        Some(Command::Pins) => with_session(config, true, async |s| run_pins(s)).await,
        Some(Command::RateLimit) => {
            with_session(config, false, async |s| {
                run_rate_limit(s).await;
                Ok(())
            })
            .await
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = if global.no_default_configs {
        ConfigLoader::new().with_env_prefix(ENV_PREFIX)
    } else {
        ConfigLoader::standard()
    };
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader
}

fn load_config(global: &GlobalOptions) -> gitpad::error::Result<Config> {
    let (overrides, malformed) = global.to_config_overrides();
    if let Some(option) = malformed.first() {
        anyhow::bail!("--set expects KEY=VALUE, got '{option}'");
    }

    build_config_loader(global).set_all(overrides)?.build()
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitpad using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitpad [global options] <command>
//! login | logout | whoami
//! repos | use OWNER/NAME
//! tree | show PATH | edit PATH | discard PATH | status
//! commit -m MSG | pull | push
//! branch {list|switch|create} | compare BASE
//! pin PATH | unpin PATH | pins
//! rate-limit | options | version
//! ```

pub mod branch;
pub mod edit;
pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::branch::{BranchArgs, CompareArgs};
use crate::cli::edit::{CommitArgs, EditArgs, PathArg};
use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// Edit files of a hosted repository and commit them back.
#[derive(Debug, Parser)]
#[command(
    name = "gitpad",
    author,
    version,
    about = "Edit-and-commit client for hosted repositories",
    long_about = "gitpad Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Log in with `gitpad login`, pick a repository with\n\
                  `gitpad use owner/name`, then edit files and commit them.\n\
                  Saved edits survive restarts until they are committed or\n\
                  discarded.",
    after_help = "CONFIG FILES:\n\n\
                  gitpad reads `gitpad.toml` from its data directory (or\n\
                  $GITPAD_HOME), then `gitpad.toml` in the current directory,\n\
                  then every --config file in order. GITPAD__SECTION__KEY\n\
                  environment variables and --set override all files."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the config files that were loaded.
    Configs,

    /// Logs in through the device authorization flow.
    Login,

    /// Forgets the stored credential; saved edits are kept.
    Logout,

    /// Shows the logged-in user.
    Whoami,

    /// Lists repositories you can access.
    Repos,

    /// Selects the active repository.
    Use(UseArgs),

    /// Prints the file tree of the active branch.
    Tree,

    /// Prints a file, including its saved edit if any.
    Show(PathArg),

    /// Replaces a file's content and saves the edit locally.
    Edit(EditArgs),

    /// Drops the saved edit of a file.
    Discard(PathArg),

    /// Shows the active branch and saved edits.
    Status,

    /// Commits every saved edit as one commit.
    Commit(CommitArgs),

    /// Refreshes the tree of the active branch.
    Pull,

    /// Checks that nothing is left to push.
    Push,

    /// Lists, switches or creates branches.
    Branch(BranchArgs),

    /// Compares the active branch with another.
    Compare(CompareArgs),

    /// Pins a file for quick access.
    Pin(PathArg),

    /// Unpins a file.
    Unpin(PathArg),

    /// Lists pinned files.
    Pins,

    /// Shows the remaining API quota.
    #[command(name = "rate-limit")]
    RateLimit,
}

/// Arguments for the `use` command.
#[derive(Debug, Clone, Args)]
pub struct UseArgs {
    /// Repository in owner/name form.
    #[arg(value_name = "OWNER/NAME")]
    pub repository: String,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}

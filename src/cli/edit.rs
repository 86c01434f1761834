// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! File and commit command arguments.

use clap::Args;
use std::path::PathBuf;

/// A single repository path.
#[derive(Debug, Clone, Args)]
pub struct PathArg {
    /// Path inside the repository, e.g. `Scripts/Player.cs`.
    #[arg(value_name = "PATH")]
    pub path: String,
}

/// Arguments for the `edit` command.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Path inside the repository.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Read the new content from FILE instead of stdin.
    #[arg(short = 'f', long = "from", value_name = "FILE")]
    pub from: Option<PathBuf>,
}

/// Arguments for the `commit` command.
#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Commit message.
    #[arg(short = 'm', long = "message", value_name = "MESSAGE", required = true)]
    pub message: String,
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch command arguments.
//!
//! # Subcommands
//!
//! ```text
//! branch list
//! branch switch NAME [--yes]
//!   → saved edits follow the switch, --yes confirms that
//! branch create NAME [--from BRANCH]
//!   → created remotely, not switched to
//! ```

use clap::{Args, Subcommand};

/// Arguments for the `branch` command.
#[derive(Debug, Clone, Args)]
pub struct BranchArgs {
    /// Branch subcommand.
    #[command(subcommand)]
    pub subcommand: BranchSubcommand,
}

/// Branch subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum BranchSubcommand {
    /// Lists branches of the active repository.
    List,

    /// Makes another branch active.
    Switch(SwitchArgs),

    /// Creates a branch on the remote.
    Create(CreateArgs),
}

/// Arguments for `branch switch`.
#[derive(Debug, Clone, Args)]
pub struct SwitchArgs {
    /// Branch to switch to.
    pub name: String,

    /// Switch even though saved edits are pending.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for `branch create`.
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Name of the new branch.
    pub name: String,

    /// Branch to start from (default: the active branch).
    #[arg(long, value_name = "BRANCH")]
    pub from: Option<String>,
}

/// Arguments for the `compare` command.
#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    /// Base branch; the active branch is the head.
    pub base: String,
}

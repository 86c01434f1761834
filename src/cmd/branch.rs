// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch commands.

use super::ClientSession;
use crate::cli::branch::{BranchArgs, BranchSubcommand, CompareArgs};
use crate::error::Result;

/// Main handler for `branch`.
///
/// # Errors
///
/// Returns an error if the branch operation fails.
pub async fn run_branch_command(args: &BranchArgs, session: &mut ClientSession) -> Result<()> {
    match &args.subcommand {
        BranchSubcommand::List => {
            let active = session
                .workspace()
                .map(|ws| ws.branch().to_string())
                .unwrap_or_default();
            for branch in session.branches().await? {
                let marker = if branch.name == active { '*' } else { ' ' };
                let protected = if branch.protected { " (protected)" } else { "" };
                println!("{marker} {}{protected}", branch.name);
            }
        }
        BranchSubcommand::Switch(switch) => {
            if session.switch_branch(&switch.name, switch.yes).await? {
                let pending = session.pending()?.len();
                println!("Switched to {}", switch.name);
                if pending > 0 {
                    println!("{pending} saved edit(s) carried over");
                }
            } else {
                println!("Already on {}", switch.name);
            }
        }
        BranchSubcommand::Create(create) => {
            session
                .create_branch(&create.name, create.from.as_deref())
                .await?;
            println!("Created branch {}", create.name);
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if either branch is missing.
pub async fn run_compare(args: &CompareArgs, session: &mut ClientSession) -> Result<()> {
    let comparison = session.compare(&args.base).await?;
    println!(
        "{}: {} ahead, {} behind {}",
        comparison.status, comparison.ahead_by, comparison.behind_by, args.base
    );
    Ok(())
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository selection and browsing commands.

use std::collections::BTreeSet;

use super::ClientSession;
use crate::cli::UseArgs;
use crate::cli::edit::PathArg;
use crate::error::Result;
use crate::github::RepositoryRef;
use crate::github::tree::TreeNode;

/// List repositories the user can access.
///
/// # Errors
///
/// Returns an error if the listing fails.
pub async fn run_repos(session: &mut ClientSession) -> Result<()> {
    let repositories = session.repositories().await?;
    if repositories.is_empty() {
        println!("No repositories found");
        return Ok(());
    }
    for repo in repositories {
        let visibility = if repo.private { "private" } else { "public" };
        println!("{} [{}] {visibility}", repo.full_name, repo.default_branch);
    }
    Ok(())
}

/// Make a repository active.
///
/// # Errors
///
/// Returns an error for a malformed name or an unknown repository.
pub async fn run_use(args: &UseArgs, session: &mut ClientSession) -> Result<()> {
    let repo: RepositoryRef = args.repository.parse()?;
    let workspace = session.select_repository(repo).await?;
    println!("Using {workspace}");
    Ok(())
}

/// Print the tree of the active branch; `*` marks saved edits.
///
/// # Errors
///
/// Returns an error if the tree cannot be loaded.
pub async fn run_tree(session: &mut ClientSession) -> Result<()> {
    let pending: BTreeSet<String> = session
        .pending()?
        .into_iter()
        .map(|record| record.path)
        .collect();
    let nodes = session.tree().await?;
    print_nodes(&nodes, 0, &pending);
    Ok(())
}

fn print_nodes(nodes: &[TreeNode], depth: usize, pending: &BTreeSet<String>) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node {
            TreeNode::Dir { name, children, .. } => {
                println!("{indent}{name}/");
                print_nodes(children, depth + 1, pending);
            }
            TreeNode::File { name, path, .. } => {
                let marker = if pending.contains(path) { " *" } else { "" };
                println!("{indent}{name}{marker}");
            }
        }
    }
}

/// Print a file as it would be committed.
///
/// # Errors
///
/// Returns an error if the file cannot be opened for editing.
pub async fn run_show(args: &PathArg, session: &mut ClientSession) -> Result<()> {
    let file = session.open_file(&args.path).await?;
    print!("{}", file.live());
    Ok(())
}

/// # Errors
///
/// Returns an error if the pin list cannot be written.
pub fn run_pin(args: &PathArg, session: &ClientSession) -> Result<()> {
    if session.pin(&args.path)? {
        println!("Pinned {}", args.path);
    } else {
        println!("{} is already pinned", args.path);
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the pin list cannot be written.
pub fn run_unpin(args: &PathArg, session: &ClientSession) -> Result<()> {
    if session.unpin(&args.path)? {
        println!("Unpinned {}", args.path);
    } else {
        println!("{} is not pinned", args.path);
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the pin list cannot be read.
pub fn run_pins(session: &ClientSession) -> Result<()> {
    let pinned = session.pinned()?;
    if pinned.is_empty() {
        println!("No pinned files");
    }
    for path in pinned {
        println!("{path}");
    }
    Ok(())
}

/// Print the remaining API quota; the lookup itself never fails.
pub async fn run_rate_limit(session: &ClientSession) {
    println!("{}", session.rate_limit().await);
}

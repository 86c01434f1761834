// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Edit and sync commands.
//!
//! ```text
//! edit PATH     open --> update_live(stdin | --from) --> save
//! discard PATH  open --> discard
//! commit -m     every saved edit --> one commit
//! ```

use std::io::Read;

use anyhow::Context;

use super::ClientSession;
use crate::cli::edit::{CommitArgs, EditArgs, PathArg};
use crate::error::Result;
use crate::sync::{PushStatus, SyncState};

/// Length of the abbreviated commit id.
const SHORT_SHA: usize = 7;

fn read_new_content(args: &EditArgs) -> Result<String> {
    match &args.from {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read new content from stdin")?;
            Ok(content)
        }
    }
}

/// Replace a file's content and save the edit.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the edit cannot be saved.
pub async fn run_edit(args: &EditArgs, session: &mut ClientSession) -> Result<()> {
    let content = read_new_content(args)?;
    session.open_file(&args.path).await?;

    let tracker = session.tracker_mut();
    tracker.update_live(content)?;
    tracker.save()?;
    if tracker.is_dirty() {
        println!("Saved edit of {}", args.path);
    } else {
        println!("{} matches the committed content", args.path);
    }
    Ok(())
}

/// Drop the saved edit of a file.
///
/// # Errors
///
/// Returns an error if the record cannot be removed.
pub async fn run_discard(args: &PathArg, session: &mut ClientSession) -> Result<()> {
    let Some(workspace) = session.workspace() else {
        anyhow::bail!("no repository selected");
    };
    if session
        .storage()
        .edit_record(workspace.repo(), &args.path)?
        .is_none()
    {
        println!("{} has no saved edit", args.path);
        return Ok(());
    }

    session.open_file(&args.path).await?;
    session.tracker_mut().discard()?;
    println!("Discarded edit of {}", args.path);
    Ok(())
}

/// Print the active branch and saved edits.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn run_status(session: &ClientSession) -> Result<()> {
    if let Some(workspace) = session.workspace() {
        println!("On {workspace}");
    }
    match session.state()? {
        SyncState::Clean => println!("Nothing to commit"),
        state @ SyncState::PendingEdits { .. } => {
            println!("{state}:");
            for record in session.pending()? {
                println!("  {}", record.path);
            }
        }
    }
    Ok(())
}

/// Commit every saved edit.
///
/// # Errors
///
/// Returns an error for an empty message, nothing to commit, or a failed commit.
pub async fn run_commit(args: &CommitArgs, session: &mut ClientSession) -> Result<()> {
    let summary = session.commit(&args.message).await?;
    let short = summary.commit.get(..SHORT_SHA).unwrap_or(&summary.commit);
    println!("[{short}] {} file(s) committed", summary.paths.len());
    for path in &summary.paths {
        println!("  {path}");
    }
    Ok(())
}

/// # Errors
///
/// Returns an error while edits are pending or if the refresh fails.
pub async fn run_pull(session: &mut ClientSession) -> Result<()> {
    let entries = session.pull().await?;
    println!("Up to date ({} entries)", entries.len());
    Ok(())
}

/// # Errors
///
/// Returns an error while edits are pending.
pub fn run_push(session: &ClientSession) -> Result<()> {
    match session.push()? {
        PushStatus::AlreadyPushed => println!("Everything is pushed"),
    }
    Ok(())
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   auth     login, logout, whoami
//!   repo     repos, use, tree, show, pins, rate-limit
//!   edit     edit, discard, status, commit, pull, push
//!   branch   branch list/switch/create, compare
//!   config   options, configs
//!
//! Storage (store.json) --> Session::resume --> handler
//!                 EventSink --> progress spinner (stderr)
//! ```

pub mod auth;
pub mod branch;
pub mod config;
pub mod edit;
pub mod progress;
pub mod repo;

use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use crate::config::Config;
use crate::config::paths;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::session::{EventSink, Session};
use crate::store::{FileStore, Storage};

use self::progress::Progress;

/// Session type every command works with.
pub type ClientSession = Session<GitHubClient>;

/// Open the persistent store described by `config.storage`.
///
/// # Errors
///
/// Returns an error if the store file exists but cannot be read.
pub fn open_storage(config: &Config) -> Result<Storage> {
    let path = paths::store_file(&config.storage);
    debug!(path = %path.display(), "opening store");
    let store = FileStore::open(&path)
        .with_context(|| format!("failed to open store {}", path.display()))?
        .with_quota(config.storage.quota_bytes);
    Ok(Storage::new(Arc::new(store), &config.storage.namespace))
}

/// Resume the logged-in session.
///
/// # Errors
///
/// Returns an error if nobody is logged in or the client cannot be built.
pub fn open_session(config: &Config, storage: Storage, events: EventSink) -> Result<ClientSession> {
    Ok(Session::resume(storage, events, |credential| {
        GitHubClient::from_config(config, credential)
    })?)
}

/// Resume the session and reselect the active repository.
///
/// # Errors
///
/// Same as [`open_session`], plus `NoRepository` if `gitpad use` was never run.
pub async fn open_workspace(
    config: &Config,
    storage: Storage,
    events: EventSink,
) -> Result<ClientSession> {
    let mut session = open_session(config, storage, events)?;
    if session.restore_workspace().await?.is_none() {
        anyhow::bail!("no repository selected; run `gitpad use OWNER/NAME` first");
    }
    Ok(session)
}

/// Run `handler` against the resumed session, rendering its progress.
///
/// With `workspace` set, the active repository is reselected first.
///
/// # Errors
///
/// Returns the error of opening the session or of `handler`.
pub async fn with_session<T>(
    config: &Config,
    workspace: bool,
    handler: impl AsyncFnOnce(&mut ClientSession) -> Result<T>,
) -> Result<T> {
    let storage = open_storage(config)?;
    let (events, progress) = Progress::start();
    let result = async {
        let mut session = if workspace {
            open_workspace(config, storage, events).await?
        } else {
            open_session(config, storage, events)?
        };
        handler(&mut session).await
    }
    .await;
    progress.finish();
    result
}

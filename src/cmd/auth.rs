// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Login, logout and identity commands.
//!
//! ```text
//! login:  request_code --> print user code --> spawn poll --> join
//!           Authorized(credential) --> Session::start --> whoami
//!           Ctrl+C --> cancel token --> Cancelled
//! ```

use anyhow::bail;
use tracing::{info, warn};

use super::progress::Progress;
use super::{ClientSession, open_session, open_storage};
use crate::auth::{DeviceFlow, PollOutcome, PollPolicy};
use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::session::{Operation, Session};

/// Log in through the device flow and persist the credential.
///
/// # Errors
///
/// Returns an error if `auth.client_id` is unset, the flow is denied,
/// expires or is interrupted, or the credential cannot be stored.
pub async fn run_login(config: &Config) -> Result<()> {
    let flow = DeviceFlow::from_config(config)?;
    let storage = open_storage(config)?;
    let (events, progress) = Progress::start();

    let result = async {
        let code = flow.request_code().await?;
        println!(
            "Open {} and enter the code {}",
            code.verification_uri, code.user_code
        );

        let handle = flow.spawn(code, PollPolicy::default());
        let cancel_token = handle.cancel_token();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C, stopping login...");
                cancel_token.cancel();
            }
        });
        let outcome = {
            let _loading = events.loading(Operation::Login);
            handle.join().await
        };
        watcher.abort();

        let credential = match outcome? {
            PollOutcome::Authorized(credential) => credential,
            PollOutcome::Expired => bail!("the code expired before it was entered; run login again"),
            PollOutcome::Denied => bail!("authorization was denied"),
            PollOutcome::Cancelled => bail!("login cancelled"),
        };

        let client = GitHubClient::from_config(config, credential.clone())?;
        let session = Session::start(client, storage, events, &credential)?;
        let user = session.current_user().await?;
        info!(login = %user.login, "logged in");
        println!("Logged in as {}", user.login);
        Ok(())
    }
    .await;

    progress.finish();
    result
}

/// Forget the credential; saved edits stay on disk.
///
/// # Errors
///
/// Returns an error if nobody is logged in or the store cannot be written.
pub fn run_logout(config: &Config) -> Result<()> {
    let storage = open_storage(config)?;
    let (events, progress) = Progress::start();
    let result = open_session(config, storage, events)
        .and_then(|session| session.logout().map_err(Into::into));
    progress.finish();
    result?;
    println!("Logged out");
    Ok(())
}

/// Print the logged-in user.
///
/// # Errors
///
/// Returns an error if the credential was revoked or the lookup fails.
pub async fn run_whoami(session: &mut ClientSession) -> Result<()> {
    let user = session.current_user().await?;
    match user.name {
        Some(name) => println!("{} ({name})", user.login),
        None => println!("{}", user.login),
    }
    Ok(())
}

// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal rendering of session events.
//!
//! ```text
//! EventSink --flume--> reporter thread
//!   LoadingStarted(op)   spinner "op..."
//!   LoadingFinished(op)  spinner cleared once nothing is loading
//!   Notice / RateLimit   printed above the spinner
//! ```
//!
//! The thread ends when every sender (held by the session) is dropped.

use std::sync::OnceLock;
use std::thread::JoinHandle;
use std::time::Duration;

use flume::Receiver;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::github::RateLimitStatus;
use crate::session::{EventSink, Operation, SessionEvent};

/// Remaining requests below which a warning is printed.
const LOW_QUOTA: u64 = 50;

fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} {msg}...")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Background reporter fed by an [`EventSink`].
#[derive(Debug)]
pub struct Progress {
    thread: Option<JoinHandle<()>>,
}

impl Progress {
    /// Create a sink and start rendering what it receives.
    #[must_use]
    pub fn start() -> (EventSink, Self) {
        let (events, rx) = EventSink::channel();
        let thread = std::thread::spawn(move || render(&rx));
        (
            events,
            Self {
                thread: Some(thread),
            },
        )
    }

    /// Wait for the reporter; call after the session is dropped.
    pub fn finish(mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            debug!("progress reporter panicked");
        }
    }
}

fn render(rx: &Receiver<SessionEvent>) {
    let mut active: Vec<Operation> = Vec::new();
    let mut bar: Option<ProgressBar> = None;

    for event in rx.iter() {
        match event {
            SessionEvent::LoadingStarted(op) => {
                active.push(op);
                let spinner = bar.get_or_insert_with(|| {
                    let pb = ProgressBar::new_spinner();
                    pb.set_style(spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(100));
                    pb
                });
                spinner.set_message(op.to_string());
            }
            SessionEvent::LoadingFinished(op) => {
                if let Some(index) = active.iter().rposition(|o| *o == op) {
                    active.remove(index);
                }
                match active.last() {
                    Some(current) => {
                        if let Some(spinner) = &bar {
                            spinner.set_message(current.to_string());
                        }
                    }
                    None => {
                        if let Some(spinner) = bar.take() {
                            spinner.finish_and_clear();
                        }
                    }
                }
            }
            SessionEvent::RateLimit(RateLimitStatus::Known(rate)) if rate.remaining < LOW_QUOTA => {
                warn!(remaining = rate.remaining, reset = %rate.reset_at, "API quota nearly used up");
            }
            SessionEvent::RateLimit(_) => {}
            SessionEvent::Notice(message) => match &bar {
                Some(spinner) => spinner.suspend(|| eprintln!("{message}")),
                None => eprintln!("{message}"),
            },
            SessionEvent::DirtyChanged { path, dirty } => {
                debug!(%path, dirty, "dirty state changed");
            }
        }
    }

    if let Some(spinner) = bar {
        spinner.finish_and_clear();
    }
}

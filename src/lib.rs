// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |                 + progress spinner
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          session          |
//!              |  workspace, pins, identity|
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!               sync        edit     auth
//!           commit/pull   dirty   device flow
//!               |           |
//!               v           v
//!            github       store
//!        REST + cache   key-value
//!
//!   +-----------------------------------------+
//!   |  foundation   config, error, logging    |
//!   +-----------------------------------------+
//! ```

pub mod auth;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod edit;
pub mod error;
pub mod github;
pub mod logging;
pub mod session;
pub mod store;
pub mod sync;

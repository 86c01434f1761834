// gitpad: edit-and-commit core for hosted repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential type and the OAuth device authorization flow.
//!
//! ```text
//! DeviceFlow::request_code()  POST {auth_url}/login/device/code
//!        |  DeviceCode { user_code, verification_uri, interval, expires_in }
//!        v
//! poll(code, policy, cancel)  POST {auth_url}/login/oauth/access_token
//!        loop: sleep(interval) | cancelled --> Cancelled
//!              authorization_pending  --> again
//!              slow_down              --> interval += policy.slow_down
//!              expired_token/deadline --> Expired
//!              access_denied          --> Denied
//!              access_token           --> Authorized(Credential)
//!
//! spawn(code, policy) --> PollHandle { stop(), join() }
//! ```

use std::fmt;
use std::time::Duration;

use bon::Builder;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AuthError, NetworkError, PadResult};


const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header and the store only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Code pair the user confirms in a browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceCode {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    /// Seconds until the code expires.
    pub expires_in: u64,
    /// Minimum seconds between polls.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

const fn default_interval() -> u64 {
    5
}

/// Polling tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct PollPolicy {
    /// Added to the interval on every `slow_down` answer.
    #[builder(default = Duration::from_secs(5))]
    slow_down: Duration,

    /// Replaces the server-supplied interval.
    interval: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PollPolicy {
    #[must_use]
    pub const fn slow_down(&self) -> Duration {
        self.slow_down
    }

    #[must_use]
    pub const fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Authorized(Credential),
    Expired,
    Denied,
    Cancelled,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    interval: Option<u64>,
}

enum Attempt {
    Token(String),
    Pending,
    SlowDown(Option<u64>),
    Expired,
    Denied,
}

/// Device authorization client for one OAuth app.
#[derive(Debug, Clone)]
pub struct DeviceFlow {
    http: Client,
    auth_url: Url,
    client_id: String,
    scope: String,
}

impl DeviceFlow {
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if `auth_url` is malformed.
    pub fn new(
        auth_url: &str,
        client_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> PadResult<Self> {
        let auth_url =
            Url::parse(auth_url).map_err(|e| NetworkError::InvalidUrl(format!("{auth_url}: {e}")))?;
        Ok(Self {
            http: Client::new(),
            auth_url,
            client_id: client_id.into(),
            scope: scope.into(),
        })
    }

    /// # Errors
    ///
    /// Returns a config error if no client id is configured, or
    /// `NetworkError::InvalidUrl` for a malformed `api.auth_url`.
    pub fn from_config(config: &Config) -> PadResult<Self> {
        Self::new(&config.api.auth_url, config.client_id()?, &config.auth.scope)
    }

    fn endpoint(&self, segments: &[&str]) -> PadResult<Url> {
        let mut url = self.auth_url.clone();
        url.path_segments_mut()
            .map_err(|()| NetworkError::InvalidUrl(self.auth_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        body: &serde_json::Value,
        what: &str,
    ) -> PadResult<T> {
        let response = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpError {
                status: status.as_u16(),
                url: response.url().path().to_string(),
                message: String::new(),
            }
            .into());
        }
        response.json::<T>().await.map_err(|e| {
            NetworkError::Decode {
                what: what.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Start an authorization; show `user_code` and `verification_uri` to the user.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` if the request fails.
    pub async fn request_code(&self) -> PadResult<DeviceCode> {
        let url = self.endpoint(&["login", "device", "code"])?;
        let body = serde_json::json!({
            "client_id": self.client_id,
            "scope": self.scope,
        });
        let code: DeviceCode = self.post(url, &body, "device code").await?;
        info!(
            verification_uri = %code.verification_uri,
            expires_in = code.expires_in,
            "device code issued"
        );
        Ok(code)
    }

    async fn attempt(&self, code: &DeviceCode) -> PadResult<Attempt> {
        let url = self.endpoint(&["login", "oauth", "access_token"])?;
        let body = serde_json::json!({
            "client_id": self.client_id,
            "device_code": code.device_code,
            "grant_type": GRANT_TYPE,
        });
        let response: TokenResponse = self.post(url, &body, "token response").await?;

        if let Some(token) = response.access_token.filter(|t| !t.is_empty()) {
            return Ok(Attempt::Token(token));
        }
        match response.error.as_deref() {
            Some("authorization_pending") => Ok(Attempt::Pending),
            Some("slow_down") => Ok(Attempt::SlowDown(response.interval)),
            Some("expired_token") => Ok(Attempt::Expired),
            Some("access_denied") => Ok(Attempt::Denied),
            Some(other) => Err(AuthError::Protocol(match response.error_description {
                Some(description) => format!("{other}: {description}"),
                None => other.to_string(),
            })
            .into()),
            None => Err(AuthError::Protocol("neither token nor error in response".to_string()).into()),
        }
    }

    /// Poll until the user acts, the code expires, or `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure and `AuthError::Protocol`
    /// for an unrecognized answer.
    pub async fn poll(
        &self,
        code: &DeviceCode,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> PadResult<PollOutcome> {
        let deadline = Instant::now() + Duration::from_secs(code.expires_in);
        let mut interval = policy
            .interval()
            .unwrap_or_else(|| Duration::from_secs(code.interval));

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("device authorization cancelled");
                    return Ok(PollOutcome::Cancelled);
                }
                () = tokio::time::sleep(interval) => {}
            }

            if Instant::now() >= deadline {
                return Ok(PollOutcome::Expired);
            }

            match self.attempt(code).await? {
                Attempt::Token(token) => {
                    info!("device authorization granted");
                    return Ok(PollOutcome::Authorized(Credential::new(token)));
                }
                Attempt::Pending => debug!("authorization pending"),
                Attempt::SlowDown(server) => {
                    interval += policy.slow_down();
                    if let Some(seconds) = server {
                        interval = interval.max(Duration::from_secs(seconds));
                    }
                    warn!(interval_ms = interval.as_millis(), "asked to slow down");
                }
                Attempt::Expired => return Ok(PollOutcome::Expired),
                Attempt::Denied => return Ok(PollOutcome::Denied),
            }
        }
    }

    /// Run [`DeviceFlow::poll`] on a background task.
    #[must_use]
    pub fn spawn(&self, code: DeviceCode, policy: PollPolicy) -> PollHandle {
        let cancel = CancellationToken::new();
        let flow = self.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move { flow.poll(&code, &policy, &token).await });
        PollHandle { cancel, task }
    }
}

/// Stop handle of a spawned polling task.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<PadResult<PollOutcome>>,
}

impl PollHandle {
    /// Ask the task to stop; it finishes with [`PollOutcome::Cancelled`].
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Token that stops the task when cancelled, for signal handlers.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the outcome.
    ///
    /// # Errors
    ///
    /// Returns the poll error, or `AuthError::Protocol` if the task panicked.
    pub async fn join(self) -> PadResult<PollOutcome> {
        self.task
            .await
            .map_err(|e| AuthError::Protocol(format!("polling task failed: {e}")))?
    }
}

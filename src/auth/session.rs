use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::AuthenticationManager;
use crate::error::NetworkError;

#[derive(Debug, Default, Clone, Copy)]
struct SessionState {
    /// Last known authorisation verdict; `None` until first checked.
    authorised: Option<bool>,
    initialized: bool,
}

/// Bearer-token session against a catalog's auth endpoints.
///
/// `GET {base}/session` validates the token; `POST {base}/session/init`
/// performs the one-time initialization. The flag state sits behind its own
/// mutex and no lock is held across a network call, so concurrent loads
/// sharing the session serialize their mutations without blocking each
/// other's fetches.
pub struct TokenSessionManager {
    client: Client,
    session_url: Url,
    init_url: Url,
    token: String,
    state: Mutex<SessionState>,
}

impl TokenSessionManager {
    pub fn new(base: &Url, token: String, timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            session_url: base.join("session")?,
            init_url: base.join("session/init")?,
            token,
            state: Mutex::new(SessionState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn check_session(&self) -> Result<bool, NetworkError> {
        let response = self
            .client
            .get(self.session_url.clone())
            .bearer_auth(&self.token)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            status => Err(NetworkError::Status(status.as_u16())),
        }
    }
}

#[async_trait::async_trait]
impl AuthenticationManager for TokenSessionManager {
    async fn is_authorised(&self, force_refresh: bool) -> Result<bool, NetworkError> {
        if !force_refresh {
            if let Some(cached) = self.state().authorised {
                return Ok(cached);
            }
        }
        let verdict = self.check_session().await?;
        self.state().authorised = Some(verdict);
        Ok(verdict)
    }

    fn needs_initialization(&self) -> bool {
        !self.state().initialized
    }

    async fn initialize(&self) -> Result<(), NetworkError> {
        let response = self
            .client
            .post(self.init_url.clone())
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }
        self.state().initialized = true;
        debug!("session initialized");
        Ok(())
    }

    async fn log_out(&self) {
        let mut state = self.state();
        state.authorised = Some(false);
        state.initialized = false;
        debug!("session logged out");
    }
}

impl std::fmt::Debug for TokenSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSessionManager")
            .field("session_url", &self.session_url.as_str())
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

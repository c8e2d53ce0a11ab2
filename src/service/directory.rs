//! In-memory account directory
//!
//! Backs the CLI and tests. Implements both collaborator traits so a
//! successful login is visible to the start screen.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::DirectoryConfig;
use crate::domain::{Credentials, SubmissionStatus};
use crate::error::{LoginFlowError, Result};
use crate::service::traits::{CredentialService, SessionService};

/// Account directory keyed by email.
#[derive(Default)]
pub struct Directory {
    accounts: HashMap<String, String>,
    latency: Duration,
    session: Mutex<Option<String>>,
}

impl Directory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account (builder pattern)
    pub fn with_account(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.accounts.insert(email.into(), password.into());
        self
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of known accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if the directory has no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Email of the logged-in account, if any
    pub fn current_user(&self) -> Result<Option<String>> {
        let session = self
            .session
            .lock()
            .map_err(|e| LoginFlowError::Service(format!("session lock poisoned: {}", e)))?;
        Ok(session.clone())
    }

    fn set_session(&self, email: Option<String>) -> Result<()> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| LoginFlowError::Service(format!("session lock poisoned: {}", e)))?;
        *session = email;
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl From<&DirectoryConfig> for Directory {
    fn from(config: &DirectoryConfig) -> Self {
        config
            .accounts
            .iter()
            .fold(Self::new(), |dir, account| dir.with_account(&account.email, &account.password))
            .with_latency(Duration::from_millis(config.latency_ms))
    }
}

#[async_trait]
impl CredentialService for Directory {
    async fn submit(&self, credentials: &Credentials) -> Result<SubmissionStatus> {
        self.simulate_latency().await;

        let status = match self.accounts.get(credentials.email()) {
            None => SubmissionStatus::NotFound,
            Some(password) if password == credentials.password() => SubmissionStatus::Ok,
            Some(_) => SubmissionStatus::Unauthorized,
        };

        if status.is_ok() {
            self.set_session(Some(credentials.email().to_string()))?;
        }
        log::debug!("Directory answered {:?} for {}", status, credentials.email());
        Ok(status)
    }
}

#[async_trait]
impl SessionService for Directory {
    async fn is_user_logged_in(&self) -> Result<bool> {
        Ok(self.current_user()?.is_some())
    }

    async fn logout(&self) -> Result<()> {
        self.simulate_latency().await;
        self.set_session(None)
    }
}

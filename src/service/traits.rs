//! Collaborator service traits

use async_trait::async_trait;

use crate::domain::{Credentials, SubmissionStatus};
use crate::error::Result;

/// Submits credentials and classifies the answer.
///
/// Business outcomes (wrong password, unknown email) are `Ok` statuses; `Err`
/// is reserved for faults where no status was produced.
#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn submit(&self, credentials: &Credentials) -> Result<SubmissionStatus>;
}

/// Session state behind the start screen
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Whether a user is currently logged in
    async fn is_user_logged_in(&self) -> Result<bool>;

    /// End the current session
    async fn logout(&self) -> Result<()>;
}

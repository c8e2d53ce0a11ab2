//! Collaborator services
//!
//! This module provides:
//! - CredentialService trait: submits credentials, answers a SubmissionStatus
//! - SessionService trait: login state and logout for the start screen
//! - Directory: in-memory implementation of both

pub mod directory;
pub mod traits;

pub use directory::Directory;
pub use traits::{CredentialService, SessionService};

//! Credentials submitted to the credential service.

use std::fmt;

/// Immutable identifier/secret pair.
///
/// Only ever built from the field snapshot taken when confirm was pressed, so
/// later edits to the form cannot leak into an in-flight submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create credentials from an email and a password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The account identifier
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The secret
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the secret out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

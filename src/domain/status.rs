//! Submission status returned by the credential service.

/// Outcome classification of a credential submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Credentials accepted
    Ok,
    /// Identifier exists but the secret is wrong
    Unauthorized,
    /// No account with this identifier
    NotFound,
    /// Any other answer, with the service's description
    Other(String),
}

impl SubmissionStatus {
    /// Human-readable description of the status
    pub fn error_description(&self) -> &str {
        match self {
            Self::Ok => "Success",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "Not found",
            Self::Other(description) => description,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

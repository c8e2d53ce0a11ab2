// Field validation - traits
// Core validation interfaces

use crate::error::Result;
use crate::validation::field::FieldSnapshot;
use async_trait::async_trait;

/// Result of validating a set of fields.
///
/// Carries at most one message: the first failing field in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every field passed its rule
    Valid,
    /// A field failed; the message is ready to display
    Invalid(String),
}

impl ValidationResult {
    /// Create a failing result
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Whether validation passed
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::Valid
    }
}

/// Validation collaborator used by the login flow
#[async_trait]
pub trait FieldValidator: Send + Sync {
    /// Validate fields in the supplied order
    ///
    /// # Returns
    /// `Invalid` with the message of the first failing field, `Valid` only when
    /// all fields pass. `Err` means the validator itself could not run.
    async fn validate(&self, fields: &[FieldSnapshot]) -> Result<ValidationResult>;

    /// Get a description of what this validator checks
    fn description(&self) -> &str {
        "field validator"
    }
}

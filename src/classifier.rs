//! Outcome classification
//!
//! Pure mappings from collaborator results into `FlowEvent`. Every match is
//! exhaustive without a wildcard arm, so a new `ValidationResult` or
//! `SubmissionStatus` variant does not compile until it is classified here.

use crate::domain::{FailureKind, FlowEvent, SubmissionStatus};
use crate::validation::ValidationResult;

pub const WRONG_PASSWORD: &str = "Wrong password";
pub const EMAIL_NOT_FOUND: &str = "Email does not exist";

/// Map a validation pass onto the flow.
pub fn classify_validation(result: ValidationResult) -> FlowEvent {
    match result {
        ValidationResult::Valid => FlowEvent::ValidationPassed,
        ValidationResult::Invalid(message) => FlowEvent::Failed(message),
    }
}

/// Map a submission status onto the flow.
pub fn classify_submission(status: SubmissionStatus) -> FlowEvent {
    match status {
        SubmissionStatus::Ok => FlowEvent::LoginSucceeded,
        SubmissionStatus::Unauthorized => FlowEvent::Failed(WRONG_PASSWORD.to_string()),
        SubmissionStatus::NotFound => FlowEvent::Failed(EMAIL_NOT_FOUND.to_string()),
        SubmissionStatus::Other(description) => FlowEvent::Failed(description),
    }
}

/// Failure taxonomy of a submission status; `None` when it succeeded.
pub fn submission_failure_kind(status: &SubmissionStatus) -> Option<FailureKind> {
    match status {
        SubmissionStatus::Ok => None,
        SubmissionStatus::Unauthorized => Some(FailureKind::Auth),
        SubmissionStatus::NotFound => Some(FailureKind::NotFound),
        SubmissionStatus::Other(_) => Some(FailureKind::Unknown),
    }
}

/// Failure taxonomy of a validation result; `None` when it passed.
pub fn validation_failure_kind(result: &ValidationResult) -> Option<FailureKind> {
    match result {
        ValidationResult::Valid => None,
        ValidationResult::Invalid(_) => Some(FailureKind::Validation),
    }
}

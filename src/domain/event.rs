//! Flow event types.
//!
//! `FlowEvent` is the one event type the login flow produces. Validation and
//! submission results are both mapped into it before they are merged.

/// Message used whenever a collaborator faults instead of answering.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Event produced by a confirm action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Confirm was pressed and work has started
    Loading,
    /// All fields passed validation; routes the action to submission.
    /// Never delivered to subscribers.
    ValidationPassed,
    /// The credential service accepted the credentials
    LoginSucceeded,
    /// The action ended with a displayable message
    Failed(String),
}

impl FlowEvent {
    /// Failure event for a collaborator fault
    pub fn unknown_error() -> Self {
        Self::Failed(UNKNOWN_ERROR.to_string())
    }

    /// Whether this event ends an action
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::LoginSucceeded | Self::Failed(_))
    }

    pub fn is_validation_passed(&self) -> bool {
        matches!(self, Self::ValidationPassed)
    }

    pub fn is_login_succeeded(&self) -> bool {
        matches!(self, Self::LoginSucceeded)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure message, if this is a failure
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::ValidationPassed => "validation_passed",
            Self::LoginSucceeded => "login_succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A field did not pass its rule; the user can fix it
    Validation,
    /// Wrong credentials
    Auth,
    /// Unknown identifier
    NotFound,
    /// Anything unclassified, including collaborator faults
    Unknown,
}

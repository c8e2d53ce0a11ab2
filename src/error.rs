//! Error types for loginflow
//!
//! Collaborator faults travel as `LoginFlowError`. The flow controllers never
//! let them escape: they are logged and turned into an "Unknown error" event.

use thiserror::Error;

/// All error types that can occur in loginflow
#[derive(Debug, Error)]
pub enum LoginFlowError {
    /// The remote call never produced a status (network, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A collaborator service failed internally
    #[error("Service error: {0}")]
    Service(String),

    /// The validator itself could not run
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for loginflow operations
pub type Result<T> = std::result::Result<T, LoginFlowError>;

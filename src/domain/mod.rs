//! Domain types for loginflow
//!
//! This module contains the transient values threaded through one confirm action:
//! - Credentials: identifier/secret pair built from a field snapshot
//! - FlowEvent: the single event type merged by the login flow
//! - SubmissionStatus: what the credential service answered
//! - Scene: navigation targets of the start screen

pub mod credentials;
pub mod event;
pub mod scene;
pub mod status;

pub use credentials::Credentials;
pub use event::{FailureKind, FlowEvent, UNKNOWN_ERROR};
pub use scene::Scene;
pub use status::SubmissionStatus;

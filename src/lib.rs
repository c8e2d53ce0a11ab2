//! loginflow - reactive login form flow
//!
//! Turns confirm presses and form field text into success, failure and
//! loading streams. Fields are validated, credentials submitted, results
//! classified, and a newer confirm press always supersedes an older one.

pub mod classifier;
pub mod config;
pub mod domain;
pub mod error;
pub mod flow;
pub mod service;
pub mod validation;

pub use error::{LoginFlowError, Result};

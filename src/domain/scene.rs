//! Navigation targets reachable from the start screen.

use std::fmt;

/// A screen the start screen can transition to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Login,
    Dashboard,
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Dashboard => write!(f, "dashboard"),
        }
    }
}

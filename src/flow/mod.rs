//! Flow controllers
//!
//! Turn view input (button presses, field text) into outcome streams:
//! - LoginFlowController: validate → submit → classify, latest action wins
//! - StartScreenController: navigation transitions and logout
//!
//! Each controller runs one driver task that owns all of its state. Stage
//! work runs in per-action tasks whose results are funneled back to the
//! driver, so filtering and merging never race.

pub mod field;
pub mod latest;
pub mod login;
pub mod projection;
pub mod start;

pub use field::TextField;
pub use latest::LatestTask;
pub use login::{EMAIL_LABEL, LoginFlowController, LoginInput, LoginOutput, LoginSnapshot, PASSWORD_LABEL};
pub use projection::Projection;
pub use start::{StartScreenController, StartScreenInput, StartScreenOutput};

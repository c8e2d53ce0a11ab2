// Field validation
// Snapshots of form fields, the rules attached to them, and the validator
// collaborator that checks them in order.

pub mod field;
pub mod rules;
pub mod traits;

pub use field::{FieldSnapshot, ValidationRule};
pub use rules::RuleValidator;
pub use traits::{FieldValidator, ValidationResult};

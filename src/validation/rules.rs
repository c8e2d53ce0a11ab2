// Field validation - rule validator
// Checks each field's own rule, stopping at the first failure

use crate::error::Result;
use crate::validation::field::FieldSnapshot;
use crate::validation::traits::{FieldValidator, ValidationResult};
use async_trait::async_trait;

/// Default validator: evaluates fields in the order given and reports only
/// the first failing one.
pub struct RuleValidator {
    description: String,
}

impl RuleValidator {
    /// Create a new rule validator
    pub fn new() -> Self {
        Self {
            description: "rule validator".to_string(),
        }
    }

    /// Create a rule validator with a custom description
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Synchronous core of `validate`
    pub fn check_all(fields: &[FieldSnapshot]) -> ValidationResult {
        match first_failure(fields) {
            Some((_, message)) => ValidationResult::Invalid(message),
            None => ValidationResult::Valid,
        }
    }
}

fn first_failure(fields: &[FieldSnapshot]) -> Option<(&FieldSnapshot, String)> {
    fields
        .iter()
        .find_map(|field| field.check().map(|message| (field, message)))
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FieldValidator for RuleValidator {
    async fn validate(&self, fields: &[FieldSnapshot]) -> Result<ValidationResult> {
        match first_failure(fields) {
            Some((field, message)) => {
                log::debug!(
                    "{}: field '{}' failed rule '{}': {}",
                    self.description,
                    field.label,
                    field.rule.name(),
                    message
                );
                Ok(ValidationResult::Invalid(message))
            }
            None => Ok(ValidationResult::Valid),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::field::ValidationRule;

    fn login_fields(email: &str, password: &str) -> Vec<FieldSnapshot> {
        vec![
            FieldSnapshot::new("Email", email, ValidationRule::Email),
            FieldSnapshot::new("Password", password, ValidationRule::NonEmpty),
        ]
    }

    #[tokio::test]
    async fn test_all_valid() {
        let validator = RuleValidator::new();
        let result = validator.validate(&login_fields("user@test.com", "pw")).await.unwrap();
        assert_eq!(result, ValidationResult::Valid);
    }

    #[tokio::test]
    async fn test_password_missing() {
        let validator = RuleValidator::new();
        let result = validator.validate(&login_fields("user@test.com", "")).await.unwrap();
        assert_eq!(result, ValidationResult::invalid("Password is required"));
    }

    #[tokio::test]
    async fn test_first_failure_wins() {
        let validator = RuleValidator::new();
        let result = validator.validate(&login_fields("not-an-email", "")).await.unwrap();
        assert_eq!(result, ValidationResult::invalid("Email is not a valid email address"));
    }

    #[tokio::test]
    async fn test_order_is_respected() {
        let validator = RuleValidator::new();
        let mut fields = login_fields("not-an-email", "");
        fields.reverse();
        let result = validator.validate(&fields).await.unwrap();
        assert_eq!(result, ValidationResult::invalid("Password is required"));
    }

    #[test]
    fn test_first_failure_names_field_and_rule() {
        let fields = login_fields("user@test.com", " ");
        let (field, message) = first_failure(&fields).unwrap();
        assert_eq!(field.label, "Password");
        assert_eq!(field.rule.name(), "non-empty");
        assert_eq!(message, "Password is required");
        assert!(first_failure(&login_fields("user@test.com", "pw")).is_none());
    }

    #[tokio::test]
    async fn test_no_fields_is_valid() {
        let validator = RuleValidator::default();
        assert!(validator.validate(&[]).await.unwrap().is_valid());
    }

    #[test]
    fn test_description() {
        assert_eq!(RuleValidator::new().description(), "rule validator");
        assert_eq!(RuleValidator::with_description("login form").description(), "login form");
    }
}

// Field validation - field snapshots and rules

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Rule a field value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Value must contain something other than whitespace
    NonEmpty,
    /// Value must be present and look like `local@domain.tld`
    Email,
}

impl ValidationRule {
    /// Check a value, returning the message to show when it fails
    pub fn check(&self, label: &str, value: &str) -> Option<String> {
        if value.trim().is_empty() {
            return Some(format!("{} is required", label));
        }

        match self {
            Self::NonEmpty => None,
            Self::Email if EMAIL_PATTERN.is_match(value) => None,
            Self::Email => Some(format!("{} is not a valid email address", label)),
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::NonEmpty => "non-empty",
            Self::Email => "email",
        }
    }
}

/// Immutable copy of a form field taken when confirm was pressed.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
    /// Label used in error messages ("Email", "Password")
    pub label: String,
    /// Text exactly as the user entered it
    pub raw_value: String,
    /// Rule the value must satisfy
    pub rule: ValidationRule,
}

impl FieldSnapshot {
    /// Create a new field snapshot
    pub fn new(label: impl Into<String>, raw_value: impl Into<String>, rule: ValidationRule) -> Self {
        Self {
            label: label.into(),
            raw_value: raw_value.into(),
            rule,
        }
    }

    /// Check this field against its rule
    pub fn check(&self) -> Option<String> {
        self.rule.check(&self.label, &self.raw_value)
    }
}

// Snapshots may hold a password.
impl std::fmt::Debug for FieldSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSnapshot")
            .field("label", &self.label)
            .field("len", &self.raw_value.len())
            .field("rule", &self.rule)
            .finish()
    }
}

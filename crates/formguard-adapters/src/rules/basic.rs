//! Length and equality rules.

use formguard_core::{
    application::ValidationRule,
    domain::{CheckError, DomainError, ValidationResult},
};

/// Fails on empty or whitespace-only content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyRule;

impl NonEmptyRule {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationRule for NonEmptyRule {
    fn name(&self) -> &str {
        "non-empty"
    }

    fn validate(&self, content: &str) -> ValidationResult {
        ValidationResult::check(!content.trim().is_empty(), || {
            CheckError::new("empty", "a value is required")
        })
    }
}

/// Bounds the number of characters (not bytes).
#[derive(Debug, Clone, Copy)]
pub struct LengthRule {
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthRule {
    /// # Errors
    /// [`DomainError::InvalidRule`] when both bounds are missing or `min > max`.
    pub fn new(min: Option<usize>, max: Option<usize>) -> Result<Self, DomainError> {
        match (min, max) {
            (None, None) => Err(DomainError::InvalidRule {
                rule: "length".into(),
                reason: "at least one of min or max is required".into(),
            }),
            (Some(lo), Some(hi)) if lo > hi => Err(DomainError::InvalidRule {
                rule: "length".into(),
                reason: format!("min ({lo}) is greater than max ({hi})"),
            }),
            _ => Ok(Self { min, max }),
        }
    }

    pub fn min(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn max(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }
}

impl ValidationRule for LengthRule {
    fn name(&self) -> &str {
        "length"
    }

    fn validate(&self, content: &str) -> ValidationResult {
        let len = content.chars().count();

        if let Some(min) = self.min.filter(|&min| len < min) {
            return ValidationResult::fail(CheckError::new(
                "too-short",
                format!("must be at least {min} characters (got {len})"),
            ));
        }
        if let Some(max) = self.max.filter(|&max| len > max) {
            return ValidationResult::fail(CheckError::new(
                "too-long",
                format!("must be at most {max} characters (got {len})"),
            ));
        }
        ValidationResult::pass()
    }
}

/// Content must equal a fixed string.
#[derive(Debug, Clone)]
pub struct EqualsRule {
    expected: String,
    case_sensitive: bool,
}

impl EqualsRule {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            case_sensitive: true,
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

impl ValidationRule for EqualsRule {
    fn name(&self) -> &str {
        "equals"
    }

    fn validate(&self, content: &str) -> ValidationResult {
        let matches = if self.case_sensitive {
            content == self.expected
        } else {
            content.to_lowercase() == self.expected.to_lowercase()
        };
        ValidationResult::check(matches, || {
            CheckError::new("mismatch", "does not match the expected value")
        })
    }
}

//! Regular-expression rules.

use std::sync::OnceLock;

use formguard_core::{
    application::ValidationRule,
    domain::{CheckError, DomainError, ValidationResult},
};
use regex::Regex;

/// Content must match a regular expression.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
}

impl PatternRule {
    /// # Errors
    /// [`DomainError::InvalidRule`] if `pattern` does not compile.
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        Self::named("pattern", pattern)
    }

    /// A pattern rule reported under `name` in error maps.
    pub fn named(name: impl Into<String>, pattern: &str) -> Result<Self, DomainError> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| DomainError::InvalidRule {
            rule: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { name, regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl ValidationRule for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, content: &str) -> ValidationResult {
        ValidationResult::check(self.regex.is_match(content), || {
            CheckError::new(
                "no-match",
                format!("does not match pattern {}", self.regex.as_str()),
            )
        })
    }
}

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

/// Content must look like an e-mail address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailRule;

impl EmailRule {
    pub fn new() -> Self {
        Self
    }
}

impl ValidationRule for EmailRule {
    fn name(&self) -> &str {
        "email"
    }

    fn validate(&self, content: &str) -> ValidationResult {
        ValidationResult::check(email_regex().is_match(content.trim()), || {
            CheckError::new("invalid-email", "is not a valid e-mail address")
        })
    }
}

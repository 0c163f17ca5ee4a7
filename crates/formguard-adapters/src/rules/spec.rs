//! Declarative rule descriptions.
//!
//! A [`RuleSpec`] is the serialized form of a built-in rule as it appears in
//! form files:
//!
//! ```toml
//! rules = [
//!     { type = "non-empty" },
//!     { type = "length", min = 3, max = 20 },
//!     { type = "pattern", regex = "^[a-z]+$", name = "lowercase" },
//! ]
//! ```

use std::sync::Arc;

use formguard_core::{application::ValidationRule, domain::DomainError};
use serde::{Deserialize, Serialize};

use super::{EmailRule, EqualsRule, LengthRule, NonEmptyRule, PatternRule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RuleSpec {
    NonEmpty,
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    Pattern {
        regex: String,
        #[serde(default)]
        name: Option<String>,
    },
    Email,
    Equals {
        value: String,
        #[serde(default = "default_case_sensitive")]
        case_sensitive: bool,
    },
}

fn default_case_sensitive() -> bool {
    true
}

impl RuleSpec {
    /// Instantiate the described rule.
    ///
    /// # Errors
    /// [`DomainError::InvalidRule`] for bad bounds or a pattern that does not compile.
    pub fn build(&self) -> Result<Arc<dyn ValidationRule>, DomainError> {
        let rule: Arc<dyn ValidationRule> = match self {
            Self::NonEmpty => Arc::new(NonEmptyRule::new()),
            Self::Length { min, max } => Arc::new(LengthRule::new(*min, *max)?),
            Self::Pattern { regex, name } => Arc::new(match name {
                Some(name) => PatternRule::named(name.clone(), regex)?,
                None => PatternRule::new(regex)?,
            }),
            Self::Email => Arc::new(EmailRule::new()),
            Self::Equals {
                value,
                case_sensitive,
            } => {
                let rule = EqualsRule::new(value.clone());
                Arc::new(if *case_sensitive {
                    rule
                } else {
                    rule.case_insensitive()
                })
            }
        };
        Ok(rule)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NonEmpty => "non-empty",
            Self::Length { .. } => "length",
            Self::Pattern { .. } => "pattern",
            Self::Email => "email",
            Self::Equals { .. } => "equals",
        }
    }
}

/// Build every rule in `specs`, stopping at the first invalid one.
pub fn build_all(specs: &[RuleSpec]) -> Result<Vec<Arc<dyn ValidationRule>>, DomainError> {
    specs.iter().map(RuleSpec::build).collect()
}

/// Catalog entry describing one built-in rule type.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub parameters: &'static [&'static str],
    pub description: &'static str,
}

const CATALOG: &[RuleInfo] = &[
    RuleInfo {
        type_name: "non-empty",
        parameters: &[],
        description: "Rejects empty or whitespace-only content",
    },
    RuleInfo {
        type_name: "length",
        parameters: &["min", "max"],
        description: "Bounds the character count; at least one bound is required",
    },
    RuleInfo {
        type_name: "pattern",
        parameters: &["regex", "name"],
        description: "Content must match the regular expression",
    },
    RuleInfo {
        type_name: "email",
        parameters: &[],
        description: "Content must look like an e-mail address",
    },
    RuleInfo {
        type_name: "equals",
        parameters: &["value", "case_sensitive"],
        description: "Content must equal a fixed value",
    },
];

/// All built-in rule types, in display order.
pub fn catalog() -> &'static [RuleInfo] {
    CATALOG
}

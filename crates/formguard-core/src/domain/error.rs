// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Domain errors are misconfigurations caught at construction or registration
/// time. A failing validation check is NOT an error; it is reported through
/// [`UnitStatus`](crate::domain::UnitStatus).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid unit identifier: {reason}")]
    InvalidIdentifier { reason: String },

    #[error("Invalid event name: {0}")]
    InvalidEventName(String),

    #[error("Invalid rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("{kind} sources have no default change event; an event name is required")]
    MissingChangeEvent { kind: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidIdentifier { reason } => vec![
                format!("Identifier rejected: {}", reason),
                "Use a non-empty identifier, or omit it to have one generated".into(),
            ],
            Self::InvalidEventName(name) => vec![
                format!("Event name '{}' is not usable", name),
                "Event names must contain at least one non-whitespace character".into(),
            ],
            Self::InvalidRule { rule, .. } => vec![
                format!("Check the configuration of rule '{}'", rule),
                "Try: formguard rules to see the supported rule types".into(),
            ],
            Self::MissingChangeEvent { kind } => vec![
                format!("Registering a {} requires the name of its change event", kind),
                "Pass the event the object posts when its content changes".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidIdentifier { .. } | Self::InvalidEventName(_) | Self::InvalidRule { .. } => {
                ErrorCategory::Validation
            }
            Self::MissingChangeEvent { .. } => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
}

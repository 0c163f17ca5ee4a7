//! Application layer errors.
//!
//! These errors represent failures in orchestration, not misconfiguration.
//! Misconfiguration errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while the manager coordinates units and sources.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A lock was poisoned by a panic in a rule or handler.
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },

    /// An input source refused a change-event subscription.
    #[error("Failed to subscribe to '{event}': {reason}")]
    SubscriptionFailed { event: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::LockPoisoned { resource } => vec![
                format!("The {} lock was poisoned by an earlier panic", resource),
                "A validation rule or change handler panicked; check its implementation".into(),
            ],
            Self::SubscriptionFailed { event, .. } => vec![
                format!("The input source did not accept a '{}' subscription", event),
                "Make sure the source is still alive and supports that event".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LockPoisoned { .. } | Self::SubscriptionFailed { .. } => ErrorCategory::Internal,
        }
    }
}

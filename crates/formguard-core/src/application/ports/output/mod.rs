//! Driven (output) ports - implemented by adapters.

use std::fmt;
use std::sync::Arc;

use crate::domain::{EventName, ValidationResult};
use crate::error::FormguardResult;

/// Callback invoked by an input source when its content changes.
pub type ChangeHandler = Arc<dyn Fn() + Send + Sync>;

/// Token returned by [`InputSource::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Port for anything whose content can be validated and watched.
///
/// Implemented by:
/// - `formguard_adapters::MemoryTextField` / `MemoryTextView` (text inputs)
/// - `formguard_adapters::ObservableObject` (arbitrary named events)
///
/// ## Contract
///
/// - `subscribe` must not invoke `handler` synchronously
/// - handlers must be invoked without holding any lock the handler could need;
///   the manager reads `content()` from inside the handler
/// - `content()` may be called from any thread that delivers a change event
pub trait InputSource: Send + Sync {
    /// Current content as text.
    fn content(&self) -> String;

    /// Register `handler` for `event`.
    fn subscribe(&self, event: &EventName, handler: ChangeHandler)
    -> FormguardResult<SubscriptionHandle>;

    /// Remove a subscription. Unknown handles are ignored.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Port for a single validation check.
///
/// Implemented by:
/// - `formguard_adapters::rules::{NonEmptyRule, LengthRule, PatternRule, EmailRule, EqualsRule}`
///
/// ## Contract
///
/// - `validate` runs without any manager or unit lock held, so a rule may
///   query the manager (e.g. compare against another unit's source)
/// - `validate` must not trigger re-validation of its own unit
pub trait ValidationRule: Send + Sync {
    /// Check name; keys the unit's error map.
    fn name(&self) -> &str;

    /// Validate `content`.
    fn validate(&self, content: &str) -> ValidationResult;
}

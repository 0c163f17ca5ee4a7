//! Built-in [`ValidationRule`](formguard_core::application::ValidationRule)
//! implementations.

mod basic;
mod pattern;
mod spec;

pub use basic::{EqualsRule, LengthRule, NonEmptyRule};
pub use pattern::{EmailRule, PatternRule};
pub use spec::{RuleInfo, RuleSpec, build_all, catalog};

//! Infrastructure adapters for formguard.
//!
//! This crate implements the ports defined in `formguard-core::application::ports`:
//! in-memory input sources, the built-in rule set, and the TOML form loader.

pub mod form_loader;
pub mod rules;
pub mod source;

// Re-export commonly used adapters
pub use form_loader::{FormDefinition, FormLoadError, FormLoader, MountedForm, MountedInput};
pub use rules::{EmailRule, EqualsRule, LengthRule, NonEmptyRule, PatternRule, RuleSpec};
pub use source::{ChangeNotifier, MemoryTextField, MemoryTextView, ObservableObject};

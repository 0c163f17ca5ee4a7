//! Unit identifiers.
//!
//! A [`UnitId`] is an opaque, non-empty string unique within one
//! [`ValidationManager`](crate::application::ValidationManager). Callers may
//! supply their own (`"email"`, `"password-confirm"`) or let the registry
//! generate one.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Identifier of a registered validation unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitId(String);

impl UnitId {
    /// Create an identifier from caller-supplied text.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidIdentifier`] if `value` is empty or
    /// whitespace only.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier {
                reason: "identifier must not be empty".into(),
            });
        }
        Ok(Self(value))
    }

    /// Generate a random identifier (UUID v4, simple form).
    ///
    /// Uniqueness against a particular key set is the caller's job; see
    /// [`UnitId::generate_unique`].
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Generate an identifier for which `is_taken` returns `false`.
    ///
    /// Samples until a free identifier is found.
    pub fn generate_unique(mut is_taken: impl FnMut(&UnitId) -> bool) -> Self {
        loop {
            let candidate = Self::generate();
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<UnitId, _>` be queried with a plain `&str`.
impl Borrow<str> for UnitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for UnitId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UnitId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UnitId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UnitId> for String {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

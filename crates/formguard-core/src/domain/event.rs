//! Change-event names and input-source kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Name of the "content changed" event an input source emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventName(String);

impl EventName {
    pub const TEXT_FIELD_DID_CHANGE: &'static str = "text-field-did-change";
    pub const TEXT_VIEW_DID_CHANGE: &'static str = "text-view-did-change";

    /// # Errors
    /// Returns [`DomainError::InvalidEventName`] for empty or blank names.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidEventName(name));
        }
        Ok(Self(name))
    }

    pub fn text_field_did_change() -> Self {
        Self(Self::TEXT_FIELD_DID_CHANGE.to_owned())
    }

    pub fn text_view_did_change() -> Self {
        Self(Self::TEXT_VIEW_DID_CHANGE.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EventName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.0
    }
}

/// The kind of input source a unit is bound to.
///
/// Only the kind decides the default change event; the manager treats every
/// source through the same [`InputSource`](crate::application::ports::InputSource) port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    TextField,
    TextView,
    Object,
}

impl SourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TextField => "text-field",
            Self::TextView => "text-view",
            Self::Object => "object",
        }
    }

    /// The event a source of this kind emits when none is specified.
    ///
    /// Generic objects have no default.
    pub fn default_event(self) -> Option<EventName> {
        match self {
            Self::TextField => Some(EventName::text_field_did_change()),
            Self::TextView => Some(EventName::text_view_did_change()),
            Self::Object => None,
        }
    }

    /// Pick the event to subscribe to: the explicit one, else the default.
    ///
    /// # Errors
    /// [`DomainError::MissingChangeEvent`] when neither exists.
    pub fn resolve_event(self, explicit: Option<EventName>) -> Result<EventName, DomainError> {
        explicit
            .or_else(|| self.default_event())
            .ok_or_else(|| DomainError::MissingChangeEvent {
                kind: self.as_str().to_owned(),
            })
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! In-memory text inputs.
//!
//! [`MemoryTextField`] and [`MemoryTextView`] stand in for a toolkit's
//! single-line and multi-line text widgets. Setting their text posts the
//! toolkit-default change event.

use std::sync::{PoisonError, RwLock};

use formguard_core::{
    application::{ChangeHandler, InputSource, SubscriptionHandle},
    domain::EventName,
    error::FormguardResult,
};

use crate::source::ChangeNotifier;

struct TextBuffer {
    text: RwLock<String>,
    event: EventName,
    notifier: ChangeNotifier,
}

impl TextBuffer {
    fn new(text: impl Into<String>, event: EventName) -> Self {
        Self {
            text: RwLock::new(text.into()),
            event,
            notifier: ChangeNotifier::new(),
        }
    }

    fn post_as(mut self, event: EventName) -> Self {
        self.event = event;
        self
    }

    fn text(&self) -> String {
        self.text
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_text(&self, text: impl Into<String>) -> usize {
        // Lock released before notifying: handlers read the text back.
        *self.text.write().unwrap_or_else(PoisonError::into_inner) = text.into();
        self.notifier.notify(&self.event)
    }
}

/// Single-line text input.
pub struct MemoryTextField {
    buffer: TextBuffer,
}

impl MemoryTextField {
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Field with initial text; no event is posted.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            buffer: TextBuffer::new(text, EventName::text_field_did_change()),
        }
    }

    /// Post `event` on change instead of `text-field-did-change`.
    pub fn posting(self, event: EventName) -> Self {
        Self {
            buffer: self.buffer.post_as(event),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Replace the text and post the field's change event.
    ///
    /// Returns the number of handlers notified.
    pub fn set_text(&self, text: impl Into<String>) -> usize {
        self.buffer.set_text(text)
    }

    pub fn subscriber_count(&self) -> usize {
        self.buffer.notifier.subscriber_count()
    }
}

impl Default for MemoryTextField {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for MemoryTextField {
    fn content(&self) -> String {
        self.buffer.text()
    }

    fn subscribe(
        &self,
        event: &EventName,
        handler: ChangeHandler,
    ) -> FormguardResult<SubscriptionHandle> {
        self.buffer.notifier.subscribe(event, handler)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.buffer.notifier.unsubscribe(handle);
    }
}

/// Multi-line text input.
pub struct MemoryTextView {
    buffer: TextBuffer,
}

impl MemoryTextView {
    pub fn new() -> Self {
        Self::with_text("")
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            buffer: TextBuffer::new(text, EventName::text_view_did_change()),
        }
    }

    pub fn posting(self, event: EventName) -> Self {
        Self {
            buffer: self.buffer.post_as(event),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Replace the text and post the view's change event.
    pub fn set_text(&self, text: impl Into<String>) -> usize {
        self.buffer.set_text(text)
    }

    /// Append a line, as a user pressing return and typing would.
    pub fn append_line(&self, line: &str) -> usize {
        let mut text = self.buffer.text();
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
        self.buffer.set_text(text)
    }

    pub fn subscriber_count(&self) -> usize {
        self.buffer.notifier.subscriber_count()
    }
}

impl Default for MemoryTextView {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for MemoryTextView {
    fn content(&self) -> String {
        self.buffer.text()
    }

    fn subscribe(
        &self,
        event: &EventName,
        handler: ChangeHandler,
    ) -> FormguardResult<SubscriptionHandle> {
        self.buffer.notifier.subscribe(event, handler)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.buffer.notifier.unsubscribe(handle);
    }
}

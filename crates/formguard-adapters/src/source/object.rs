//! Generic observable object.
//!
//! Unlike the text inputs, an object has no default change event: it posts
//! whatever event names its owner chooses, so it must be registered with an
//! explicit event name.

use std::sync::{PoisonError, RwLock};

use formguard_core::{
    application::{ChangeHandler, InputSource, SubscriptionHandle},
    domain::EventName,
    error::FormguardResult,
};

use crate::source::ChangeNotifier;

pub struct ObservableObject {
    content: RwLock<String>,
    notifier: ChangeNotifier,
}

impl ObservableObject {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RwLock::new(content.into()),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Replace the content without posting anything.
    pub fn set_content(&self, content: impl Into<String>) {
        *self.content.write().unwrap_or_else(PoisonError::into_inner) = content.into();
    }

    /// Post `event`; returns the number of handlers notified.
    pub fn post(&self, event: &EventName) -> usize {
        self.notifier.notify(event)
    }

    /// Replace the content, then post `event`.
    pub fn update(&self, content: impl Into<String>, event: &EventName) -> usize {
        self.set_content(content);
        self.post(event)
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }
}

impl InputSource for ObservableObject {
    fn content(&self) -> String {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(
        &self,
        event: &EventName,
        handler: ChangeHandler,
    ) -> FormguardResult<SubscriptionHandle> {
        self.notifier.subscribe(event, handler)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.notifier.unsubscribe(handle);
    }
}

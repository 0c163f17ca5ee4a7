//! Named change-event fan-out shared by the in-memory sources.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use formguard_core::{
    application::{ApplicationError, ChangeHandler, SubscriptionHandle},
    domain::EventName,
    error::FormguardResult,
};
use tracing::trace;

struct Subscriber {
    handle: SubscriptionHandle,
    event: EventName,
    handler: ChangeHandler,
}

/// Thread-safe list of change handlers keyed by event name.
///
/// Handlers are called after the subscriber lock is released, so a handler
/// may subscribe, unsubscribe, or read the source that notified it.
pub struct ChangeNotifier {
    subscribers: RwLock<Vec<Subscriber>>,
    next_handle: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn subscribe(
        &self,
        event: &EventName,
        handler: ChangeHandler,
    ) -> FormguardResult<SubscriptionHandle> {
        let handle = SubscriptionHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self
            .subscribers
            .write()
            .map_err(|_| ApplicationError::LockPoisoned { resource: "notifier" })?;

        subscribers.push(Subscriber {
            handle,
            event: event.clone(),
            handler,
        });
        trace!(%event, %handle, "subscribed");
        Ok(handle)
    }

    /// Returns `false` if `handle` was unknown.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|s| s.handle != handle);
        subscribers.len() != before
    }

    /// Invoke every handler subscribed to `event`; returns how many ran.
    pub fn notify(&self, event: &EventName) -> usize {
        let handlers: Vec<ChangeHandler> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| &s.event == event)
            .map(|s| s.handler.clone())
            .collect();

        trace!(%event, handlers = handlers.len(), "notifying");
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

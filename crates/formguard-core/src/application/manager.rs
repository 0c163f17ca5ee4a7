//! Validation Manager - the public façade.
//!
//! Coordinates the whole flow:
//! 1. Wire an input source's change event to its unit
//! 2. On change: evaluate the unit, recompute the aggregated status
//! 3. Publish the status to every observer
//!
//! Registry, wiring table and last status live behind one lock so that
//! add/remove/recompute are atomic with respect to each other. Observers run
//! after that lock is released and may call back into the manager. Sources
//! are read and rules run outside the lock too.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{
    Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};

use tracing::{debug, info, instrument, trace, warn};

use crate::{
    application::{
        ApplicationError,
        aggregator::StatusAggregator,
        ports::{ChangeHandler, InputSource, SubscriptionHandle, ValidationRule},
        registry::ValidationRegistry,
        unit::ValidationUnit,
    },
    domain::{AggregatedStatus, EventName, SourceKind, UnitId, UnitStatus},
    error::FormguardResult,
};

/// Callback receiving every published [`AggregatedStatus`].
pub type StatusObserver = Arc<dyn Fn(&AggregatedStatus) + Send + Sync>;

/// Token returned by [`ValidationManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registers validation units and publishes their combined status.
///
/// Cloning yields another handle to the same manager. Dropping the last
/// handle unsubscribes every change event the manager wired.
#[derive(Clone)]
pub struct ValidationManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    state: RwLock<ManagerState>,
    overall_valid: AtomicBool,
    observers: RwLock<Vec<(ObserverId, StatusObserver)>>,
    next_observer: AtomicU64,
}

#[derive(Default)]
struct ManagerState {
    registry: ValidationRegistry,
    wiring: HashMap<UnitId, Wiring>,
    status: AggregatedStatus,
}

/// A change-event subscription the manager made on a unit's behalf.
struct Wiring {
    source: Arc<dyn InputSource>,
    event: EventName,
    handle: SubscriptionHandle,
}

impl Wiring {
    fn detach(self) {
        trace!(event = %self.event, handle = %self.handle, "unsubscribing change event");
        self.source.unsubscribe(self.handle);
    }
}

impl ValidationManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                state: RwLock::new(ManagerState::default()),
                overall_valid: AtomicBool::new(true),
                observers: RwLock::new(Vec::new()),
                next_observer: AtomicU64::new(1),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a text field, listening to `text-field-did-change`.
    pub fn register_text_field(
        &self,
        source: Arc<dyn InputSource>,
        rules: Vec<Arc<dyn ValidationRule>>,
        identifier: Option<UnitId>,
    ) -> FormguardResult<Arc<ValidationUnit>> {
        self.register_source(SourceKind::TextField, source, rules, None, identifier)
    }

    /// Register a multi-line text view, listening to `text-view-did-change`.
    pub fn register_text_view(
        &self,
        source: Arc<dyn InputSource>,
        rules: Vec<Arc<dyn ValidationRule>>,
        identifier: Option<UnitId>,
    ) -> FormguardResult<Arc<ValidationUnit>> {
        self.register_source(SourceKind::TextView, source, rules, None, identifier)
    }

    /// Register an arbitrary object that posts `event` when its content changes.
    ///
    /// # Errors
    /// [`DomainError::MissingChangeEvent`](crate::domain::DomainError::MissingChangeEvent)
    /// when `event` is empty; objects have no default event.
    pub fn register_object(
        &self,
        source: Arc<dyn InputSource>,
        rules: Vec<Arc<dyn ValidationRule>>,
        event: &str,
        identifier: Option<UnitId>,
    ) -> FormguardResult<Arc<ValidationUnit>> {
        let event = EventName::new(event).ok();
        self.register_source(SourceKind::Object, source, rules, event, identifier)
    }

    /// Register `source` of the given kind, optionally overriding its change event.
    ///
    /// Builds a unit bound to `source`, subscribes to the change event, adds
    /// the unit to the registry, then recomputes and publishes.
    #[instrument(skip_all, fields(kind = %kind))]
    pub fn register_source(
        &self,
        kind: SourceKind,
        source: Arc<dyn InputSource>,
        rules: Vec<Arc<dyn ValidationRule>>,
        event: Option<EventName>,
        identifier: Option<UnitId>,
    ) -> FormguardResult<Arc<ValidationUnit>> {
        let event = kind.resolve_event(event)?;

        let unit = Arc::new(
            ValidationUnit::builder()
                .source(kind, Arc::clone(&source))
                .rules(rules)
                .build(),
        );
        let id = self
            .inner
            .read_state()?
            .registry
            .resolve_identifier(&unit, identifier);

        // Subscribe outside the state lock: a source may deliver events from
        // another thread as soon as the handler is installed.
        let handler = change_handler(Arc::downgrade(&self.inner), id.clone());
        let handle = source.subscribe(&event, handler)?;
        let wiring = Wiring {
            source,
            event,
            handle,
        };

        let (status, replaced) = {
            let mut state = match self.inner.write_state() {
                Ok(state) => state,
                Err(e) => {
                    wiring.detach();
                    return Err(e);
                }
            };
            state.registry.add(Arc::clone(&unit), Some(id.clone()));
            let replaced = state.wiring.insert(id.clone(), wiring);
            (self.inner.commit(&mut state), replaced)
        };

        if let Some(previous) = replaced {
            debug!(unit = %id, "replacing wiring of previous unit");
            previous.detach();
        }

        info!(unit = %id, rules = ?unit.rule_names(), "registered input source");
        self.inner.publish(&status);
        Ok(unit)
    }

    /// Add a pre-built unit without wiring any change event.
    ///
    /// Returns the identifier used (the unit's own, else a generated one).
    pub fn add_unit(&self, unit: Arc<ValidationUnit>) -> FormguardResult<UnitId> {
        self.add_unit_with_identifier(unit, None)
    }

    /// Add a pre-built unit under `identifier`.
    ///
    /// Resolution order: `identifier` > the unit's own identifier > generated.
    #[instrument(skip_all)]
    pub fn add_unit_with_identifier(
        &self,
        unit: Arc<ValidationUnit>,
        identifier: Option<UnitId>,
    ) -> FormguardResult<UnitId> {
        let (id, status, replaced) = {
            let mut state = self.inner.write_state()?;
            let id = state.registry.resolve_identifier(&unit, identifier);
            // Re-adding the unit already stored under `id` keeps its wiring.
            let same = state
                .registry
                .get(id.as_str())
                .is_some_and(|current| Arc::ptr_eq(&current, &unit));
            state.registry.add(unit, Some(id.clone()));
            let replaced = if same { None } else { state.wiring.remove(&id) };
            (id, self.inner.commit(&mut state), replaced)
        };

        if let Some(previous) = replaced {
            previous.detach();
        }

        info!(unit = %id, "added validation unit");
        self.inner.publish(&status);
        Ok(id)
    }

    /// Remove a unit, drop its change wiring, and publish the new status.
    ///
    /// Unknown identifiers are a no-op and publish nothing.
    #[instrument(skip(self))]
    pub fn remove_unit_for_identifier(
        &self,
        identifier: &str,
    ) -> FormguardResult<Option<Arc<ValidationUnit>>> {
        let (removed, wiring, status) = {
            let mut state = self.inner.write_state()?;
            let Some(removed) = state.registry.remove(identifier) else {
                debug!("no unit registered under identifier");
                return Ok(None);
            };
            let wiring = state.wiring.remove(identifier);
            (removed, wiring, self.inner.commit(&mut state))
        };

        if let Some(wiring) = wiring {
            wiring.detach();
        }

        info!("removed validation unit");
        self.inner.publish(&status);
        Ok(Some(removed))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn unit_for_identifier(
        &self,
        identifier: &str,
    ) -> FormguardResult<Option<Arc<ValidationUnit>>> {
        Ok(self.inner.read_state()?.registry.get(identifier))
    }

    /// Overall validity as of the most recent recompute.
    pub fn is_valid(&self) -> bool {
        self.inner.overall_valid.load(Ordering::Acquire)
    }

    /// The most recently published status.
    pub fn status(&self) -> FormguardResult<AggregatedStatus> {
        Ok(self.inner.read_state()?.status.clone())
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> FormguardResult<Vec<UnitId>> {
        let mut ids: Vec<_> = self.inner.read_state()?.registry.ids().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    // -------------------------------------------------------------------------
    // Explicit re-validation
    // -------------------------------------------------------------------------

    /// Re-evaluate one unit against its source's current content.
    pub fn validate_unit(&self, identifier: &str) -> FormguardResult<Option<UnitStatus>> {
        self.inner.revalidate(identifier, |unit| {
            unit.evaluate();
        })
    }

    /// Validate `text` with the rules of the unit registered under `identifier`.
    pub fn validate_text(
        &self,
        identifier: &str,
        text: &str,
    ) -> FormguardResult<Option<UnitStatus>> {
        self.inner.revalidate(identifier, |unit| {
            unit.evaluate_text(text);
        })
    }

    /// Re-evaluate every unit, then publish once.
    #[instrument(skip_all)]
    pub fn validate_all(&self) -> FormguardResult<AggregatedStatus> {
        let units: Vec<Arc<ValidationUnit>> = self
            .inner
            .read_state()?
            .registry
            .iter()
            .map(|(_, unit)| Arc::clone(unit))
            .collect();
        // Rules run outside the state lock so they may query the manager.
        for unit in &units {
            unit.evaluate();
        }
        let status = self.inner.commit(&mut *self.inner.write_state()?);
        self.inner.publish(&status);
        Ok(status)
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Receive every published status until [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(
        &self,
        observer: impl Fn(&AggregatedStatus) + Send + Sync + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.inner.next_observer.fetch_add(1, Ordering::Relaxed));
        write(&self.inner.observers).push((id, Arc::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = write(&self.inner.observers);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        read(&self.inner.observers).len()
    }
}

impl Default for ValidationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationManager")
            .field("is_valid", &self.is_valid())
            .field("identifiers", &self.identifiers().unwrap_or_default())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl ManagerInner {
    fn read_state(&self) -> FormguardResult<RwLockReadGuard<'_, ManagerState>> {
        self.state
            .read()
            .map_err(|_| ApplicationError::LockPoisoned { resource: "registry" }.into())
    }

    fn write_state(&self) -> FormguardResult<RwLockWriteGuard<'_, ManagerState>> {
        self.state
            .write()
            .map_err(|_| ApplicationError::LockPoisoned { resource: "registry" }.into())
    }

    /// Recompute from the registry and store the result.
    fn commit(&self, state: &mut ManagerState) -> AggregatedStatus {
        let status = StatusAggregator::recompute(&state.registry);
        self.overall_valid
            .store(status.overall_valid, Ordering::Release);
        state.status = status.clone();
        status
    }

    fn publish(&self, status: &AggregatedStatus) {
        let observers: Vec<StatusObserver> = read(&self.observers)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        trace!(
            observers = observers.len(),
            overall_valid = status.overall_valid,
            "publishing status"
        );
        for observer in observers {
            observer(status);
        }
    }

    fn revalidate(
        &self,
        identifier: &str,
        evaluate: impl FnOnce(&ValidationUnit),
    ) -> FormguardResult<Option<UnitStatus>> {
        let Some(unit) = self.read_state()?.registry.get(identifier) else {
            trace!(unit = identifier, "unit not registered; ignoring");
            return Ok(None);
        };
        evaluate(&unit);
        let unit_status = unit.last_known_status();
        let status = self.commit(&mut *self.write_state()?);
        self.publish(&status);
        Ok(Some(unit_status))
    }
}

impl Drop for ManagerInner {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for (id, wiring) in state.wiring.drain() {
            trace!(unit = %id, "manager dropped; releasing wiring");
            wiring.detach();
        }
    }
}

/// Handler installed on an input source for the unit registered as `id`.
///
/// Holds the manager weakly: events after the manager is gone, or after the
/// unit was removed, do nothing.
fn change_handler(inner: Weak<ManagerInner>, id: UnitId) -> ChangeHandler {
    Arc::new(move || {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let result = inner.revalidate(id.as_str(), |unit| {
            unit.evaluate();
        });
        if let Err(e) = result {
            warn!(unit = %id, error = %e, "failed to process change event");
        }
    })
}

// Observer list updates are single push/retain calls.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CheckError, DomainError, ValidationResult};
    use crate::error::FormguardError;
    use mockall::mock;
    use std::sync::{Mutex, OnceLock};

    // ── fixtures ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct FakeField {
        text: Mutex<String>,
        handlers: Mutex<Vec<(SubscriptionHandle, EventName, ChangeHandler)>>,
        next: AtomicU64,
    }

    impl FakeField {
        fn with_text(text: &str) -> Arc<Self> {
            let field = Self::default();
            *field.text.lock().unwrap() = text.to_owned();
            Arc::new(field)
        }

        fn type_text(&self, text: &str) {
            *self.text.lock().unwrap() = text.to_owned();
            let handlers: Vec<ChangeHandler> = self
                .handlers
                .lock()
                .unwrap()
                .iter()
                .map(|(_, _, h)| Arc::clone(h))
                .collect();
            for handler in handlers {
                handler();
            }
        }

        fn subscriber_count(&self) -> usize {
            self.handlers.lock().unwrap().len()
        }

        fn events(&self) -> Vec<String> {
            self.handlers
                .lock()
                .unwrap()
                .iter()
                .map(|(_, e, _)| e.to_string())
                .collect()
        }
    }

    impl InputSource for FakeField {
        fn content(&self) -> String {
            self.text.lock().unwrap().clone()
        }

        fn subscribe(
            &self,
            event: &EventName,
            handler: ChangeHandler,
        ) -> FormguardResult<SubscriptionHandle> {
            let handle = SubscriptionHandle::new(self.next.fetch_add(1, Ordering::Relaxed));
            self.handlers
                .lock()
                .unwrap()
                .push((handle, event.clone(), handler));
            Ok(handle)
        }

        fn unsubscribe(&self, handle: SubscriptionHandle) {
            self.handlers.lock().unwrap().retain(|(h, _, _)| *h != handle);
        }
    }

    mock! {
        Source {}
        impl InputSource for Source {
            fn content(&self) -> String;
            fn subscribe(&self, event: &EventName, handler: ChangeHandler)
                -> FormguardResult<SubscriptionHandle>;
            fn unsubscribe(&self, handle: SubscriptionHandle);
        }
    }

    struct NonEmpty;

    impl ValidationRule for NonEmpty {
        fn name(&self) -> &str {
            "non-empty"
        }

        fn validate(&self, content: &str) -> ValidationResult {
            ValidationResult::check(!content.trim().is_empty(), || {
                CheckError::new("empty", "a value is required")
            })
        }
    }

    fn rules() -> Vec<Arc<dyn ValidationRule>> {
        vec![Arc::new(NonEmpty)]
    }

    fn id(s: &str) -> Option<UnitId> {
        Some(UnitId::new(s).unwrap())
    }

    fn record(manager: &ValidationManager) -> Arc<Mutex<Vec<AggregatedStatus>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        manager.subscribe(move |status| sink.lock().unwrap().push(status.clone()));
        seen
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn empty_manager_is_valid() {
        let manager = ValidationManager::new();
        assert!(manager.is_valid());
        assert!(manager.status().unwrap().overall_valid);
    }

    #[test]
    fn typing_into_empty_field_flips_overall_validity() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("");

        manager
            .register_text_field(field.clone(), rules(), id("A"))
            .unwrap();

        let status = manager.status().unwrap();
        assert!(!status.overall_valid);
        assert!(!status.unit("A").unwrap().is_valid);
        assert!(!manager.is_valid());

        field.type_text("");
        assert!(!manager.is_valid());
        assert_eq!(
            manager.status().unwrap().unit("A").unwrap().errors["non-empty"].code,
            "empty"
        );

        field.type_text("Ada");
        assert!(manager.is_valid());
        assert!(manager.status().unwrap().unit("A").unwrap().is_valid);
    }

    #[test]
    fn one_invalid_unit_invalidates_all_and_removal_restores() {
        let manager = ValidationManager::new();
        let a = FakeField::with_text("");
        let b = FakeField::with_text("");
        let seen = record(&manager);

        manager.register_text_field(a.clone(), rules(), id("A")).unwrap();
        manager.register_text_view(b.clone(), rules(), id("B")).unwrap();
        a.type_text("valid");
        b.type_text("   ");

        let status = manager.status().unwrap();
        assert!(!status.overall_valid);
        assert!(status.unit("A").unwrap().is_valid);
        assert!(!status.unit("B").unwrap().is_valid);

        let removed = manager.remove_unit_for_identifier("B").unwrap();
        assert!(removed.is_some());
        assert!(manager.is_valid());
        assert!(manager.unit_for_identifier("B").unwrap().is_none());

        let last = seen.lock().unwrap().last().cloned().unwrap();
        assert!(last.overall_valid);
        assert!(!last.contains("B"));
        assert_eq!(b.subscriber_count(), 0);
    }

    #[test]
    fn each_change_publishes_once_in_order() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("");
        let seen = record(&manager);

        manager.register_text_field(field.clone(), rules(), id("A")).unwrap();
        field.type_text("x");
        field.type_text("");

        let validity: Vec<bool> = seen.lock().unwrap().iter().map(|s| s.overall_valid).collect();
        assert_eq!(validity, [false, true, false]);
    }

    #[test]
    fn text_sources_use_default_events() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("");
        let view = FakeField::with_text("");

        manager.register_text_field(field.clone(), rules(), None).unwrap();
        manager.register_text_view(view.clone(), rules(), None).unwrap();

        assert_eq!(field.events(), [EventName::TEXT_FIELD_DID_CHANGE]);
        assert_eq!(view.events(), [EventName::TEXT_VIEW_DID_CHANGE]);
    }

    #[test]
    fn object_uses_the_given_event() {
        let manager = ValidationManager::new();
        let object = FakeField::with_text("value");

        let unit = manager
            .register_object(object.clone(), rules(), "model-updated", None)
            .unwrap();

        assert_eq!(object.events(), ["model-updated"]);
        assert!(unit.identifier().is_some());
    }

    #[test]
    fn object_without_event_fails_fast() {
        let manager = ValidationManager::new();
        let mut source = MockSource::new();
        source.expect_subscribe().never();

        let err = manager
            .register_object(Arc::new(source), rules(), "", id("obj"))
            .unwrap_err();

        assert!(matches!(
            err,
            FormguardError::Domain(DomainError::MissingChangeEvent { .. })
        ));
        assert!(manager.identifiers().unwrap().is_empty());
    }

    #[test]
    fn subscription_failure_registers_nothing() {
        let manager = ValidationManager::new();
        let mut source = MockSource::new();
        source.expect_subscribe().returning(|event, _| {
            Err(ApplicationError::SubscriptionFailed {
                event: event.to_string(),
                reason: "closed".into(),
            }
            .into())
        });

        let result = manager.register_text_field(Arc::new(source), rules(), id("A"));

        assert!(result.is_err());
        assert!(manager.unit_for_identifier("A").unwrap().is_none());
    }

    #[test]
    fn removal_unsubscribes_exactly_once() {
        let manager = ValidationManager::new();
        let mut source = MockSource::new();
        source
            .expect_subscribe()
            .times(1)
            .returning(|_, _| Ok(SubscriptionHandle::new(7)));
        source
            .expect_unsubscribe()
            .withf(|handle| handle.get() == 7)
            .times(1)
            .return_const(());

        manager
            .register_text_field(Arc::new(source), rules(), id("A"))
            .unwrap();
        manager.remove_unit_for_identifier("A").unwrap();
        assert!(manager.remove_unit_for_identifier("A").unwrap().is_none());
    }

    #[test]
    fn removing_unknown_identifier_publishes_nothing() {
        let manager = ValidationManager::new();
        let seen = record(&manager);

        assert!(manager.remove_unit_for_identifier("ghost").unwrap().is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn change_after_removal_is_ignored() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("");
        manager.register_text_field(field.clone(), rules(), id("A")).unwrap();

        // Keep a stale handler around to simulate an event already in flight.
        let stale: ChangeHandler = Arc::clone(&field.handlers.lock().unwrap()[0].2);
        manager.remove_unit_for_identifier("A").unwrap();

        let seen = record(&manager);
        stale();
        assert!(seen.lock().unwrap().is_empty());
        assert!(manager.is_valid());
    }

    #[test]
    fn reregistering_identifier_replaces_unit_and_wiring() {
        let manager = ValidationManager::new();
        let old = FakeField::with_text("");
        let new = FakeField::with_text("filled");

        manager.register_text_field(old.clone(), rules(), id("A")).unwrap();
        let unit = manager
            .register_text_field(new.clone(), rules(), id("A"))
            .unwrap();

        assert_eq!(old.subscriber_count(), 0);
        assert_eq!(new.subscriber_count(), 1);
        assert_eq!(manager.identifiers().unwrap().len(), 1);
        assert!(Arc::ptr_eq(
            &manager.unit_for_identifier("A").unwrap().unwrap(),
            &unit
        ));
    }

    #[test]
    fn readding_wired_unit_keeps_its_subscription() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("");
        let unit = manager
            .register_text_field(field.clone(), rules(), id("A"))
            .unwrap();

        let used = manager.add_unit(unit.clone()).unwrap();
        assert_eq!(used.as_str(), "A");
        assert_eq!(field.subscriber_count(), 1);

        field.type_text("typed");
        assert!(manager.is_valid());
        assert!(manager.status().unwrap().unit("A").unwrap().is_valid);
    }

    #[test]
    fn adding_other_unit_under_wired_identifier_drops_old_wiring() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("");
        manager
            .register_text_field(field.clone(), rules(), id("A"))
            .unwrap();

        manager
            .add_unit_with_identifier(Arc::new(ValidationUnit::builder().build()), id("A"))
            .unwrap();
        assert_eq!(field.subscriber_count(), 0);
    }

    #[test]
    fn add_unit_resolves_identifiers() {
        let manager = ValidationManager::new();

        let own = Arc::new(
            ValidationUnit::builder()
                .identifier(UnitId::new("own").unwrap())
                .build(),
        );
        assert_eq!(manager.add_unit(own).unwrap().as_str(), "own");

        let explicit = Arc::new(ValidationUnit::builder().build());
        let used = manager
            .add_unit_with_identifier(explicit, id("explicit"))
            .unwrap();
        assert_eq!(used.as_str(), "explicit");

        let generated = manager
            .add_unit(Arc::new(ValidationUnit::builder().build()))
            .unwrap();
        assert!(!["own", "explicit"].contains(&generated.as_str()));
        assert_eq!(manager.identifiers().unwrap().len(), 3);
    }

    #[test]
    fn added_unit_is_validated_explicitly() {
        let manager = ValidationManager::new();
        let unit = Arc::new(ValidationUnit::builder().rule(Arc::new(NonEmpty)).build());
        let id = manager.add_unit(unit).unwrap();

        assert!(!manager.is_valid());
        let status = manager.validate_text(id.as_str(), "hello").unwrap().unwrap();
        assert!(status.is_valid);
        assert!(manager.is_valid());

        assert!(manager.validate_text("missing", "x").unwrap().is_none());
    }

    #[test]
    fn validate_all_reads_current_content() {
        let manager = ValidationManager::new();
        let a = FakeField::with_text("one");
        let b = FakeField::with_text("two");
        manager.register_text_field(a, rules(), id("A")).unwrap();
        manager.register_text_field(b, rules(), id("B")).unwrap();
        assert!(!manager.is_valid());

        let status = manager.validate_all().unwrap();
        assert!(status.overall_valid);
        assert!(manager.is_valid());
    }

    #[test]
    fn validate_unit_uses_source_content() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("ready");
        manager.register_text_field(field, rules(), id("A")).unwrap();

        let status = manager.validate_unit("A").unwrap().unwrap();
        assert!(status.is_valid);
    }

    /// Passes when `content` equals the source content of another unit.
    struct MatchesField {
        manager: OnceLock<ValidationManager>,
        other: &'static str,
    }

    impl ValidationRule for MatchesField {
        fn name(&self) -> &str {
            "matches"
        }

        fn validate(&self, content: &str) -> ValidationResult {
            let other = self
                .manager
                .get()
                .and_then(|m| m.unit_for_identifier(self.other).ok().flatten())
                .and_then(|unit| unit.source().map(|s| s.content()));
            ValidationResult::check(other.as_deref() == Some(content), || {
                CheckError::new("mismatch", format!("must match '{}'", self.other))
            })
        }
    }

    #[test]
    fn rules_may_query_the_manager() {
        let manager = ValidationManager::new();
        let password = FakeField::with_text("secret");
        let confirm = FakeField::with_text("");
        let rule = Arc::new(MatchesField {
            manager: OnceLock::new(),
            other: "password",
        });
        let _ = rule.manager.set(manager.clone());

        manager
            .register_text_field(password, rules(), id("password"))
            .unwrap();
        let confirm_rules: Vec<Arc<dyn ValidationRule>> = vec![rule];
        manager
            .register_text_field(confirm.clone(), confirm_rules, id("confirm"))
            .unwrap();

        confirm.type_text("secre");
        assert!(!manager.status().unwrap().unit("confirm").unwrap().is_valid);

        confirm.type_text("secret");
        assert!(manager.status().unwrap().unit("confirm").unwrap().is_valid);
        assert!(manager.validate_unit("confirm").unwrap().unwrap().is_valid);
        assert!(manager.validate_all().unwrap().overall_valid);
    }

    #[test]
    fn observers_may_reenter_the_manager() {
        let manager = ValidationManager::new();
        let field = FakeField::with_text("");
        let handle = manager.clone();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        manager.subscribe(move |_| {
            let ids = handle.identifiers().unwrap();
            sink.lock().unwrap().push((handle.is_valid(), ids.len()));
        });

        manager.register_text_field(field.clone(), rules(), id("A")).unwrap();
        field.type_text("ok");

        assert_eq!(*observed.lock().unwrap(), [(false, 1), (true, 1)]);
    }

    #[test]
    fn unsubscribed_observer_stops_receiving() {
        let manager = ValidationManager::new();
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let observer = manager.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.add_unit(Arc::new(ValidationUnit::builder().build())).unwrap();
        assert!(manager.unsubscribe(observer));
        assert!(!manager.unsubscribe(observer));
        manager.add_unit(Arc::new(ValidationUnit::builder().build())).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(manager.observer_count(), 0);
    }

    #[test]
    fn dropping_manager_releases_wiring() {
        let field = FakeField::with_text("");
        {
            let manager = ValidationManager::new();
            manager.register_text_field(field.clone(), rules(), id("A")).unwrap();
            assert_eq!(field.subscriber_count(), 1);
        }
        assert_eq!(field.subscriber_count(), 0);
    }

    #[test]
    fn manager_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidationManager>();
    }
}

//! Validation unit: one input source, an ordered list of rules, cached results.
//!
//! A unit evaluates only when asked (by the manager's change handler or an
//! explicit re-validation) and otherwise reports its last-known status. It is
//! shared behind an `Arc` between the registry and the caller that registered
//! it, so its mutable parts use interior locking.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::application::ports::{InputSource, ValidationRule};
use crate::domain::{CheckOutcome, SourceKind, UnitId, UnitState, UnitStatus};

#[derive(Debug, Default)]
struct UnitCache {
    state: UnitState,
    outcomes: Vec<CheckOutcome>,
}

/// Runs a fixed sequence of rules against one input source.
pub struct ValidationUnit {
    identifier: RwLock<Option<UnitId>>,
    kind: Option<SourceKind>,
    source: Option<Arc<dyn InputSource>>,
    rules: Vec<Arc<dyn ValidationRule>>,
    enabled: AtomicBool,
    cache: RwLock<UnitCache>,
}

impl ValidationUnit {
    pub fn builder() -> ValidationUnitBuilder {
        ValidationUnitBuilder::default()
    }

    /// The identifier this unit is registered under, if any.
    pub fn identifier(&self) -> Option<UnitId> {
        read(&self.identifier).clone()
    }

    pub fn set_identifier(&self, identifier: UnitId) {
        *write(&self.identifier) = Some(identifier);
    }

    pub fn kind(&self) -> Option<SourceKind> {
        self.kind
    }

    pub fn source(&self) -> Option<&Arc<dyn InputSource>> {
        self.source.as_ref()
    }

    pub fn rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.rules
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// A disabled unit skips evaluation and keeps its last-known status.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Evaluate the source's current content.
    ///
    /// Units without a source (or disabled units) keep their cached results.
    pub fn evaluate(&self) -> Vec<CheckOutcome> {
        match &self.source {
            Some(source) => self.evaluate_text(&source.content()),
            None => {
                trace!(unit = ?self.identifier(), "no input source; keeping cached results");
                self.last_outcomes()
            }
        }
    }

    /// Run every rule, in order, against `text` and cache the results.
    pub fn evaluate_text(&self, text: &str) -> Vec<CheckOutcome> {
        if !self.is_enabled() {
            trace!(unit = ?self.identifier(), "unit disabled; skipping evaluation");
            return self.last_outcomes();
        }

        let outcomes: Vec<CheckOutcome> = self
            .rules
            .iter()
            .map(|rule| CheckOutcome::new(rule.name(), rule.validate(text)))
            .collect();
        let state = UnitState::from_outcomes(&outcomes);

        trace!(
            unit = ?self.identifier(),
            ?state,
            checks = outcomes.len(),
            "unit evaluated"
        );

        let mut cache = write(&self.cache);
        cache.state = state;
        cache.outcomes = outcomes.clone();
        outcomes
    }

    /// Validity and failed checks as of the last evaluation.
    pub fn last_known_status(&self) -> UnitStatus {
        let cache = read(&self.cache);
        UnitStatus::from_parts(cache.state, &cache.outcomes)
    }

    pub fn last_outcomes(&self) -> Vec<CheckOutcome> {
        read(&self.cache).outcomes.clone()
    }

    pub fn state(&self) -> UnitState {
        read(&self.cache).state
    }

    pub fn is_valid(&self) -> bool {
        self.state().is_valid()
    }
}

impl fmt::Debug for ValidationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationUnit")
            .field("identifier", &self.identifier())
            .field("kind", &self.kind)
            .field("has_source", &self.source.is_some())
            .field("rules", &self.rule_names())
            .field("enabled", &self.is_enabled())
            .field("state", &self.state())
            .finish()
    }
}

// The cache and identifier are replaced in single assignments, so a poisoned
// lock still guards consistent data.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for [`ValidationUnit`].
pub struct ValidationUnitBuilder {
    identifier: Option<UnitId>,
    source: Option<(SourceKind, Arc<dyn InputSource>)>,
    rules: Vec<Arc<dyn ValidationRule>>,
    enabled: bool,
}

impl Default for ValidationUnitBuilder {
    fn default() -> Self {
        Self {
            identifier: None,
            source: None,
            rules: Vec::new(),
            enabled: true,
        }
    }
}

impl ValidationUnitBuilder {
    pub fn identifier(mut self, identifier: UnitId) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn source(mut self, kind: SourceKind, source: Arc<dyn InputSource>) -> Self {
        self.source = Some((kind, source));
        self
    }

    pub fn rule(mut self, rule: Arc<dyn ValidationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Arc<dyn ValidationRule>>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> ValidationUnit {
        let (kind, source) = match self.source {
            Some((kind, source)) => (Some(kind), Some(source)),
            None => (None, None),
        };

        ValidationUnit {
            identifier: RwLock::new(self.identifier),
            kind,
            source,
            rules: self.rules,
            enabled: AtomicBool::new(self.enabled),
            cache: RwLock::new(UnitCache::default()),
        }
    }
}

//! Identifier → unit mapping.
//!
//! The registry owns identifier allocation and uniqueness. It holds no
//! subscription state and never evaluates a unit; the manager does both.
//!
//! Duplicate identifiers replace the previous entry (last write wins).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::unit::ValidationUnit;
use crate::domain::UnitId;

#[derive(Debug, Default)]
pub struct ValidationRegistry {
    units: HashMap<UnitId, Arc<ValidationUnit>>,
}

impl ValidationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier `add` would use: `identifier` > the unit's own > generated.
    pub fn resolve_identifier(
        &self,
        unit: &ValidationUnit,
        identifier: Option<UnitId>,
    ) -> UnitId {
        identifier
            .or_else(|| unit.identifier())
            .unwrap_or_else(|| self.generate_identifier())
    }

    /// An identifier not currently registered.
    pub fn generate_identifier(&self) -> UnitId {
        UnitId::generate_unique(|candidate| self.units.contains_key(candidate))
    }

    /// Store `unit` and return the identifier used.
    ///
    /// The resolved identifier is written back onto the unit. Any unit
    /// previously stored under the same identifier is replaced.
    pub fn add(&mut self, unit: Arc<ValidationUnit>, identifier: Option<UnitId>) -> UnitId {
        let id = self.resolve_identifier(&unit, identifier);
        unit.set_identifier(id.clone());

        if let Some(previous) = self.units.insert(id.clone(), unit) {
            debug!(unit = %id, replaced = ?previous.rule_names(), "replaced validation unit");
        } else {
            debug!(unit = %id, "added validation unit");
        }
        id
    }

    /// Remove and return the unit stored under `identifier`, if any.
    pub fn remove(&mut self, identifier: &str) -> Option<Arc<ValidationUnit>> {
        let removed = self.units.remove(identifier);
        if removed.is_some() {
            debug!(unit = identifier, "removed validation unit");
        }
        removed
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<ValidationUnit>> {
        self.units.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.units.contains_key(identifier)
    }

    pub fn ids(&self) -> impl Iterator<Item = &UnitId> {
        self.units.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitId, &Arc<ValidationUnit>)> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn unit() -> Arc<ValidationUnit> {
        Arc::new(ValidationUnit::builder().build())
    }

    fn id(s: &str) -> UnitId {
        UnitId::new(s).unwrap()
    }

    #[test]
    fn explicit_identifier_wins() {
        let mut registry = ValidationRegistry::new();
        let u = Arc::new(ValidationUnit::builder().identifier(id("own")).build());

        let used = registry.add(u.clone(), Some(id("explicit")));

        assert_eq!(used.as_str(), "explicit");
        assert_eq!(u.identifier(), Some(id("explicit")));
        assert!(!registry.contains("own"));
    }

    #[test]
    fn unit_identifier_used_when_no_explicit() {
        let mut registry = ValidationRegistry::new();
        let u = Arc::new(ValidationUnit::builder().identifier(id("own")).build());
        assert_eq!(registry.add(u, None).as_str(), "own");
    }

    #[test]
    fn generated_identifier_when_none_given() {
        let mut registry = ValidationRegistry::new();
        let u = unit();
        let used = registry.add(u.clone(), None);

        assert!(registry.contains(used.as_str()));
        assert_eq!(u.identifier(), Some(used));
    }

    #[test]
    fn generated_identifiers_never_collide() {
        let mut registry = ValidationRegistry::new();
        let ids: BTreeSet<_> = (0..200).map(|_| registry.add(unit(), None)).collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(registry.len(), 200);

        let fresh = registry.generate_identifier();
        assert!(!registry.contains(fresh.as_str()));
    }

    #[test]
    fn duplicate_identifier_replaces() {
        let mut registry = ValidationRegistry::new();
        let first = unit();
        let second = unit();

        registry.add(first, Some(id("a")));
        registry.add(second.clone(), Some(id("a")));

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get("a").unwrap(), &second));
    }

    #[test]
    fn adding_same_pair_twice_is_idempotent() {
        let mut registry = ValidationRegistry::new();
        let u = unit();

        registry.add(u.clone(), Some(id("a")));
        let once: BTreeSet<_> = registry.ids().cloned().collect();
        registry.add(u.clone(), Some(id("a")));
        let twice: BTreeSet<_> = registry.ids().cloned().collect();

        assert_eq!(once, twice);
        assert!(Arc::ptr_eq(&registry.get("a").unwrap(), &u));
    }

    #[test]
    fn remove_and_get_treat_absence_as_normal() {
        let mut registry = ValidationRegistry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.remove("missing").is_none());

        registry.add(unit(), Some(id("a")));
        assert!(registry.remove("a").is_some());
        assert!(registry.get("a").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn id_set_tracks_adds_minus_removes() {
        let mut registry = ValidationRegistry::new();
        let mut expected = BTreeSet::new();

        for (step, name) in ["a", "b", "c", "a", "d", "b"].iter().enumerate() {
            if step % 3 == 2 {
                registry.remove(name);
                expected.remove(*name);
            } else {
                registry.add(unit(), Some(id(name)));
                expected.insert(name.to_string());
            }
        }

        let actual: BTreeSet<_> = registry.ids().map(|i| i.to_string()).collect();
        assert_eq!(actual, expected);
    }
}

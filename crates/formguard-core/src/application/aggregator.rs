//! Folds every registered unit's last-known status into one [`AggregatedStatus`].

use tracing::trace;

use crate::application::registry::ValidationRegistry;
use crate::domain::AggregatedStatus;

/// Stateless status aggregation.
///
/// `recompute` never evaluates a unit; it only reads what each unit last
/// reported. An empty registry is valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusAggregator;

impl StatusAggregator {
    pub fn recompute(registry: &ValidationRegistry) -> AggregatedStatus {
        let status: AggregatedStatus = registry
            .iter()
            .map(|(id, unit)| (id.clone(), unit.last_known_status()))
            .collect();

        trace!(
            units = status.len(),
            overall_valid = status.overall_valid,
            "status recomputed"
        );
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ValidationRule;
    use crate::application::unit::ValidationUnit;
    use crate::domain::{CheckError, UnitId, ValidationResult};
    use std::sync::Arc;

    struct MinLen(usize);

    impl ValidationRule for MinLen {
        fn name(&self) -> &str {
            "min-len"
        }

        fn validate(&self, content: &str) -> ValidationResult {
            ValidationResult::check(content.len() >= self.0, || {
                CheckError::new("too-short", format!("need {} characters", self.0))
            })
        }
    }

    fn unit_with_text(text: Option<&str>) -> Arc<ValidationUnit> {
        let unit = ValidationUnit::builder().rule(Arc::new(MinLen(3))).build();
        if let Some(text) = text {
            unit.evaluate_text(text);
        }
        Arc::new(unit)
    }

    fn id(s: &str) -> Option<UnitId> {
        Some(UnitId::new(s).unwrap())
    }

    #[test]
    fn empty_registry_is_valid() {
        let status = StatusAggregator::recompute(&ValidationRegistry::new());
        assert!(status.overall_valid);
        assert!(status.per_unit.is_empty());
    }

    #[test]
    fn all_valid_units_give_valid_overall() {
        let mut registry = ValidationRegistry::new();
        registry.add(unit_with_text(Some("abcd")), id("a"));
        registry.add(unit_with_text(Some("xyz")), id("b"));

        let status = StatusAggregator::recompute(&registry);
        assert!(status.overall_valid);
        assert_eq!(status.len(), 2);
    }

    #[test]
    fn one_invalid_unit_fails_overall_and_reports_errors() {
        let mut registry = ValidationRegistry::new();
        registry.add(unit_with_text(Some("abcd")), id("a"));
        registry.add(unit_with_text(Some("x")), id("b"));

        let status = StatusAggregator::recompute(&registry);
        assert!(!status.overall_valid);
        assert!(status.unit("a").unwrap().is_valid);
        let b = status.unit("b").unwrap();
        assert!(!b.is_valid);
        assert_eq!(b.errors["min-len"].code, "too-short");
    }

    #[test]
    fn unevaluated_units_count_as_invalid() {
        let mut registry = ValidationRegistry::new();
        registry.add(unit_with_text(None), id("a"));

        let status = StatusAggregator::recompute(&registry);
        assert!(!status.overall_valid);
        assert!(status.unit("a").unwrap().errors.is_empty());
    }

    #[test]
    fn per_unit_matches_registry_exactly() {
        let mut registry = ValidationRegistry::new();
        registry.add(unit_with_text(Some("abc")), id("a"));
        registry.add(unit_with_text(Some("abc")), id("b"));
        registry.remove("a");

        let status = StatusAggregator::recompute(&registry);
        let keys: Vec<_> = status.per_unit.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["b"]);
    }
}

//! Per-unit and aggregated validation status.
//!
//! [`AggregatedStatus`] is the payload published to observers after every
//! recompute. Its serialised form is:
//!
//! ```json
//! {
//!   "overallValid": false,
//!   "perUnit": {
//!     "email": { "isValid": false, "errors": { "email": { "code": "...", "message": "..." } } },
//!     "name":  { "isValid": true,  "errors": {} }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CheckError, CheckOutcome, UnitId};

/// Lifecycle of a unit's validity.
///
/// `Unevaluated → Valid ⇄ Invalid`; no state is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitState {
    #[default]
    Unevaluated,
    Valid,
    Invalid,
}

impl UnitState {
    /// State after an evaluation producing `outcomes`.
    pub fn from_outcomes(outcomes: &[CheckOutcome]) -> Self {
        if outcomes.iter().all(|o| o.result.passed) {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    /// Only `Valid` counts as valid; a unit that never ran has not passed.
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Last-known validity of one unit plus its failed checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStatus {
    pub is_valid: bool,
    /// Failed checks keyed by check name. The second and later rules
    /// sharing a name are keyed `name#2`, `name#3`, ... by rule position.
    pub errors: BTreeMap<String, CheckError>,
}

impl UnitStatus {
    pub fn unevaluated() -> Self {
        Self::default()
    }

    pub fn from_parts(state: UnitState, outcomes: &[CheckOutcome]) -> Self {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let mut errors = BTreeMap::new();
        for o in outcomes {
            let nth = seen.entry(o.check.as_str()).or_default();
            *nth += 1;
            if o.result.passed {
                continue;
            }
            let key = match *nth {
                1 => o.check.clone(),
                n => format!("{}#{n}", o.check),
            };
            let error = o.result.error.clone().unwrap_or_else(|| {
                CheckError::new("failed", format!("check '{}' failed", o.check))
            });
            errors.insert(key, error);
        }

        Self {
            is_valid: state.is_valid(),
            errors,
        }
    }
}

/// Combined validity of every registered unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStatus {
    /// `true` iff every entry of `per_unit` is valid (vacuously true when empty).
    pub overall_valid: bool,
    pub per_unit: BTreeMap<UnitId, UnitStatus>,
}

impl AggregatedStatus {
    /// Status of a manager with no registered units.
    pub fn empty() -> Self {
        Self {
            overall_valid: true,
            per_unit: BTreeMap::new(),
        }
    }

    pub fn unit(&self, id: &str) -> Option<&UnitStatus> {
        self.per_unit.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.per_unit.contains_key(id)
    }

    pub fn invalid_units(&self) -> impl Iterator<Item = &UnitId> {
        self.per_unit
            .iter()
            .filter(|(_, status)| !status.is_valid)
            .map(|(id, _)| id)
    }

    pub fn error_count(&self) -> usize {
        self.per_unit.values().map(|s| s.errors.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.per_unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_unit.is_empty()
    }
}

impl Default for AggregatedStatus {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<(UnitId, UnitStatus)> for AggregatedStatus {
    fn from_iter<I: IntoIterator<Item = (UnitId, UnitStatus)>>(iter: I) -> Self {
        let per_unit: BTreeMap<_, _> = iter.into_iter().collect();
        Self {
            overall_valid: per_unit.values().all(|s| s.is_valid),
            per_unit,
        }
    }
}

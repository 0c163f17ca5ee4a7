//! Outcome of a single validation check.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured detail describing why a check failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckError {
    /// Stable machine-readable code, e.g. `"too-short"`.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
}

impl CheckError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Pass/fail result of one rule applied to one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CheckError>,
}

impl ValidationResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            error: None,
        }
    }

    pub fn fail(error: CheckError) -> Self {
        Self {
            passed: false,
            error: Some(error),
        }
    }

    /// Pass when `condition` holds, otherwise fail with the error built by `on_fail`.
    pub fn check(condition: bool, on_fail: impl FnOnce() -> CheckError) -> Self {
        if condition {
            Self::pass()
        } else {
            Self::fail(on_fail())
        }
    }

    pub fn is_pass(&self) -> bool {
        self.passed
    }
}

/// One entry of a unit's per-check breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Name of the rule that produced this result.
    pub check: String,
    pub result: ValidationResult,
}

impl CheckOutcome {
    pub fn new(check: impl Into<String>, result: ValidationResult) -> Self {
        Self {
            check: check.into(),
            result,
        }
    }
}

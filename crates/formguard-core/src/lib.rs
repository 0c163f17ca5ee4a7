//! formguard Core - Validation Manager
//!
//! This crate provides the domain and application layers of formguard: a
//! registry of validation units, the aggregation of their results into one
//! status, and the manager that keeps that status current as inputs change.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        formguard-cli (formguard)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          ValidationManager              │
//! │  (registration, wiring, notifications)  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │ ValidationRegistry + StatusAggregator   │
//! │          ValidationUnit                 │
//! └──────────────────┬──────────────────────┘
//!                    │ through ports
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   formguard-adapters (Infrastructure)   │
//! │  (text inputs, objects, built-in rules) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use formguard_core::prelude::*;
//!
//! # fn demo(field: Arc<dyn InputSource>, rule: Arc<dyn ValidationRule>) -> FormguardResult<()> {
//! let manager = ValidationManager::new();
//! manager.subscribe(|status| println!("valid: {}", status.overall_valid));
//!
//! manager.register_text_field(field, vec![rule], Some(UnitId::new("email")?))?;
//! assert!(!manager.is_valid());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ObserverId, StatusAggregator, ValidationManager, ValidationRegistry, ValidationUnit,
        ports::{ChangeHandler, InputSource, SubscriptionHandle, ValidationRule},
    };
    pub use crate::domain::{
        AggregatedStatus, CheckError, CheckOutcome, EventName, SourceKind, UnitId, UnitState,
        UnitStatus, ValidationResult,
    };
    pub use crate::error::{FormguardError, FormguardResult};
}

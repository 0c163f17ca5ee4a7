//! Application layer for formguard.
//!
//! This layer contains:
//! - **Manager**: the public façade (`ValidationManager`)
//! - **Registry / Aggregator**: identifier bookkeeping and status folding
//! - **Unit**: per-source rule runner with cached results
//! - **Ports**: traits for input sources and validation rules
//! - **Errors**: orchestration failures

pub mod aggregator;
pub mod error;
pub mod manager;
pub mod ports;
pub mod registry;
pub mod unit;

pub use aggregator::StatusAggregator;
pub use manager::{ObserverId, StatusObserver, ValidationManager};
pub use registry::ValidationRegistry;
pub use unit::{ValidationUnit, ValidationUnitBuilder};

// Re-export port traits (for adapter implementation)
pub use ports::{ChangeHandler, InputSource, SubscriptionHandle, ValidationRule};

pub use error::ApplicationError;

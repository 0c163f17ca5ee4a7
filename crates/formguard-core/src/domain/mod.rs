// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for formguard.
//!
//! Pure value types: identifiers, event names, check outcomes and the
//! status payloads published by the manager.
//!
//! - **No I/O**: nothing here touches an input source
//! - **No locking**: shared state lives in the application layer
//! - **Serializable**: status payloads derive `serde` so observers can ship them
pub mod error;
pub mod event;
pub mod identifier;
pub mod outcome;
pub mod status;

pub use error::{DomainError, ErrorCategory};
pub use event::{EventName, SourceKind};
pub use identifier::UnitId;
pub use outcome::{CheckError, CheckOutcome, ValidationResult};
pub use status::{AggregatedStatus, UnitState, UnitStatus};

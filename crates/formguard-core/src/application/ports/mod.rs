//! Application ports (traits) for external collaborators.
//!
//! The manager never knows what a text field or a rule really is. It talks to
//! them through these ports; `formguard-adapters` implements them.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the manager, implemented outside
//!   - `InputSource`: content + change-event subscription ("ChangeObservable")
//!   - `ValidationRule`: one check over a piece of content ("Validatable")

pub mod output;

pub use output::{ChangeHandler, InputSource, SubscriptionHandle, ValidationRule};

//! Input-source adapters.

mod notifier;
mod object;
mod text;

pub use notifier::ChangeNotifier;
pub use object::ObservableObject;
pub use text::{MemoryTextField, MemoryTextView};

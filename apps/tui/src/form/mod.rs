//! The form surface: a pure session state machine plus the value-editing
//! rules the input layer drives it with.

pub mod editing;
pub mod session;

pub use session::{FormEvent, FormPhase, FormSession, FormTarget, TransitionError};

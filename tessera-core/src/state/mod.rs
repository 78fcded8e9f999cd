//! Printer lifecycle state machine
//!
//! Tracks whether the machine is homed, printing or faulted. The state
//! machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{ErrorKind, State};

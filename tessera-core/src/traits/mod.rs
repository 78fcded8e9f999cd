//! Hardware abstraction traits
//!
//! These traits define the interface between the motion-control logic
//! and hardware-specific implementations.

pub mod clock;
pub mod endstop;
pub mod motion;
pub mod stepper;
pub mod vacuum;

pub use clock::Clock;
pub use endstop::LimitSwitch;
pub use motion::Motion;
pub use stepper::{DirectionLine, StepLine};
pub use vacuum::VacuumActuator;

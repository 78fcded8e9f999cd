//! Board-agnostic core logic for the Tessera brick mosaic printer
//!
//! This crate contains all motion-control logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (step/direction lines, vacuum, limit switches, clock)
//! - Shared per-axis step bank written by the tick handler
//! - Step scheduler with the trapezoidal interval ramp
//! - Motion planner (blocking, time-bounded moves)
//! - Homing routine
//! - Pick-and-place choreography and print job runner
//! - Printer lifecycle state machine
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod controller;
pub mod motion;
pub mod scheduler;
pub mod sequence;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::Controller;

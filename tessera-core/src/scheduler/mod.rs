//! Step scheduler
//!
//! Runs once per hardware tick, advancing every armed axis and emitting
//! step pulses.

pub mod tick;

pub use tick::StepScheduler;

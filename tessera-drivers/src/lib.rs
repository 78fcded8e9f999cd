//! Hardware driver implementations
//!
//! This crate binds the traits defined in tessera-core to `embedded-hal`
//! digital pins:
//!
//! - Step and direction outputs for the three stepper drivers
//! - Vacuum pump / valve output
//! - Endstop inputs
//!
//! All pins are expected to be infallible, as on-chip GPIO is.

#![no_std]
#![deny(unsafe_code)]

pub mod endstop;
pub mod stepper;
pub mod vacuum;

#[cfg(test)]
pub(crate) mod mock;

pub use endstop::GpioLimitSwitches;
pub use stepper::{GpioDirectionLines, GpioStepLines};
pub use vacuum::GpioVacuum;

//! Configuration types
//!
//! Board-agnostic machine parameters. The firmware builds a `MachineConfig`
//! from `machine.toml` at compile time; tests use the defaults.

pub mod machine;

pub use machine::*;

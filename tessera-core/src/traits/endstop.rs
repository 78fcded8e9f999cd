//! Limit switch trait

use crate::motion::Axis;

/// Per-axis homing endstops
///
/// Reads are polled and not debounced.
pub trait LimitSwitch {
    /// Check if the endstop of `axis` is triggered
    fn is_triggered(&mut self, axis: Axis) -> bool;
}

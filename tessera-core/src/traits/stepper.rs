//! Step and direction output traits
//!
//! The step lines belong to the tick handler and the direction lines belong
//! to the foreground planner, so each is its own trait and can be owned
//! separately.

use crate::motion::{Axis, Direction};

/// Step pulse outputs for all three axes
///
/// Called from the tick handler; implementations must not block.
pub trait StepLine {
    /// Drive the step output of `axis` high or low
    fn set_step(&mut self, axis: Axis, high: bool);
}

/// Direction outputs for all three axes
pub trait DirectionLine {
    /// Set the direction output of `axis`
    ///
    /// Only called while the axis is idle.
    fn set_direction(&mut self, axis: Axis, direction: Direction);
}

//! Cartesian position and move requests

use super::axis::{Axis, PerAxis};
use crate::config::Envelope;

/// Absolute tool position in steps from the homed origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CartesianPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CartesianPosition {
    /// The homed origin
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Coordinate on one axis
    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Signed per-axis steps from `self` to `target`
    ///
    /// Fails with the first axis whose distance does not fit in an `i32`.
    pub fn delta_to(&self, target: CartesianPosition) -> Result<PerAxis<i32>, Axis> {
        let delta = |axis| target.get(axis).checked_sub(self.get(axis)).ok_or(axis);
        Ok(PerAxis {
            x: delta(Axis::X)?,
            y: delta(Axis::Y)?,
            z: delta(Axis::Z)?,
        })
    }

    /// First axis whose coordinate lies outside `envelope`
    pub fn outside(&self, envelope: &Envelope) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&axis| !envelope.get(axis).contains(self.get(axis)))
    }
}

/// An absolute move at a cruise interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveRequest {
    pub target: CartesianPosition,
    /// Cruise interval in ticks per half pulse
    pub interval: u32,
}

impl MoveRequest {
    pub const fn new(target: CartesianPosition, interval: u32) -> Self {
        Self { target, interval }
    }
}

/// Errors from the motion planner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Target coordinate lies outside the machine envelope
    OutOfEnvelope(Axis),
    /// Interval of zero ticks
    InvalidSpeed,
    /// A previous move is still in flight
    Busy,
    /// Axes did not finish within the configured bound
    MotionTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisRange, DEFAULT_ENVELOPE};

    #[test]
    fn test_delta_to() {
        let from = CartesianPosition::new(100, -50, 3000);
        let delta = from.delta_to(CartesianPosition::new(40, 0, 3000));
        assert_eq!(delta, Ok(PerAxis { x: -60, y: 50, z: 0 }));
    }

    #[test]
    fn test_delta_overflow_names_axis() {
        let from = CartesianPosition::new(0, 2_000_000_000, 0);
        let delta = from.delta_to(CartesianPosition::new(5, -2_000_000_000, 0));
        assert_eq!(delta, Err(Axis::Y));
    }

    #[test]
    fn test_outside_envelope() {
        assert_eq!(CartesianPosition::ORIGIN.outside(&DEFAULT_ENVELOPE), None);

        let mut envelope = DEFAULT_ENVELOPE;
        envelope.z = AxisRange::new(0, 100);
        let pos = CartesianPosition::new(10, 10, 101);
        assert_eq!(pos.outside(&envelope), Some(Axis::Z));

        let pos = CartesianPosition::new(-1, 10, 500);
        assert_eq!(pos.outside(&envelope), Some(Axis::X));
    }
}

//! Axis identifiers and per-axis motion records

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the three linear stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Horizontal, along grid columns
    X,
    /// Horizontal, along grid rows
    Y,
    /// Vertical nozzle travel (larger = lower)
    Z,
}

impl Axis {
    /// All axes in tick order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into per-axis arrays
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Travel direction of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Toward increasing coordinates
    #[default]
    Forward,
    /// Toward decreasing coordinates
    Backward,
}

impl Direction {
    /// Direction of travel for a signed step delta
    pub fn from_delta(delta: i32) -> Self {
        if delta < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

/// A value for each of X, Y and Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerAxis<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> PerAxis<T> {
    /// Same value on every axis
    pub const fn splat(value: T) -> Self {
        Self {
            x: value,
            y: value,
            z: value,
        }
    }

    /// Value for one axis
    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Point-in-time copy of one axis' motion record
///
/// `steps_remaining`, `tick_counter`, `pulse_high` and `current_interval` are
/// advanced by the step scheduler; `direction` and `target_interval` are set
/// when the axis is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisState {
    pub direction: Direction,
    pub steps_remaining: u32,
    pub pulse_high: bool,
    pub tick_counter: u32,
    pub current_interval: u32,
    pub target_interval: u32,
}

impl AxisState {
    /// An axis with no steps left emits nothing
    pub fn is_idle(&self) -> bool {
        self.steps_remaining == 0
    }
}

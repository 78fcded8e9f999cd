//! Motion control
//!
//! Axis records, the shared step bank, the blocking planner and homing.

pub mod axis;
pub mod bank;
pub mod homing;
pub mod planner;
pub mod position;

pub use axis::{Axis, AxisState, Direction, PerAxis};
pub use bank::{ArmRequest, StepBank};
pub use homing::{home_axes, HomingError, HomingReport, HOMING_ORDER};
pub use planner::{MotionPlanner, RampProfile};
pub use position::{CartesianPosition, MotionError, MoveRequest};

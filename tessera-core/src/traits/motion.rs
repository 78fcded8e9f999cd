//! Blocking absolute-move trait
//!
//! Sequencers are written against this trait rather than the concrete
//! planner, so a choreography can be checked without a step scheduler.

use crate::motion::{CartesianPosition, MotionError};

/// Something that can move the tool to an absolute position
pub trait Motion {
    /// Move to `target` with cruise `interval`, returning once motion is complete
    fn move_to(&mut self, target: CartesianPosition, interval: u32) -> Result<(), MotionError>;

    /// Check that `target` could be reached, without moving
    fn check_reachable(&self, target: CartesianPosition) -> Result<(), MotionError>;

    /// Last commanded position
    fn position(&self) -> CartesianPosition;
}

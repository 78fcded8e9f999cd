//! Blocking multi-axis motion planner
//!
//! Arms the step bank for a move and waits for the step scheduler to drain
//! it. The planner owns the direction outputs and the commanded position;
//! the scheduler owns the step outputs. Waits poll a [`Clock`] and fail with
//! [`MotionError::MotionTimeout`] once the configured bound is exceeded.

use super::axis::{Axis, Direction, PerAxis};
use super::bank::{ArmRequest, StepBank};
use super::position::{CartesianPosition, MotionError};
use crate::config::{Envelope, MachineConfig, MotionConfig, WaitLimits};
use crate::traits::{Clock, DirectionLine, Motion};

/// Start and cruise interval of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampProfile {
    pub start_interval: u32,
    pub target_interval: u32,
}

/// Motion planner over a shared step bank
pub struct MotionPlanner<'a, D: DirectionLine, C: Clock> {
    bank: &'a StepBank,
    directions: D,
    clock: C,
    motion: MotionConfig,
    envelope: Envelope,
    limits: WaitLimits,
    /// Last commanded position
    position: CartesianPosition,
}

impl<'a, D: DirectionLine, C: Clock> MotionPlanner<'a, D, C> {
    /// Create a planner at the origin
    ///
    /// The position is meaningless until the machine has been homed.
    pub fn new(bank: &'a StepBank, directions: D, clock: C, config: &MachineConfig) -> Self {
        Self {
            bank,
            directions,
            clock,
            motion: config.motion,
            envelope: config.envelope,
            limits: config.limits,
            position: CartesianPosition::ORIGIN,
        }
    }

    /// Arm all axes for a relative move and return immediately
    ///
    /// Axes with a zero delta are left untouched. Fails with `Busy` if any
    /// axis still has steps in flight.
    pub fn move_steppers(&mut self, dx: i32, dy: i32, dz: i32, interval: u32) -> Result<(), MotionError> {
        if interval == 0 {
            return Err(MotionError::InvalidSpeed);
        }
        if !self.bank.is_idle() {
            return Err(MotionError::Busy);
        }

        let profile = RampProfile {
            start_interval: self.motion.ramp_start_interval,
            target_interval: interval,
        };
        let deltas = PerAxis { x: dx, y: dy, z: dz };
        for axis in Axis::ALL {
            let delta = deltas.get(axis);
            if delta != 0 {
                self.arm(axis, Direction::from_delta(delta), delta.unsigned_abs(), profile)?;
            }
        }
        Ok(())
    }

    /// Move to an absolute position and wait for completion
    ///
    /// The commanded position is updated as soon as the move is armed, so
    /// after a `MotionTimeout` it reflects the target, not where the tool
    /// stopped.
    pub fn move_to(&mut self, target: CartesianPosition, interval: u32) -> Result<(), MotionError> {
        self.check_reachable(target)?;

        let delta = self.position.delta_to(target).map_err(MotionError::OutOfEnvelope)?;
        self.move_steppers(delta.x, delta.y, delta.z, interval)?;
        self.position = target;

        #[cfg(feature = "defmt")]
        defmt::trace!("move to ({}, {}, {}) @ {}", target.x, target.y, target.z, interval);

        self.wait_idle()
    }

    /// Move a single axis by `steps` without touching the commanded position
    ///
    /// Used for probing toward an endstop, where the true position is not
    /// known until the switch triggers.
    pub fn jog(
        &mut self,
        axis: Axis,
        direction: Direction,
        steps: u32,
        profile: RampProfile,
    ) -> Result<(), MotionError> {
        if profile.start_interval == 0 || profile.target_interval == 0 {
            return Err(MotionError::InvalidSpeed);
        }
        if !self.bank.is_idle() {
            return Err(MotionError::Busy);
        }
        self.arm(axis, direction, steps, profile)?;
        self.wait_idle()
    }

    /// Check `target` against the envelope
    pub fn check_reachable(&self, target: CartesianPosition) -> Result<(), MotionError> {
        match target.outside(&self.envelope) {
            Some(axis) => Err(MotionError::OutOfEnvelope(axis)),
            None => Ok(()),
        }
    }

    /// Block until every axis is idle
    pub fn wait_idle(&mut self) -> Result<(), MotionError> {
        let start = self.clock.now_us();
        loop {
            if self.bank.is_idle() {
                return Ok(());
            }
            if let Some(max) = self.limits.max_move_us {
                if self.clock.now_us().saturating_sub(start) > max {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("motion timeout after {} us", max);
                    return Err(MotionError::MotionTimeout);
                }
            }
            self.clock.relax();
        }
    }

    fn arm(&mut self, axis: Axis, direction: Direction, steps: u32, profile: RampProfile) -> Result<(), MotionError> {
        // Direction must settle before the first step of the move
        self.directions.set_direction(axis, direction);
        let armed = self.bank.arm(
            axis,
            ArmRequest {
                direction,
                steps,
                start_interval: profile.start_interval,
                target_interval: profile.target_interval,
            },
        );
        if armed {
            Ok(())
        } else {
            Err(MotionError::Busy)
        }
    }

    /// Overwrite the commanded position, e.g. after homing
    pub fn set_position(&mut self, position: CartesianPosition) {
        self.position = position;
    }

    /// Last commanded position
    pub fn position(&self) -> CartesianPosition {
        self.position
    }

    /// Check if every axis is idle
    pub fn is_idle(&self) -> bool {
        self.bank.is_idle()
    }

    pub fn bank(&self) -> &'a StepBank {
        self.bank
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn directions(&self) -> &D {
        &self.directions
    }
}

impl<D: DirectionLine, C: Clock> Motion for MotionPlanner<'_, D, C> {
    fn move_to(&mut self, target: CartesianPosition, interval: u32) -> Result<(), MotionError> {
        MotionPlanner::move_to(self, target, interval)
    }

    fn check_reachable(&self, target: CartesianPosition) -> Result<(), MotionError> {
        MotionPlanner::check_reachable(self, target)
    }

    fn position(&self) -> CartesianPosition {
        self.position
    }
}

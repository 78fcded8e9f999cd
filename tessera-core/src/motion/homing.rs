//! Endstop homing
//!
//! Axes are homed one at a time in the order Z, Y, X so the nozzle is
//! raised clear of the board before anything moves horizontally. Each axis
//! probes toward its endstop in fixed-size moves, re-reading the switch
//! between probes.

use heapless::Vec;

use super::axis::Axis;
use super::planner::{MotionPlanner, RampProfile};
use super::position::{CartesianPosition, MotionError};
use crate::config::HomingConfig;
use crate::traits::{Clock, DirectionLine, LimitSwitch};

/// Order axes are homed in
pub const HOMING_ORDER: [Axis; 3] = [Axis::Z, Axis::Y, Axis::X];

/// Homing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// Endstop did not trigger within the probe bound
    HomingTimeout(Axis),
    /// A probe move failed
    Motion(MotionError),
}

impl From<MotionError> for HomingError {
    fn from(err: MotionError) -> Self {
        HomingError::Motion(err)
    }
}

/// Probe moves issued per axis, in the order the axes were homed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingReport {
    pub probes: Vec<(Axis, u32), 3>,
}

impl HomingReport {
    /// Probe moves issued on `axis`
    pub fn probes_for(&self, axis: Axis) -> Option<u32> {
        self.probes
            .iter()
            .find(|(a, _)| *a == axis)
            .map(|&(_, count)| count)
    }
}

/// Drive every axis to its endstop and zero the commanded position
pub fn home_axes<D, C, L>(
    planner: &mut MotionPlanner<'_, D, C>,
    switches: &mut L,
    config: &HomingConfig,
) -> Result<HomingReport, HomingError>
where
    D: DirectionLine,
    C: Clock,
    L: LimitSwitch,
{
    let profile = RampProfile {
        start_interval: config.probe_start_interval,
        target_interval: config.probe_interval,
    };
    let mut report = HomingReport::default();

    for axis in HOMING_ORDER {
        let direction = config.home_direction.get(axis);
        let mut probes = 0u32;

        while !switches.is_triggered(axis) {
            if config.max_probes.is_some_and(|max| probes >= max) {
                #[cfg(feature = "defmt")]
                defmt::warn!("{} endstop not found after {} probes", axis, probes);
                return Err(HomingError::HomingTimeout(axis));
            }
            planner.jog(axis, direction, config.probe_steps, profile)?;
            probes += 1;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("{} homed after {} probes", axis, probes);

        // Capacity matches HOMING_ORDER
        let _ = report.probes.push((axis, probes));
    }

    planner.set_position(CartesianPosition::ORIGIN);
    Ok(report)
}

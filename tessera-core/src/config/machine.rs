//! Machine configuration types
//!
//! Every tuning constant of the motion core is a named field here. Defaults
//! reproduce the calibration of the reference machine; deployments override
//! them from `machine.toml`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::{Axis, Direction, PerAxis};

/// Step scheduler and ramp parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Period of the step tick in microseconds
    pub tick_period_us: u32,
    /// Interval (ticks per half pulse) every move starts from
    pub ramp_start_interval: u32,
    /// Steps before the end of a move where deceleration begins
    pub decel_runway_steps: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_period_us: 10,
            ramp_start_interval: 150,
            decel_runway_steps: 100,
        }
    }
}

/// Homing probe parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HomingConfig {
    /// Steps per probe move
    pub probe_steps: u32,
    /// Interval a probe starts from
    pub probe_start_interval: u32,
    /// Cruise interval of a probe
    pub probe_interval: u32,
    /// Direction each axis travels toward its endstop
    pub home_direction: PerAxis<Direction>,
    /// Probes allowed per axis before giving up (`None` = unbounded)
    pub max_probes: Option<u32>,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            probe_steps: 101,
            probe_start_interval: 20,
            probe_interval: 10,
            home_direction: PerAxis::splat(Direction::Backward),
            max_probes: None,
        }
    }
}

/// Most cartridge slots a machine can carry
pub const MAX_CARTRIDGES: usize = 30;

/// A point in the X/Y plane, in steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanePoint {
    pub x: i32,
    pub y: i32,
}

/// Pick-and-place geometry and speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PickPlaceConfig {
    /// Z height for horizontal travel
    pub safe_z: i32,
    /// Z depth where the nozzle grips a brick in its cartridge
    pub pick_z: i32,
    /// Z depth where a brick is pressed onto the board
    pub place_z: i32,
    /// Cruise interval for horizontal travel
    pub transit_interval: u32,
    /// Cruise interval for descents, lifts and retracts
    pub precise_interval: u32,
    /// Pickup position of slot 0
    pub slot_origin: PlanePoint,
    /// X distance between neighbouring cartridge slots
    pub slot_pitch_x: i32,
    /// Number of cartridge slots, at most [`MAX_CARTRIDGES`]
    pub slot_count: u8,
    /// Position of destination cell (row 0, col 0)
    pub grid_origin: PlanePoint,
    /// Distance between neighbouring destination cells
    pub grid_pitch: PlanePoint,
    /// Destination grid columns
    pub grid_cols: u16,
    /// Destination grid rows
    pub grid_rows: u16,
}

impl Default for PickPlaceConfig {
    fn default() -> Self {
        Self {
            safe_z: 3000,
            pick_z: 8000,
            place_z: 9000,
            transit_interval: 7,
            precise_interval: 10,
            slot_origin: PlanePoint { x: 700, y: 3500 },
            slot_pitch_x: 4000,
            slot_count: 30,
            grid_origin: PlanePoint { x: 45000, y: 3000 },
            grid_pitch: PlanePoint { x: 3200, y: 3200 },
            grid_cols: 20,
            grid_rows: 20,
        }
    }
}

/// Inclusive coordinate range of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Check if a coordinate is within the range
    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Reachable machine volume, in steps from the homed origin
pub type Envelope = PerAxis<AxisRange>;

/// Default envelope covering every slot and grid cell of the default layout
pub const DEFAULT_ENVELOPE: Envelope = PerAxis {
    x: AxisRange::new(0, 130_000),
    y: AxisRange::new(0, 70_000),
    z: AxisRange::new(0, 10_000),
};

/// Bounds on blocking waits
///
/// Both bounds default to unbounded; a deployment chooses values suited to
/// its mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaitLimits {
    /// Longest a single move may take before `MotionTimeout`
    pub max_move_us: Option<u64>,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period must be non-zero
    ZeroTickPeriod,
    /// An interval must be at least one tick
    ZeroInterval,
    /// Probe moves must have at least one step
    ZeroProbeSteps,
    /// A bound of zero would fail every wait
    ZeroLimit,
    /// Envelope range with min above max
    EmptyRange(Axis),
    /// Envelope range wider than a single move can travel
    RangeTooWide(Axis),
    /// Z depths must satisfy safe < pick and safe < place
    ZOrdering,
    /// Grid or slot layout has no cells
    EmptyLayout,
    /// More cartridge slots than [`MAX_CARTRIDGES`]
    TooManySlots,
    /// A slot or grid cell lies outside the envelope
    LayoutOutsideEnvelope,
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    pub motion: MotionConfig,
    pub homing: HomingConfig,
    pub pick_place: PickPlaceConfig,
    pub envelope: Envelope,
    pub limits: WaitLimits,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            version: 1,
            motion: MotionConfig::default(),
            homing: HomingConfig::default(),
            pick_place: PickPlaceConfig::default(),
            envelope: DEFAULT_ENVELOPE,
            limits: WaitLimits::default(),
        }
    }
}

impl MachineConfig {
    /// Check every parameter, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motion.tick_period_us == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        let intervals = [
            self.motion.ramp_start_interval,
            self.homing.probe_start_interval,
            self.homing.probe_interval,
            self.pick_place.transit_interval,
            self.pick_place.precise_interval,
        ];
        if intervals.contains(&0) {
            return Err(ConfigError::ZeroInterval);
        }

        if self.homing.probe_steps == 0 {
            return Err(ConfigError::ZeroProbeSteps);
        }
        if self.homing.max_probes == Some(0) || self.limits.max_move_us == Some(0) {
            return Err(ConfigError::ZeroLimit);
        }

        for axis in Axis::ALL {
            let range = self.envelope.get(axis);
            if range.min > range.max {
                return Err(ConfigError::EmptyRange(axis));
            }
            if range.max.checked_sub(range.min).is_none() {
                return Err(ConfigError::RangeTooWide(axis));
            }
        }

        let pp = &self.pick_place;
        if pp.safe_z >= pp.pick_z || pp.safe_z >= pp.place_z {
            return Err(ConfigError::ZOrdering);
        }
        if pp.slot_count == 0 || pp.grid_cols == 0 || pp.grid_rows == 0 {
            return Err(ConfigError::EmptyLayout);
        }
        if pp.slot_count as usize > MAX_CARTRIDGES {
            return Err(ConfigError::TooManySlots);
        }

        self.validate_layout()
    }

    /// Check the corner slots and corner cells against the envelope
    fn validate_layout(&self) -> Result<(), ConfigError> {
        let pp = &self.pick_place;
        let last_slot = pp.slot_origin.x as i64 + pp.slot_pitch_x as i64 * (pp.slot_count as i64 - 1);
        let last_col = pp.grid_origin.x as i64 + pp.grid_pitch.x as i64 * (pp.grid_cols as i64 - 1);
        let last_row = pp.grid_origin.y as i64 + pp.grid_pitch.y as i64 * (pp.grid_rows as i64 - 1);

        let x_ok = [pp.slot_origin.x as i64, last_slot, pp.grid_origin.x as i64, last_col]
            .iter()
            .all(|&x| in_range(self.envelope.x, x));
        let y_ok = [pp.slot_origin.y as i64, pp.grid_origin.y as i64, last_row]
            .iter()
            .all(|&y| in_range(self.envelope.y, y));
        let z_ok = [pp.safe_z, pp.pick_z, pp.place_z]
            .iter()
            .all(|&z| self.envelope.z.contains(z));

        if x_ok && y_ok && z_ok {
            Ok(())
        } else {
            Err(ConfigError::LayoutOutsideEnvelope)
        }
    }
}

fn in_range(range: AxisRange, value: i64) -> bool {
    value >= range.min as i64 && value <= range.max as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(MachineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_constants() {
        let config = MachineConfig::default();
        assert_eq!(config.motion.tick_period_us, 10);
        assert_eq!(config.motion.ramp_start_interval, 150);
        assert_eq!(config.motion.decel_runway_steps, 100);
        assert_eq!(config.homing.probe_steps, 101);
        assert_eq!(config.homing.max_probes, None);
        assert_eq!(config.limits.max_move_us, None);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = MachineConfig::default();
        config.pick_place.transit_interval = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));

        let mut config = MachineConfig::default();
        config.motion.ramp_start_interval = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = MachineConfig::default();
        config.homing.max_probes = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroLimit));

        let mut config = MachineConfig::default();
        config.limits.max_move_us = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroLimit));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = MachineConfig::default();
        config.envelope.y = AxisRange::new(10, -10);
        assert_eq!(config.validate(), Err(ConfigError::EmptyRange(Axis::Y)));
    }

    #[test]
    fn test_range_wider_than_i32_rejected() {
        let mut config = MachineConfig::default();
        config.envelope.x = AxisRange::new(-2_000_000_000, 2_000_000_000);
        assert_eq!(config.validate(), Err(ConfigError::RangeTooWide(Axis::X)));

        config.envelope.x = AxisRange::new(-1_000_000_000, 1_000_000_000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_z_ordering() {
        let mut config = MachineConfig::default();
        config.pick_place.safe_z = 8000;
        assert_eq!(config.validate(), Err(ConfigError::ZOrdering));
    }

    #[test]
    fn test_layout_outside_envelope() {
        let mut config = MachineConfig::default();
        config.pick_place.grid_cols = 40;
        assert_eq!(config.validate(), Err(ConfigError::LayoutOutsideEnvelope));

        let mut config = MachineConfig::default();
        config.envelope.z = AxisRange::new(0, 8500);
        assert_eq!(config.validate(), Err(ConfigError::LayoutOutsideEnvelope));
    }

    #[test]
    fn test_empty_layout() {
        let mut config = MachineConfig::default();
        config.pick_place.slot_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyLayout));
    }

    #[test]
    fn test_slot_count_capped() {
        let mut config = MachineConfig::default();
        config.pick_place.slot_count = MAX_CARTRIDGES as u8 + 1;
        assert_eq!(config.validate(), Err(ConfigError::TooManySlots));
    }

    #[test]
    fn test_axis_range_contains() {
        let range = AxisRange::new(-5, 5);
        assert!(range.contains(-5));
        assert!(range.contains(5));
        assert!(!range.contains(6));
        assert!(!range.contains(-6));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::motion::Direction;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MachineConfig = toml::from_str(
            r#"
            [homing]
            home_direction = { x = "backward", y = "forward", z = "backward" }
            max_probes = 1500

            [pick_place]
            slot_count = 10
            slot_origin = { x = 900, y = 3500 }

            [envelope]
            x = { min = 0, max = 130000 }
            y = { min = 0, max = 70000 }
            z = { min = 0, max = 10000 }
            "#,
        )
        .unwrap();

        assert_eq!(config.homing.home_direction.y, Direction::Forward);
        assert_eq!(config.homing.max_probes, Some(1500));
        assert_eq!(config.homing.probe_steps, 101);
        assert_eq!(config.pick_place.slot_origin, PlanePoint { x: 900, y: 3500 });
        assert_eq!(config.pick_place.pick_z, 8000);
        assert_eq!(config.motion, MotionConfig::default());
        assert_eq!(config.limits.max_move_us, None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let result = toml::from_str::<MachineConfig>(
            r#"
            [homing]
            home_direction = { x = "up", y = "forward", z = "backward" }
            "#,
        );
        assert!(result.is_err());
    }
}

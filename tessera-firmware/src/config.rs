//! Machine configuration, print pattern and cartridge counts
//!
//! Generated at build time from `machine.toml`, which build.rs has already
//! validated.

use tessera_core::config::{
    AxisRange, HomingConfig, MachineConfig, MotionConfig, PickPlaceConfig, PlanePoint, WaitLimits,
};
use tessera_core::motion::{Direction, PerAxis};

include!(concat!(env!("OUT_DIR"), "/machine_config.rs"));

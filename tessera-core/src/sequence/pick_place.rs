//! Pick-and-place choreography
//!
//! Moves one brick from its cartridge slot to a destination cell:
//!
//! ```text
//!  1 over slot      5 over cell
//!  2 descend        6 descend
//!  3 vacuum on      7 vacuum off
//!  4 lift           8 retract
//! ```
//!
//! Every move is blocking. Horizontal travel only happens at the safe
//! height. No settling delay is inserted around the vacuum switching.

use crate::config::PickPlaceConfig;
use crate::motion::{CartesianPosition, MotionError, MoveRequest};
use crate::traits::{Motion, VacuumActuator};

/// Place one brick of colour `slot` at grid cell (`row`, `col`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PickPlaceCommand {
    pub row: u16,
    pub col: u16,
    pub slot: u8,
}

/// One operation of the choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PickPlaceStep {
    Move(MoveRequest),
    VacuumOn,
    VacuumOff,
}

/// Pick-and-place errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PickPlaceError {
    /// Row or column outside the destination grid
    InvalidCell,
    /// Slot index beyond the configured cartridges
    InvalidSlot,
    /// A move failed part-way through
    Motion(MotionError),
}

impl From<MotionError> for PickPlaceError {
    fn from(err: MotionError) -> Self {
        PickPlaceError::Motion(err)
    }
}

/// Pickup position (X, Y) of a cartridge slot
pub fn slot_position(config: &PickPlaceConfig, slot: u8) -> Result<(i32, i32), PickPlaceError> {
    if slot >= config.slot_count {
        return Err(PickPlaceError::InvalidSlot);
    }
    let x = offset(config.slot_origin.x, config.slot_pitch_x, slot as i32).ok_or(PickPlaceError::InvalidSlot)?;
    Ok((x, config.slot_origin.y))
}

/// Placement position (X, Y) of a destination cell
pub fn cell_position(config: &PickPlaceConfig, row: u16, col: u16) -> Result<(i32, i32), PickPlaceError> {
    if row >= config.grid_rows || col >= config.grid_cols {
        return Err(PickPlaceError::InvalidCell);
    }
    let x = offset(config.grid_origin.x, config.grid_pitch.x, col as i32);
    let y = offset(config.grid_origin.y, config.grid_pitch.y, row as i32);
    match (x, y) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(PickPlaceError::InvalidCell),
    }
}

/// `origin + pitch * index`, or `None` if it leaves the `i32` range
fn offset(origin: i32, pitch: i32, index: i32) -> Option<i32> {
    pitch.checked_mul(index)?.checked_add(origin)
}

/// Expand a command into its eight operations
pub fn plan(command: PickPlaceCommand, config: &PickPlaceConfig) -> Result<[PickPlaceStep; 8], PickPlaceError> {
    let (src_x, src_y) = slot_position(config, command.slot)?;
    let (dst_x, dst_y) = cell_position(config, command.row, command.col)?;

    let transit = config.transit_interval;
    let precise = config.precise_interval;
    let to = |x, y, z, interval| PickPlaceStep::Move(MoveRequest::new(CartesianPosition::new(x, y, z), interval));

    Ok([
        to(src_x, src_y, config.safe_z, transit),
        to(src_x, src_y, config.pick_z, precise),
        PickPlaceStep::VacuumOn,
        to(src_x, src_y, config.safe_z, precise),
        to(dst_x, dst_y, config.safe_z, transit),
        to(dst_x, dst_y, config.place_z, precise),
        PickPlaceStep::VacuumOff,
        to(dst_x, dst_y, config.safe_z, precise),
    ])
}

/// Run the choreography for one brick
///
/// The command and every target are validated before anything moves. If a
/// move fails the vacuum is left in whatever state it had reached.
pub fn pick_and_place<M, V>(
    motion: &mut M,
    vacuum: &mut V,
    command: PickPlaceCommand,
    config: &PickPlaceConfig,
) -> Result<(), PickPlaceError>
where
    M: Motion,
    V: VacuumActuator,
{
    let steps = plan(command, config)?;
    for step in &steps {
        if let PickPlaceStep::Move(request) = step {
            motion.check_reachable(request.target)?;
        }
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("slot {} -> cell ({}, {})", command.slot, command.row, command.col);

    for step in steps {
        match step {
            PickPlaceStep::Move(request) => motion.move_to(request.target, request.interval)?,
            PickPlaceStep::VacuumOn => vacuum.activate(),
            PickPlaceStep::VacuumOff => vacuum.deactivate(),
        }
    }
    Ok(())
}

//! Print job runner
//!
//! Walks a pattern in raster order and places one brick for every cell
//! that is not background. The stop flag and the cartridge inventory are
//! checked before each brick so a job can end between pieces, never in the
//! middle of one.

use portable_atomic::{AtomicBool, Ordering};

use super::inventory::Inventory;
use super::pick_place::{pick_and_place, PickPlaceCommand, PickPlaceError};
use crate::config::PickPlaceConfig;
use crate::motion::HomingError;
use crate::traits::{Motion, VacuumActuator};

/// A raster of cells, each background (`None`) or a cartridge slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern<'a> {
    cells: &'a [Option<u8>],
    width: u16,
}

impl<'a> Pattern<'a> {
    /// Wrap row-major `cells` of the given width
    pub fn new(cells: &'a [Option<u8>], width: u16) -> Result<Self, JobError> {
        if width == 0 || cells.is_empty() || cells.len() % width as usize != 0 {
            return Err(JobError::InvalidPattern);
        }
        if cells.len() / width as usize > u16::MAX as usize {
            return Err(JobError::InvalidPattern);
        }
        Ok(Self { cells, width })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        (self.cells.len() / self.width as usize) as u16
    }

    /// Number of cells including background
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of bricks the pattern needs
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Placement command for every non-background cell, in raster order
    pub fn commands(&self) -> impl Iterator<Item = (usize, PickPlaceCommand)> + 'a {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|slot| {
                let command = PickPlaceCommand {
                    row: (i / width) as u16,
                    col: (i % width) as u16,
                    slot,
                };
                (i, command)
            })
        })
    }
}

/// Job progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Progress {
    /// Cells walked so far, background included
    pub visited: u32,
    /// Cells in the pattern
    pub total: u32,
    /// Bricks placed so far
    pub placed: u32,
    /// Bricks left per cartridge slot
    pub inventory: Inventory,
}

impl Progress {
    /// Percentage of cells walked
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.visited as u64 * 100 / self.total as u64) as u8
    }
}

/// Job errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobError {
    /// Homing before the first brick failed
    Homing(HomingError),
    /// Placing the brick for cell `index` failed
    PickPlace { index: u32, error: PickPlaceError },
    /// Stop flag was raised
    Cancelled,
    /// The next brick needs a cartridge that has run out
    SlotEmpty { slot: u8 },
    /// Pattern is empty, ragged or larger than the grid
    InvalidPattern,
}

impl From<HomingError> for JobError {
    fn from(err: HomingError) -> Self {
        JobError::Homing(err)
    }
}

/// Place every brick of `pattern`, reporting progress after each cell
///
/// Background cells only advance progress. Each placed brick is taken from
/// `inventory`. The machine must already be homed.
pub fn run_pattern<M, V, F>(
    motion: &mut M,
    vacuum: &mut V,
    pattern: &Pattern<'_>,
    config: &PickPlaceConfig,
    inventory: &mut Inventory,
    stop: &AtomicBool,
    mut on_progress: F,
) -> Result<Progress, JobError>
where
    M: Motion,
    V: VacuumActuator,
    F: FnMut(Progress),
{
    if pattern.width() > config.grid_cols || pattern.height() > config.grid_rows {
        return Err(JobError::InvalidPattern);
    }

    let mut progress = Progress {
        visited: 0,
        total: pattern.len() as u32,
        placed: 0,
        inventory: *inventory,
    };

    let mut next = 0usize;
    for (index, command) in pattern.commands() {
        // Background cells before this brick
        progress.visited += (index - next) as u32;
        next = index + 1;

        if stop.load(Ordering::Acquire) {
            #[cfg(feature = "defmt")]
            defmt::info!("job cancelled at cell {}", index);
            return Err(JobError::Cancelled);
        }
        inventory.check(command.slot)?;

        pick_and_place(motion, vacuum, command, config).map_err(|error| JobError::PickPlace {
            index: index as u32,
            error,
        })?;

        inventory.take(command.slot);
        progress.visited += 1;
        progress.placed += 1;
        progress.inventory = *inventory;
        on_progress(progress);
    }

    progress.visited = progress.total;
    on_progress(progress);
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{CartesianPosition, MotionError};
    use crate::testing::{FakeMotion, FakeVacuum, Op, OpLog};
    use std::vec::Vec;

    const B: Option<u8> = None;

    #[test]
    fn test_pattern_validation() {
        let cells = [B, Some(1), B, Some(2), B, B];
        assert!(Pattern::new(&cells, 3).is_ok());
        assert_eq!(Pattern::new(&cells, 4), Err(JobError::InvalidPattern));
        assert_eq!(Pattern::new(&cells, 0), Err(JobError::InvalidPattern));
        assert_eq!(Pattern::new(&[], 1), Err(JobError::InvalidPattern));

        let pattern = Pattern::new(&cells, 2).unwrap();
        assert_eq!(pattern.height(), 3);
        assert_eq!(pattern.piece_count(), 2);
    }

    #[test]
    fn test_commands_in_raster_order() {
        let cells = [Some(4), B, B, B, B, Some(7)];
        let pattern = Pattern::new(&cells, 3).unwrap();
        let commands: Vec<_> = pattern.commands().collect();
        assert_eq!(
            commands,
            std::vec![
                (0, PickPlaceCommand { row: 0, col: 0, slot: 4 }),
                (5, PickPlaceCommand { row: 1, col: 2, slot: 7 }),
            ]
        );
    }

    /// (visited, total, placed)
    fn counts(progress: &Progress) -> (u32, u32, u32) {
        (progress.visited, progress.total, progress.placed)
    }

    #[test]
    fn test_runs_every_piece_and_skips_background() {
        let config = PickPlaceConfig::default();
        let cells = [B, Some(0), B, B, Some(2), B];
        let pattern = Pattern::new(&cells, 3).unwrap();
        let log = OpLog::default();
        let mut motion = FakeMotion::with_log(log.clone());
        let mut vacuum = FakeVacuum::with_log(log.clone());
        let mut inventory = Inventory::untracked();
        let stop = AtomicBool::new(false);
        let mut reports = Vec::new();

        let done = run_pattern(&mut motion, &mut vacuum, &pattern, &config, &mut inventory, &stop, |p| {
            reports.push(counts(&p))
        })
        .unwrap();

        assert_eq!(counts(&done), (6, 6, 2));
        assert_eq!(done.percent(), 100);
        assert_eq!(reports, std::vec![(2, 6, 1), (5, 6, 2), (6, 6, 2)]);
        assert_eq!(Progress { visited: 2, total: 6, ..done }.percent(), 33);

        // Two bricks of eight operations each, second one at (row 1, col 1)
        let ops = log.borrow();
        assert_eq!(ops.len(), 16);
        assert_eq!(
            ops[12],
            Op::Move(CartesianPosition::new(45000 + 3200, 3000 + 3200, 3000), 7)
        );
    }

    #[test]
    fn test_stop_flag_cancels_between_pieces() {
        let config = PickPlaceConfig::default();
        let cells = [Some(0), Some(1), Some(2)];
        let pattern = Pattern::new(&cells, 3).unwrap();
        let log = OpLog::default();
        let mut motion = FakeMotion::with_log(log.clone());
        let mut vacuum = FakeVacuum::with_log(log.clone());
        let mut inventory = Inventory::untracked();
        let stop = AtomicBool::new(false);

        let result = run_pattern(&mut motion, &mut vacuum, &pattern, &config, &mut inventory, &stop, |p| {
            if p.placed == 1 {
                stop.store(true, Ordering::Release);
            }
        });

        assert_eq!(result, Err(JobError::Cancelled));
        assert_eq!(log.borrow().len(), 8);
        assert!(!vacuum.is_active());
    }

    #[test]
    fn test_inventory_counts_down_and_stops_on_empty_slot() {
        let config = PickPlaceConfig::default();
        let cells = [Some(1), Some(0), Some(1), Some(1)];
        let pattern = Pattern::new(&cells, 4).unwrap();
        let log = OpLog::default();
        let mut motion = FakeMotion::with_log(log.clone());
        let mut vacuum = FakeVacuum::with_log(log.clone());
        let mut inventory = Inventory::with_capacities(&[5, 2]).unwrap();
        let stop = AtomicBool::new(false);
        let mut remaining = Vec::new();

        let result = run_pattern(&mut motion, &mut vacuum, &pattern, &config, &mut inventory, &stop, |p| {
            remaining.push((p.inventory.remaining(0), p.inventory.remaining(1)))
        });

        // Third brick from slot 1 finds the cartridge empty before picking
        assert_eq!(result, Err(JobError::SlotEmpty { slot: 1 }));
        assert_eq!(
            remaining,
            std::vec![(Some(5), Some(1)), (Some(4), Some(1)), (Some(4), Some(0))]
        );
        assert_eq!(inventory.remaining(1), Some(0));
        assert_eq!(log.borrow().len(), 3 * 8);
        assert!(!vacuum.is_active());
    }

    #[test]
    fn test_failure_reports_cell() {
        let config = PickPlaceConfig::default();
        let cells = [Some(0), B, Some(1)];
        let pattern = Pattern::new(&cells, 3).unwrap();
        let mut motion = FakeMotion::default();
        motion.fail_at = Some((9, MotionError::MotionTimeout));
        let mut vacuum = FakeVacuum::default();
        let mut inventory = Inventory::with_capacities(&[3, 3]).unwrap();
        let stop = AtomicBool::new(false);

        let result = run_pattern(&mut motion, &mut vacuum, &pattern, &config, &mut inventory, &stop, |_| {});

        assert_eq!(
            result,
            Err(JobError::PickPlace {
                index: 2,
                error: PickPlaceError::Motion(MotionError::MotionTimeout),
            })
        );
        // Only the brick that was fully placed is taken from stock
        assert_eq!(inventory.remaining(0), Some(2));
        assert_eq!(inventory.remaining(1), Some(3));
    }

    #[test]
    fn test_pattern_larger_than_grid() {
        let mut config = PickPlaceConfig::default();
        config.grid_cols = 2;
        let cells = [Some(0), B, B];
        let pattern = Pattern::new(&cells, 3).unwrap();
        let stop = AtomicBool::new(false);

        let result = run_pattern(
            &mut FakeMotion::default(),
            &mut FakeVacuum::default(),
            &pattern,
            &config,
            &mut Inventory::untracked(),
            &stop,
            |_| {},
        );
        assert_eq!(result, Err(JobError::InvalidPattern));
    }
}

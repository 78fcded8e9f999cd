//! Shared per-axis step bank
//!
//! The bank is the only state shared between the step tick handler and the
//! foreground controller. Ownership of each field is split so that no field
//! ever has two concurrent writers:
//!
//! | field              | written by                                   |
//! |--------------------|----------------------------------------------|
//! | `direction`        | foreground, at arm time                      |
//! | `target_interval`  | foreground, at arm time                      |
//! | `current_interval` | foreground at arm time, then tick handler    |
//! | `steps_remaining`  | foreground at arm time, then tick handler    |
//! | `tick_counter`     | tick handler                                 |
//! | `pulse_high`       | tick handler                                 |
//!
//! The foreground only arms an axis whose `steps_remaining` is zero, which is
//! exactly when the handler stops writing it. `steps_remaining` is stored
//! last with release ordering so the handler observes a fully armed axis.
//! Every access is a plain load or store, so the bank works on cores
//! without compare-and-swap.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use super::axis::{Axis, AxisState, Direction};

/// Arm-time parameters for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmRequest {
    pub direction: Direction,
    pub steps: u32,
    /// Interval the ramp starts from
    pub start_interval: u32,
    /// Cruise interval the ramp accelerates toward
    pub target_interval: u32,
}

/// Atomic storage for one axis
pub(crate) struct AxisCell {
    pub(crate) backward: AtomicBool,
    pub(crate) steps_remaining: AtomicU32,
    pub(crate) pulse_high: AtomicBool,
    pub(crate) tick_counter: AtomicU32,
    pub(crate) current_interval: AtomicU32,
    pub(crate) target_interval: AtomicU32,
}

impl AxisCell {
    const fn new() -> Self {
        Self {
            backward: AtomicBool::new(false),
            steps_remaining: AtomicU32::new(0),
            pulse_high: AtomicBool::new(false),
            tick_counter: AtomicU32::new(0),
            current_interval: AtomicU32::new(0),
            target_interval: AtomicU32::new(0),
        }
    }
}

/// Step state for X, Y and Z plus a tick count
///
/// Construct once (usually as a `static`) and share by reference between the
/// step scheduler and the motion planner.
pub struct StepBank {
    axes: [AxisCell; 3],
    ticks: AtomicU32,
}

impl Default for StepBank {
    fn default() -> Self {
        Self::new()
    }
}

impl StepBank {
    /// Create an idle bank
    pub const fn new() -> Self {
        Self {
            axes: [AxisCell::new(), AxisCell::new(), AxisCell::new()],
            ticks: AtomicU32::new(0),
        }
    }

    pub(crate) fn cell(&self, axis: Axis) -> &AxisCell {
        &self.axes[axis.index()]
    }

    /// Arm an idle axis for a new move
    ///
    /// Returns `false` without touching the axis if a move is still in
    /// flight on it.
    pub fn arm(&self, axis: Axis, request: ArmRequest) -> bool {
        let cell = self.cell(axis);
        if cell.steps_remaining.load(Ordering::Acquire) != 0 {
            return false;
        }

        cell.backward
            .store(request.direction == Direction::Backward, Ordering::Relaxed);
        cell.target_interval
            .store(request.target_interval, Ordering::Relaxed);
        cell.current_interval
            .store(request.start_interval, Ordering::Relaxed);
        // Publish last: the handler picks the axis up once this is non-zero
        cell.steps_remaining.store(request.steps, Ordering::Release);
        true
    }

    /// Steps left on one axis
    pub fn steps_remaining(&self, axis: Axis) -> u32 {
        self.cell(axis).steps_remaining.load(Ordering::Acquire)
    }

    /// Check if one axis has finished its move
    pub fn is_axis_idle(&self, axis: Axis) -> bool {
        self.steps_remaining(axis) == 0
    }

    /// Check if every axis has finished its move
    pub fn is_idle(&self) -> bool {
        Axis::ALL.iter().all(|&axis| self.is_axis_idle(axis))
    }

    /// Number of scheduler ticks since start (wrapping)
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Record one scheduler tick; tick handler only
    pub(crate) fn record_tick(&self) {
        let next = self.ticks.load(Ordering::Relaxed).wrapping_add(1);
        self.ticks.store(next, Ordering::Relaxed);
    }

    /// Copy out one axis' record
    pub fn snapshot(&self, axis: Axis) -> AxisState {
        let cell = self.cell(axis);
        AxisState {
            direction: if cell.backward.load(Ordering::Relaxed) {
                Direction::Backward
            } else {
                Direction::Forward
            },
            steps_remaining: cell.steps_remaining.load(Ordering::Acquire),
            pulse_high: cell.pulse_high.load(Ordering::Relaxed),
            tick_counter: cell.tick_counter.load(Ordering::Relaxed),
            current_interval: cell.current_interval.load(Ordering::Relaxed),
            target_interval: cell.target_interval.load(Ordering::Relaxed),
        }
    }
}

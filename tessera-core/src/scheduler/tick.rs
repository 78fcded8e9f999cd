//! Fixed-period step tick handler
//!
//! Each armed axis toggles its step output every `current_interval` ticks.
//! A rising edge starts a step; the falling edge completes it, consumes one
//! of `steps_remaining` and moves the interval one tick along the ramp:
//!
//! ```text
//!  interval
//!   start ┐                          ┌
//!         └┐                       ┌─┘
//!          └──┐                 ┌──┘
//!  target     └─────────────────┘
//!                               │<- runway ->│
//! ```
//!
//! The interval shrinks toward the target while more than the runway's
//! worth of steps remain, and grows for the final runway steps. Short moves
//! never reach the target interval. Deceleration has no ceiling; the
//! interval saturates at `u32::MAX`.

use portable_atomic::Ordering;

use crate::config::MotionConfig;
use crate::motion::{Axis, StepBank};
use crate::traits::StepLine;

/// Tick handler owning the step outputs
///
/// This is the only writer of the per-tick fields of the bank.
pub struct StepScheduler<'a, S: StepLine> {
    bank: &'a StepBank,
    lines: S,
    runway: u32,
}

impl<'a, S: StepLine> StepScheduler<'a, S> {
    /// Create a scheduler with the given deceleration runway
    pub fn new(bank: &'a StepBank, lines: S, runway: u32) -> Self {
        Self {
            bank,
            lines,
            runway,
        }
    }

    /// Create a scheduler using the runway from `config`
    pub fn from_config(bank: &'a StepBank, lines: S, config: &MotionConfig) -> Self {
        Self::new(bank, lines, config.decel_runway_steps)
    }

    /// Advance all axes by one tick
    pub fn tick(&mut self) {
        for axis in Axis::ALL {
            self.tick_axis(axis);
        }
        self.bank.record_tick();
    }

    fn tick_axis(&mut self, axis: Axis) {
        let cell = self.bank.cell(axis);

        let steps = cell.steps_remaining.load(Ordering::Acquire);
        if steps == 0 {
            return;
        }

        let mut pulse_high = cell.pulse_high.load(Ordering::Relaxed);
        let counter = cell.tick_counter.load(Ordering::Relaxed).wrapping_add(1);
        let interval = cell.current_interval.load(Ordering::Relaxed);

        if counter >= interval {
            cell.tick_counter.store(0, Ordering::Relaxed);
            pulse_high = !pulse_high;
            cell.pulse_high.store(pulse_high, Ordering::Relaxed);

            if !pulse_high {
                let remaining = steps - 1;
                let target = cell.target_interval.load(Ordering::Relaxed);
                let next = if interval > target && remaining > self.runway {
                    interval - 1
                } else {
                    interval.saturating_add(1)
                };
                cell.current_interval.store(next, Ordering::Relaxed);
                // Publish last: zero hands the axis back to the foreground
                cell.steps_remaining.store(remaining, Ordering::Release);
            }
        } else {
            cell.tick_counter.store(counter, Ordering::Relaxed);
        }

        self.lines.set_step(axis, pulse_high);
    }

    /// Shared bank this scheduler advances
    pub fn bank(&self) -> &'a StepBank {
        self.bank
    }

    /// Step outputs
    pub fn lines(&self) -> &S {
        &self.lines
    }

    /// Mutable step outputs
    pub fn lines_mut(&mut self) -> &mut S {
        &mut self.lines
    }
}

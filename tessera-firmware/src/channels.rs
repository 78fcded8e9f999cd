//! Inter-task communication
//!
//! The controller publishes job status for the status task; the stop
//! button raises a flag the job runner checks between bricks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use tessera_core::sequence::Progress;
use tessera_core::state::State;

/// Print job status as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobStatus {
    /// Homing before the first brick
    Homing,
    /// A brick was placed
    Printing(Progress),
    /// Every brick was placed
    Complete(Progress),
    /// Stop button pressed
    Cancelled,
    /// Job stopped before picking from an empty cartridge
    SlotEmpty(u8),
    /// Job aborted; the machine needs attention
    Failed(State),
}

/// Latest job status (updated by controller)
pub static JOB_STATUS: Signal<CriticalSectionRawMutex, JobStatus> = Signal::new();

/// Set by the stop button, read by the job runner between bricks
pub static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

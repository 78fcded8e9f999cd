//! Events that trigger state transitions

use super::machine::ErrorKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Homing events
    /// Homing started
    StartHoming,
    /// All axes found their endstops
    HomingComplete,

    // Job events
    /// Print job started
    StartPrint,
    /// Every brick of the job was placed
    PrintFinished,
    /// Job or homing abandoned by the operator
    Cancel,
    /// Finished job dismissed
    Dismiss,

    // Fault events
    /// Controller-detected failure
    ErrorDetected(ErrorKind),
    /// Operator acknowledged the fault
    AcknowledgeError,
}

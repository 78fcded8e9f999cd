//! Vacuum nozzle trait

/// Binary suction output on the pick-and-place nozzle
///
/// Both operations are idempotent.
pub trait VacuumActuator {
    /// Turn suction on
    fn activate(&mut self);

    /// Turn suction off
    fn deactivate(&mut self);

    /// Check if suction is currently on
    fn is_active(&self) -> bool;
}

//! State machine definition

use super::events::Event;
use crate::motion::{HomingError, MotionError};
use crate::sequence::{JobError, PickPlaceError};

/// Printer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Powered up, position unknown
    Idle,
    /// Driving axes to their endstops
    Homing,
    /// Homed and waiting for a job
    Ready,
    /// Placing bricks
    Printing,
    /// Last job placed every brick
    Complete,
    /// Fault detected; position can no longer be trusted
    Error(ErrorKind),
}

/// Types of faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// An endstop never triggered
    HomingTimeout,
    /// A move did not finish in time
    MotionTimeout,
    /// A move targeted a point outside the machine
    OutOfEnvelope,
    /// A command or pattern was rejected mid-job
    InvalidCommand,
}

impl From<MotionError> for ErrorKind {
    fn from(err: MotionError) -> Self {
        match err {
            MotionError::OutOfEnvelope(_) => ErrorKind::OutOfEnvelope,
            MotionError::InvalidSpeed => ErrorKind::InvalidCommand,
            // An axis still in flight only happens after a timed-out move
            MotionError::Busy | MotionError::MotionTimeout => ErrorKind::MotionTimeout,
        }
    }
}

impl From<HomingError> for ErrorKind {
    fn from(err: HomingError) -> Self {
        match err {
            HomingError::HomingTimeout(_) => ErrorKind::HomingTimeout,
            HomingError::Motion(err) => err.into(),
        }
    }
}

impl From<PickPlaceError> for ErrorKind {
    fn from(err: PickPlaceError) -> Self {
        match err {
            PickPlaceError::InvalidCell | PickPlaceError::InvalidSlot => ErrorKind::InvalidCommand,
            PickPlaceError::Motion(err) => err.into(),
        }
    }
}

impl ErrorKind {
    /// Fault kind for a failed job
    ///
    /// `None` for a job that stopped cleanly between bricks: a cancellation
    /// or an empty cartridge waiting for a refill.
    pub fn from_job(err: JobError) -> Option<Self> {
        match err {
            JobError::Homing(err) => Some(err.into()),
            JobError::PickPlace { error, .. } => Some(error.into()),
            JobError::InvalidPattern => Some(ErrorKind::InvalidCommand),
            JobError::Cancelled | JobError::SlotEmpty { .. } => None,
        }
    }
}

impl State {
    /// Check if the commanded position is trustworthy
    pub fn is_homed(&self) -> bool {
        matches!(self, State::Ready | State::Printing | State::Complete)
    }

    /// Check if a job may be started
    pub fn can_start_job(&self) -> bool {
        matches!(self, State::Idle | State::Ready | State::Complete)
    }

    /// Check if this is an error state
    pub fn is_error(&self) -> bool {
        matches!(self, State::Error(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Idle transitions
            (Idle, StartHoming) => Homing,
            (Idle, ErrorDetected(kind)) => Error(kind),

            // Homing transitions
            (Homing, HomingComplete) => Ready,
            (Homing, Cancel) => Idle,
            (Homing, ErrorDetected(kind)) => Error(kind),

            // Ready transitions
            (Ready, StartHoming) => Homing,
            (Ready, StartPrint) => Printing,
            (Ready, ErrorDetected(kind)) => Error(kind),

            // Printing transitions
            (Printing, PrintFinished) => Complete,
            (Printing, Cancel) => Ready,
            (Printing, ErrorDetected(kind)) => Error(kind),

            // Complete transitions
            (Complete, StartHoming) => Homing,
            (Complete, StartPrint) => Printing,
            (Complete, Dismiss) => Ready,
            (Complete, ErrorDetected(kind)) => Error(kind),

            // Error transitions; position is lost so homing is required again
            (Error(_), AcknowledgeError) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Axis;

    #[test]
    fn test_print_flow() {
        let state = State::Idle.transition(Event::StartHoming);
        assert_eq!(state, State::Homing);
        let state = state.transition(Event::HomingComplete);
        assert_eq!(state, State::Ready);
        let state = state.transition(Event::StartPrint);
        assert_eq!(state, State::Printing);
        let state = state.transition(Event::PrintFinished);
        assert_eq!(state, State::Complete);
        assert_eq!(state.transition(Event::Dismiss), State::Ready);
    }

    #[test]
    fn test_error_from_any_active_state() {
        let states = [
            State::Idle,
            State::Homing,
            State::Ready,
            State::Printing,
            State::Complete,
        ];

        for state in states {
            let next = state.transition(Event::ErrorDetected(ErrorKind::MotionTimeout));
            assert_eq!(next, State::Error(ErrorKind::MotionTimeout));
        }
    }

    #[test]
    fn test_error_requires_acknowledge() {
        let state = State::Error(ErrorKind::HomingTimeout);
        assert_eq!(state.transition(Event::StartHoming), state);
        assert_eq!(state.transition(Event::StartPrint), state);
        assert_eq!(state.transition(Event::AcknowledgeError), State::Idle);
    }

    #[test]
    fn test_cancel() {
        assert_eq!(State::Printing.transition(Event::Cancel), State::Ready);
        assert_eq!(State::Homing.transition(Event::Cancel), State::Idle);
        assert_eq!(State::Ready.transition(Event::Cancel), State::Ready);
    }

    #[test]
    fn test_cannot_print_unhomed() {
        assert_eq!(State::Idle.transition(Event::StartPrint), State::Idle);
        assert!(!State::Idle.is_homed());
        assert!(State::Ready.is_homed());
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            ErrorKind::from(HomingError::HomingTimeout(Axis::Z)),
            ErrorKind::HomingTimeout
        );
        assert_eq!(
            ErrorKind::from(PickPlaceError::Motion(MotionError::OutOfEnvelope(Axis::X))),
            ErrorKind::OutOfEnvelope
        );
        assert_eq!(ErrorKind::from(MotionError::Busy), ErrorKind::MotionTimeout);
        assert_eq!(ErrorKind::from_job(JobError::Cancelled), None);
        assert_eq!(ErrorKind::from_job(JobError::SlotEmpty { slot: 3 }), None);
        assert_eq!(
            ErrorKind::from_job(JobError::InvalidPattern),
            Some(ErrorKind::InvalidCommand)
        );
    }
}

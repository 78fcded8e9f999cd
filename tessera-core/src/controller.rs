//! Printer controller
//!
//! Owns the planner, the vacuum, the endstops and the lifecycle state. All
//! foreground operations go through here so the state machine always
//! reflects what the hardware has been told to do.

use portable_atomic::AtomicBool;

use crate::config::{ConfigError, MachineConfig};
use crate::motion::{home_axes, CartesianPosition, HomingError, HomingReport, MotionError, MotionPlanner};
use crate::sequence::{
    pick_and_place, run_pattern, Inventory, JobError, Pattern, PickPlaceCommand, PickPlaceError, Progress,
};
use crate::state::{ErrorKind, Event, State};
use crate::traits::{Clock, DirectionLine, LimitSwitch, VacuumActuator};

/// Controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Operation not permitted in the current state
    InvalidState(State),
    Homing(HomingError),
    Motion(MotionError),
    PickPlace(PickPlaceError),
    Job(JobError),
}

impl From<HomingError> for ControllerError {
    fn from(err: HomingError) -> Self {
        ControllerError::Homing(err)
    }
}

impl From<MotionError> for ControllerError {
    fn from(err: MotionError) -> Self {
        ControllerError::Motion(err)
    }
}

impl From<PickPlaceError> for ControllerError {
    fn from(err: PickPlaceError) -> Self {
        ControllerError::PickPlace(err)
    }
}

impl From<JobError> for ControllerError {
    fn from(err: JobError) -> Self {
        ControllerError::Job(err)
    }
}

/// Single owner of all motion state
pub struct Controller<'a, D, C, V, L>
where
    D: DirectionLine,
    C: Clock,
    V: VacuumActuator,
    L: LimitSwitch,
{
    planner: MotionPlanner<'a, D, C>,
    vacuum: V,
    switches: L,
    config: MachineConfig,
    inventory: Inventory,
    state: State,
}

impl<'a, D, C, V, L> Controller<'a, D, C, V, L>
where
    D: DirectionLine,
    C: Clock,
    V: VacuumActuator,
    L: LimitSwitch,
{
    /// Create a controller in the `Idle` state
    ///
    /// Fails if `config` does not validate. Cartridges start untracked.
    pub fn new(
        planner: MotionPlanner<'a, D, C>,
        vacuum: V,
        switches: L,
        config: MachineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            planner,
            vacuum,
            switches,
            config,
            inventory: Inventory::untracked(),
            state: State::Idle,
        })
    }

    /// Load brick counts for slots `0..capacities.len()`
    ///
    /// An empty slice stops tracking.
    pub fn load_cartridges(&mut self, capacities: &[u16]) -> Result<(), ConfigError> {
        if capacities.len() > self.config.pick_place.slot_count as usize {
            return Err(ConfigError::TooManySlots);
        }
        self.inventory = Inventory::with_capacities(capacities)?;
        Ok(())
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    fn apply(&mut self, event: Event) {
        let next = self.state.transition(event);
        #[cfg(feature = "defmt")]
        {
            if next != self.state {
                defmt::debug!("state {} -> {}", self.state, next);
            }
        }
        self.state = next;
    }

    fn fault(&mut self, kind: ErrorKind) {
        #[cfg(feature = "defmt")]
        defmt::error!("fault: {}", kind);
        self.apply(Event::ErrorDetected(kind));
    }

    /// Home all axes, establishing the origin
    pub fn home(&mut self) -> Result<HomingReport, ControllerError> {
        if self.state == State::Printing || self.state.is_error() {
            return Err(ControllerError::InvalidState(self.state));
        }

        self.apply(Event::StartHoming);
        match home_axes(&mut self.planner, &mut self.switches, &self.config.homing) {
            Ok(report) => {
                self.apply(Event::HomingComplete);
                Ok(report)
            }
            Err(err) => {
                self.fault(err.into());
                Err(err.into())
            }
        }
    }

    /// Blocking absolute move of a homed machine
    ///
    /// Rejected requests leave the state untouched; a timeout faults.
    pub fn move_to(&mut self, target: CartesianPosition, interval: u32) -> Result<(), ControllerError> {
        self.require_homed()?;
        self.planner.move_to(target, interval).map_err(|err| {
            if err == MotionError::MotionTimeout {
                self.fault(err.into());
            }
            err.into()
        })
    }

    /// Place a single brick
    ///
    /// Every target is checked before the first move, so only a timeout
    /// faults. Manual placements are not taken from the inventory.
    pub fn pick_and_place(&mut self, command: PickPlaceCommand) -> Result<(), ControllerError> {
        self.require_homed()?;
        let result = pick_and_place(&mut self.planner, &mut self.vacuum, command, &self.config.pick_place);
        if let Err(PickPlaceError::Motion(err @ MotionError::MotionTimeout)) = result {
            self.fault(err.into());
        }
        result.map_err(Into::into)
    }

    /// Home, then place every brick of `pattern`
    ///
    /// A raised `stop` flag or an empty cartridge ends the job between
    /// bricks and returns the machine to `Ready`.
    pub fn run_job<F>(&mut self, pattern: &Pattern<'_>, stop: &AtomicBool, on_progress: F) -> Result<Progress, ControllerError>
    where
        F: FnMut(Progress),
    {
        if !self.state.can_start_job() {
            return Err(ControllerError::InvalidState(self.state));
        }

        self.home().map_err(|err| match err {
            ControllerError::Homing(err) => ControllerError::Job(JobError::Homing(err)),
            other => other,
        })?;
        self.apply(Event::StartPrint);

        #[cfg(feature = "defmt")]
        defmt::info!("printing {} bricks", pattern.piece_count());

        let result = run_pattern(
            &mut self.planner,
            &mut self.vacuum,
            pattern,
            &self.config.pick_place,
            &mut self.inventory,
            stop,
            on_progress,
        );

        match result {
            Ok(progress) => {
                self.apply(Event::PrintFinished);
                Ok(progress)
            }
            Err(err) => {
                match ErrorKind::from_job(err) {
                    Some(kind) => self.fault(kind),
                    None => self.apply(Event::Cancel),
                }
                Err(err.into())
            }
        }
    }

    /// Clear a fault and release the vacuum
    ///
    /// The machine returns to `Idle` and must be homed again.
    pub fn acknowledge_error(&mut self) {
        if self.state.is_error() {
            self.vacuum.deactivate();
            self.apply(Event::AcknowledgeError);
        }
    }

    /// Dismiss a completed job
    pub fn dismiss(&mut self) {
        self.apply(Event::Dismiss);
    }

    fn require_homed(&self) -> Result<(), ControllerError> {
        if self.state.is_homed() && self.state != State::Printing {
            Ok(())
        } else {
            Err(ControllerError::InvalidState(self.state))
        }
    }

    /// Last commanded position
    pub fn position(&self) -> CartesianPosition {
        self.planner.position()
    }

    /// Bricks left per cartridge slot
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn planner(&self) -> &MotionPlanner<'a, D, C> {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut MotionPlanner<'a, D, C> {
        &mut self.planner
    }

    pub fn vacuum(&self) -> &V {
        &self.vacuum
    }

    pub fn switches(&self) -> &L {
        &self.switches
    }
}

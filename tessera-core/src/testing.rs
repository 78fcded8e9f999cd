//! Host-side fakes for exercising the core without hardware

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::config::{Envelope, MachineConfig};
use crate::motion::{Axis, CartesianPosition, Direction, MotionError, MotionPlanner, PerAxis, StepBank};
use crate::scheduler::StepScheduler;
use crate::traits::{Clock, DirectionLine, LimitSwitch, Motion, StepLine, VacuumActuator};

/// Step outputs that count rising edges per axis
#[derive(Debug, Default)]
pub struct RecordingSteps {
    pub level: PerAxis<bool>,
    pub pulses: PerAxis<u32>,
    pub writes: u32,
}

impl RecordingSteps {
    pub fn total_pulses(&self) -> u32 {
        self.pulses.x + self.pulses.y + self.pulses.z
    }
}

impl StepLine for RecordingSteps {
    fn set_step(&mut self, axis: Axis, high: bool) {
        let (level, pulses) = match axis {
            Axis::X => (&mut self.level.x, &mut self.pulses.x),
            Axis::Y => (&mut self.level.y, &mut self.pulses.y),
            Axis::Z => (&mut self.level.z, &mut self.pulses.z),
        };
        if high && !*level {
            *pulses += 1;
        }
        *level = high;
        self.writes += 1;
    }
}

/// Direction outputs that log every write
#[derive(Debug, Default)]
pub struct RecordingDirections {
    pub log: Vec<(Axis, Direction)>,
}

impl RecordingDirections {
    /// Axes in the order they were first driven
    pub fn axis_order(&self) -> Vec<Axis> {
        let mut order = Vec::new();
        for (axis, _) in &self.log {
            if order.last() != Some(axis) {
                order.push(*axis);
            }
        }
        order
    }
}

impl DirectionLine for RecordingDirections {
    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        self.log.push((axis, direction));
    }
}

/// Clock that runs one scheduler tick per poll
///
/// Time advances by one tick period per `relax()` even when stalled, so a
/// wait on a stalled scheduler still reaches its deadline.
pub struct SimClock<'a> {
    pub scheduler: StepScheduler<'a, RecordingSteps>,
    pub now_us: u64,
    pub tick_us: u64,
    pub stalled: bool,
}

impl<'a> SimClock<'a> {
    pub fn new(bank: &'a StepBank, config: &MachineConfig) -> Self {
        Self {
            scheduler: StepScheduler::from_config(bank, RecordingSteps::default(), &config.motion),
            now_us: 0,
            tick_us: config.motion.tick_period_us as u64,
            stalled: false,
        }
    }

    pub fn steps(&self) -> &RecordingSteps {
        self.scheduler.lines()
    }
}

impl Clock for SimClock<'_> {
    fn now_us(&self) -> u64 {
        self.now_us
    }

    fn relax(&mut self) {
        self.now_us += self.tick_us;
        if !self.stalled {
            self.scheduler.tick();
        }
    }
}

/// Planner wired to a simulated scheduler
pub type SimPlanner<'a> = MotionPlanner<'a, RecordingDirections, SimClock<'a>>;

pub fn sim_planner<'a>(bank: &'a StepBank, config: &MachineConfig) -> SimPlanner<'a> {
    MotionPlanner::new(
        bank,
        RecordingDirections::default(),
        SimClock::new(bank, config),
        config,
    )
}

/// Limit switches that trigger after a fixed number of reads
///
/// `None` never triggers. Every read is logged.
#[derive(Debug, Default)]
pub struct FakeSwitches {
    pub trigger_after: PerAxis<Option<u32>>,
    pub reads: Vec<Axis>,
}

impl FakeSwitches {
    pub fn new(x: Option<u32>, y: Option<u32>, z: Option<u32>) -> Self {
        Self {
            trigger_after: PerAxis { x, y, z },
            reads: Vec::new(),
        }
    }

    pub fn reads_of(&self, axis: Axis) -> u32 {
        self.reads.iter().filter(|&&a| a == axis).count() as u32
    }
}

impl LimitSwitch for FakeSwitches {
    fn is_triggered(&mut self, axis: Axis) -> bool {
        let prior = self.reads_of(axis);
        self.reads.push(axis);
        match self.trigger_after.get(axis) {
            Some(n) => prior >= n,
            None => false,
        }
    }
}

/// One observable operation of a pick-and-place run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Move(CartesianPosition, u32),
    VacuumOn,
    VacuumOff,
}

pub type OpLog = Rc<RefCell<Vec<Op>>>;

/// Vacuum that appends to a shared log
#[derive(Debug, Default)]
pub struct FakeVacuum {
    pub active: bool,
    pub log: OpLog,
}

impl FakeVacuum {
    pub fn with_log(log: OpLog) -> Self {
        Self { active: false, log }
    }
}

impl VacuumActuator for FakeVacuum {
    fn activate(&mut self) {
        self.active = true;
        self.log.borrow_mut().push(Op::VacuumOn);
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.log.borrow_mut().push(Op::VacuumOff);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Motion that completes instantly and appends to a shared log
///
/// `fail_at` makes the n-th move (zero-based) return the given error.
/// Targets outside `envelope`, when set, are unreachable.
#[derive(Debug, Default)]
pub struct FakeMotion {
    pub position: CartesianPosition,
    pub log: OpLog,
    pub moves: usize,
    pub fail_at: Option<(usize, MotionError)>,
    pub envelope: Option<Envelope>,
}

impl FakeMotion {
    pub fn with_log(log: OpLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }
}

impl Motion for FakeMotion {
    fn move_to(&mut self, target: CartesianPosition, interval: u32) -> Result<(), MotionError> {
        let index = self.moves;
        self.moves += 1;
        if let Some((at, err)) = self.fail_at {
            if at == index {
                return Err(err);
            }
        }
        self.position = target;
        self.log.borrow_mut().push(Op::Move(target, interval));
        Ok(())
    }

    fn check_reachable(&self, target: CartesianPosition) -> Result<(), MotionError> {
        match self.envelope.and_then(|envelope| target.outside(&envelope)) {
            Some(axis) => Err(MotionError::OutOfEnvelope(axis)),
            None => Ok(()),
        }
    }

    fn position(&self) -> CartesianPosition {
        self.position
    }
}

//! Step/direction outputs for STEP/DIR stepper drivers
//!
//! The step outputs are written from the tick handler and the direction
//! outputs from the foreground, so they are separate types that can be
//! owned by different tasks.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use tessera_core::motion::{Axis, Direction, PerAxis};
use tessera_core::traits::{DirectionLine, StepLine};

fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.unwrap_or_else(|e| match e {});
}

/// STEP pins for X, Y and Z
pub struct GpioStepLines<P> {
    pins: [P; 3],
}

impl<P: OutputPin<Error = Infallible>> GpioStepLines<P> {
    /// Create step outputs, all driven low
    pub fn new(x: P, y: P, z: P) -> Self {
        let mut lines = Self { pins: [x, y, z] };
        for pin in lines.pins.iter_mut() {
            drive(pin, false);
        }
        lines
    }
}

impl<P: OutputPin<Error = Infallible>> StepLine for GpioStepLines<P> {
    fn set_step(&mut self, axis: Axis, high: bool) {
        drive(&mut self.pins[axis.index()], high);
    }
}

/// DIR pins for X, Y and Z
///
/// Forward drives the pin high unless the axis is inverted.
pub struct GpioDirectionLines<P> {
    pins: [P; 3],
    invert: PerAxis<bool>,
}

impl<P: OutputPin<Error = Infallible>> GpioDirectionLines<P> {
    pub fn new(x: P, y: P, z: P, invert: PerAxis<bool>) -> Self {
        Self {
            pins: [x, y, z],
            invert,
        }
    }
}

impl<P: OutputPin<Error = Infallible>> DirectionLine for GpioDirectionLines<P> {
    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        let high = (direction == Direction::Forward) != self.invert.get(axis);
        drive(&mut self.pins[axis.index()], high);
    }
}

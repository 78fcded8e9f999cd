//! GPIO endstop inputs
//!
//! Mechanical switches wired to ground with the pull-up enabled read high
//! while open, so they are active-low.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use tessera_core::motion::Axis;
use tessera_core::traits::LimitSwitch;

/// Three endstop inputs sharing one polarity
pub struct GpioLimitSwitches<P> {
    pins: [P; 3],
    active_low: bool,
}

impl<P: InputPin<Error = Infallible>> GpioLimitSwitches<P> {
    /// Create endstops from X, Y and Z pins
    pub fn new(x: P, y: P, z: P, active_low: bool) -> Self {
        Self {
            pins: [x, y, z],
            active_low,
        }
    }

    /// Switches that pull the line low when triggered
    pub fn new_active_low(x: P, y: P, z: P) -> Self {
        Self::new(x, y, z, true)
    }
}

impl<P: InputPin<Error = Infallible>> LimitSwitch for GpioLimitSwitches<P> {
    fn is_triggered(&mut self, axis: Axis) -> bool {
        let high = self.pins[axis.index()].is_high().unwrap_or_else(|e| match e {});
        high != self.active_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockInput;

    #[test]
    fn test_active_low_switches() {
        let mut switches = GpioLimitSwitches::new_active_low(
            MockInput { high: true },
            MockInput { high: false },
            MockInput { high: true },
        );

        assert!(!switches.is_triggered(Axis::X));
        assert!(switches.is_triggered(Axis::Y));
        assert!(!switches.is_triggered(Axis::Z));
    }

    #[test]
    fn test_active_high_switches() {
        let mut switches = GpioLimitSwitches::new(
            MockInput { high: true },
            MockInput { high: false },
            MockInput { high: false },
            false,
        );

        assert!(switches.is_triggered(Axis::X));
        assert!(!switches.is_triggered(Axis::Y));
    }
}

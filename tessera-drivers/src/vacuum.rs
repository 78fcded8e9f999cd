//! GPIO vacuum output
//!
//! Drives the nozzle's pump or solenoid valve through a single pin,
//! directly or via a MOSFET/relay.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use tessera_core::traits::VacuumActuator;

/// GPIO vacuum output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioVacuum<P> {
    pin: P,
    /// If true, suction ON = pin LOW
    inverted: bool,
    /// Current logical state (true = suction on)
    active: bool,
}

impl<P: OutputPin<Error = Infallible>> GpioVacuum<P> {
    /// Create a vacuum output, switched off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut vacuum = Self {
            pin,
            inverted,
            active: false,
        };
        vacuum.write(false);
        vacuum
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    fn write(&mut self, on: bool) {
        self.active = on;
        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.unwrap_or_else(|e| match e {});
    }

    /// Release the pin
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: OutputPin<Error = Infallible>> VacuumActuator for GpioVacuum<P> {
    fn activate(&mut self) {
        self.write(true);
    }

    fn deactivate(&mut self) {
        self.write(false);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

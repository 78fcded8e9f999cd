//! Tessera - Brick Mosaic Printer Firmware
//!
//! Main firmware binary for RP2040-based three-axis pick-and-place
//! machines. Pin assignments follow the BTT SKR Pico.
//!
//! Named after the small tiles (tesserae) a mosaic is assembled from.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tessera_core::motion::{MotionPlanner, PerAxis, StepBank};
use tessera_core::scheduler::StepScheduler;
use tessera_core::Controller;
use tessera_drivers::{GpioDirectionLines, GpioLimitSwitches, GpioStepLines, GpioVacuum};

use crate::clock::EmbassyClock;
use crate::config::{CARTRIDGE_CAPACITY, MACHINE_CONFIG};

mod channels;
mod clock;
mod config;
mod tasks;

/// Step state shared between the tick task and the controller
static STEP_BANK: StepBank = StepBank::new();

/// Runs the step tick; preempts everything else
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

/// Runs status reporting and the stop button
static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();

// Stepper enable pins must stay driven for the program duration
static ENABLE_PINS: StaticCell<[Output<'static>; 3]> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[interrupt]
unsafe fn SWI_IRQ_0() {
    EXECUTOR_MED.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tessera firmware starting...");

    let config = MACHINE_CONFIG;

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Stepper drivers (SKR Pico: X STEP=11 DIR=10 EN=12, Y STEP=6 DIR=5
    // EN=7, Z STEP=19 DIR=28 EN=2). Enable is active-low.
    ENABLE_PINS.init([
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_2, Level::Low),
    ]);

    let step_lines = GpioStepLines::new(
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_19, Level::Low),
    );
    let direction_lines = GpioDirectionLines::new(
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_28, Level::Low),
        PerAxis::splat(false),
    );

    // Endstops (SKR Pico: X=4, Y=3, Z=25), switches to ground
    let switches = GpioLimitSwitches::new_active_low(
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_25, Pull::Up),
    );

    // Vacuum pump on the HE0 MOSFET (GPIO23)
    let vacuum = GpioVacuum::new_active_high(Output::new(p.PIN_23, Level::Low));

    // Stop button on E0-STOP (GPIO16)
    let stop_button = Input::new(p.PIN_16, Pull::Up);

    info!("GPIO initialized");

    let scheduler = StepScheduler::from_config(&STEP_BANK, step_lines, &config.motion);
    let planner = MotionPlanner::new(&STEP_BANK, direction_lines, EmbassyClock, &config);
    let mut controller = match Controller::new(planner, vacuum, switches, config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Invalid machine configuration: {}", e);
            return;
        }
    };
    if let Err(e) = controller.load_cartridges(&CARTRIDGE_CAPACITY) {
        error!("Invalid cartridge counts: {}", e);
        return;
    }

    // Step tick at the highest software priority
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high.spawn(tasks::tick_task(scheduler, config.motion.tick_period_us)).unwrap();

    interrupt::SWI_IRQ_0.set_priority(Priority::P2);
    let med = EXECUTOR_MED.start(interrupt::SWI_IRQ_0);
    med.spawn(tasks::status_task()).unwrap();
    med.spawn(tasks::stop_button_task(stop_button)).unwrap();

    // The controller blocks during moves, so it runs in thread mode
    spawner.spawn(tasks::controller_task(controller)).unwrap();

    info!("All tasks spawned, firmware running");
}

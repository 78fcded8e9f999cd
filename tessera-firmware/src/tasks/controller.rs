//! Controller task
//!
//! Homes the machine and prints the pattern compiled in from machine.toml.
//! Every move blocks this task; the step tick and the status task keep
//! running on their interrupt executors.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::Timer;
use tessera_core::controller::ControllerError;
use tessera_core::sequence::{JobError, Pattern};
use tessera_core::traits::VacuumActuator;
use tessera_core::Controller;
use tessera_drivers::{GpioDirectionLines, GpioLimitSwitches, GpioVacuum};

use crate::channels::{JobStatus, JOB_STATUS, STOP_REQUESTED};
use crate::clock::EmbassyClock;
use crate::config::{PATTERN, PATTERN_WIDTH};

/// Controller wired to the board's pins
pub type PrinterController = Controller<
    'static,
    GpioDirectionLines<Output<'static>>,
    EmbassyClock,
    GpioVacuum<Output<'static>>,
    GpioLimitSwitches<Input<'static>>,
>;

#[embassy_executor::task]
pub async fn controller_task(mut controller: PrinterController) {
    info!("Controller task started");

    let pattern = match Pattern::new(&PATTERN, PATTERN_WIDTH) {
        Ok(pattern) => pattern,
        Err(e) => {
            error!("Embedded pattern rejected: {}", e);
            return;
        }
    };
    info!(
        "Pattern {}x{}, {} bricks",
        pattern.width(),
        pattern.height(),
        pattern.piece_count()
    );

    JOB_STATUS.signal(JobStatus::Homing);
    let result = controller.run_job(&pattern, &STOP_REQUESTED, |progress| {
        JOB_STATUS.signal(JobStatus::Printing(progress));
    });

    match result {
        Ok(progress) => JOB_STATUS.signal(JobStatus::Complete(progress)),
        Err(ControllerError::Job(JobError::Cancelled)) => JOB_STATUS.signal(JobStatus::Cancelled),
        Err(ControllerError::Job(JobError::SlotEmpty { slot })) => {
            JOB_STATUS.signal(JobStatus::SlotEmpty(slot))
        }
        Err(e) => {
            error!("Job failed: {}", e);
            JOB_STATUS.signal(JobStatus::Failed(controller.state()));
            if controller.vacuum().is_active() {
                warn!("Vacuum still holding a brick");
            }
        }
    }

    // Park at the last position; a reset starts the next job
    loop {
        Timer::after_secs(60).await;
    }
}

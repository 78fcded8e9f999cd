//! Job status reporting

use defmt::*;

use crate::channels::{JobStatus, JOB_STATUS};

/// Log every status update published by the controller
#[embassy_executor::task]
pub async fn status_task() {
    loop {
        match JOB_STATUS.wait().await {
            JobStatus::Homing => info!("Homing"),
            JobStatus::Printing(progress) => info!(
                "Printing: {}% ({} bricks placed)",
                progress.percent(),
                progress.placed
            ),
            JobStatus::Complete(progress) => {
                info!("Print complete: {} bricks placed", progress.placed)
            }
            JobStatus::Cancelled => warn!("Print cancelled"),
            JobStatus::SlotEmpty(slot) => warn!("Cartridge {} is empty, refill and restart", slot),
            JobStatus::Failed(state) => error!("Print failed, state {}", state),
        }
    }
}

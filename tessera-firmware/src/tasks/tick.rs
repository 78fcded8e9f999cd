//! Step tick task
//!
//! Advances the step scheduler once per configured tick period.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};
use tessera_core::scheduler::StepScheduler;
use tessera_drivers::GpioStepLines;

/// Scheduler driving the board's STEP pins
pub type StepTick = StepScheduler<'static, GpioStepLines<Output<'static>>>;

/// Tick task - the only writer of the step outputs
#[embassy_executor::task]
pub async fn tick_task(mut scheduler: StepTick, period_us: u32) {
    info!("Step tick started ({} us)", period_us);

    let mut ticker = Ticker::every(Duration::from_micros(period_us as u64));

    loop {
        ticker.next().await;
        scheduler.tick();
    }
}

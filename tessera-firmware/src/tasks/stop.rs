//! Stop button
//!
//! A press asks the running job to stop before its next brick. The brick
//! in progress is always finished.

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::Ordering;

use crate::channels::STOP_REQUESTED;

/// Watch the stop button (active-low, pulled up)
#[embassy_executor::task]
pub async fn stop_button_task(mut button: Input<'static>) {
    loop {
        button.wait_for_falling_edge().await;
        if !STOP_REQUESTED.swap(true, Ordering::AcqRel) {
            warn!("Stop requested");
        }
    }
}

//! Monotonic clock backed by the embassy time driver

use embassy_time::Instant;
use tessera_core::traits::Clock;

/// Clock for the controller's blocking waits
///
/// The time driver runs from its own alarm interrupt, so it keeps counting
/// while the foreground spins.
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

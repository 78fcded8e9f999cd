//! Monotonic time source for bounded waits

/// Monotonic clock consulted while the foreground waits on motion
///
/// The clock must keep running when the step scheduler stalls, otherwise a
/// stalled scheduler can never be detected.
pub trait Clock {
    /// Microseconds since an arbitrary fixed point
    fn now_us(&self) -> u64;

    /// Called once per poll while waiting for the step scheduler
    fn relax(&mut self) {
        core::hint::spin_loop();
    }
}

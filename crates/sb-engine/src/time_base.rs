//! Time base abstractions: the periodic tick timer and a microsecond clock.

/// A reprogrammable periodic timer driving [`crate::Engine::tick`].
pub trait TickTimer {
    /// Cancel the running period and arm a new one.
    ///
    /// The new period takes effect at the next re-arm; a tick already
    /// scheduled at the old period may still fire once.
    fn reschedule(&mut self, period_us: u32);
}

/// Monotonic microsecond clock. Wraps at `u32::MAX`.
pub trait Clock {
    fn now_us(&self) -> u32;
}

/// A timer that ignores reschedule requests (offline rendering, tests).
impl TickTimer for () {
    fn reschedule(&mut self, _period_us: u32) {}
}

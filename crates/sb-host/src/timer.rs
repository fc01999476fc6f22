//! Thread-backed time base.

use sb_engine::{Clock, TickTimer};
use std::time::{Duration, Instant};

/// Periodic deadline timer for a dedicated tick thread.
///
/// Deadlines are absolute so sleep jitter does not accumulate. A new period
/// takes effect from the next deadline onward.
#[derive(Debug)]
pub struct ThreadTimer {
    period: Duration,
    deadline: Instant,
}

impl ThreadTimer {
    pub fn new(period_us: u32) -> Self {
        let period = Duration::from_micros(period_us as u64);
        Self {
            period,
            deadline: Instant::now() + period,
        }
    }

    /// Sleep until the next deadline and arm the one after it.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.deadline > now {
            std::thread::sleep(self.deadline - now);
            self.deadline += self.period;
        } else if now - self.deadline > self.period {
            // fell more than a period behind; drop the missed ticks
            self.deadline = now + self.period;
        } else {
            self.deadline += self.period;
        }
    }

    pub fn period_us(&self) -> u32 {
        self.period.as_micros() as u32
    }
}

impl TickTimer for ThreadTimer {
    fn reschedule(&mut self, period_us: u32) {
        self.period = Duration::from_micros(period_us as u64);
    }
}

/// Microsecond clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_us(&self) -> u32 {
        // wraps like a hardware counter
        self.origin.elapsed().as_micros() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reschedule_changes_period() {
        let mut timer = ThreadTimer::new(2604);
        assert_eq!(timer.period_us(), 2604);
        timer.reschedule(1689);
        assert_eq!(timer.period_us(), 1689);
    }

    #[test]
    fn wait_paces_ticks() {
        let mut timer = ThreadTimer::new(1000);
        let start = Instant::now();
        for _ in 0..10 {
            timer.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(9));
    }

    #[test]
    fn clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_us();
        std::thread::sleep(Duration::from_millis(2));
        assert!(clock.now_us() > a);
    }
}

// GestureWatch - Monotonic Clock
//
// The scheduler only ever asks "what time is it" and "wait until then", so
// the firmware and the tests can drive it with different time sources.

use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Never decreases.
    fn now_ms(&self) -> u64;

    /// Block until `now_ms() >= deadline_ms`. Returns at once for past deadlines.
    fn sleep_until(&mut self, deadline_ms: u64);
}

/// Wall clock backed by `Instant` (esp_timer on ESP-IDF).
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_until(&mut self, deadline_ms: u64) {
        let now = self.now_ms();
        if deadline_ms > now {
            thread::sleep(Duration::from_millis(deadline_ms - now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeps_until_deadline() {
        let mut clock = MonotonicClock::new();
        let target = clock.now_ms() + 5;
        clock.sleep_until(target);
        assert!(clock.now_ms() >= target);
    }

    #[test]
    fn past_deadline_returns_immediately() {
        let mut clock = MonotonicClock::new();
        let before = Instant::now();
        clock.sleep_until(0);
        assert!(before.elapsed() < Duration::from_millis(50));
    }
}

//! Clocks

use std::thread;
use std::time::{Duration, Instant};

use super::Clock;

/// Real time measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Deterministic clock; time only moves when slept or advanced
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: u64,
    /// Total time spent in `sleep_ms`
    pub slept_ms: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: start_ms,
            slept_ms: 0,
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.now += ms;
        self.slept_ms += ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_sleep_advances() {
        let mut clock = ManualClock::new(100);
        clock.sleep_ms(16);
        clock.advance(4);
        assert_eq!(clock.now_ms(), 120);
        assert_eq!(clock.slept_ms, 16);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now_ms();
        clock.sleep_ms(2);
        assert!(clock.now_ms() >= a + 2);
    }
}

//! Wall-clock sources.
//!
//! Every time-dependent component reads the current instant through
//! [`Clock`] so that tests can jump the clock forward without waiting.

use std::cell::Cell;

use chrono::{DateTime, Utc};

/// Source of epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;

    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms() as i64).unwrap_or_default()
    }
}

/// The real wall clock.
///
/// Never reads earlier than a previous reading: if the system clock is
/// stepped back, time holds still until the wall clock catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_ms: Cell<u64>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn observe(&self, wall_ms: u64) -> u64 {
        let now = wall_ms.max(self.last_ms.get());
        self.last_ms.set(now);
        now
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let wall_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.observe(wall_ms)
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(secs.saturating_mul(1000));
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance_secs(2);
        assert_eq!(clock.now_ms(), 3_000);
        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn system_clock_holds_when_wall_clock_steps_back() {
        let clock = SystemClock::new();
        assert_eq!(clock.observe(5_000), 5_000);
        assert_eq!(clock.observe(4_000), 5_000);
        assert_eq!(clock.observe(5_500), 5_500);

        let first = clock.now_ms();
        assert!(clock.now_ms() >= first);
    }

    #[test]
    fn now_utc_matches_millis() {
        let clock = ManualClock::new(86_400_000);
        assert_eq!(clock.now_utc().format("%Y-%m-%d").to_string(), "1970-01-02");
    }
}

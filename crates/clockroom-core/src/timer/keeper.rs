//! Drift-free time keeping.
//!
//! The keeper never counts ticks. Elapsed time is always recomputed as
//! `accumulated + (now - started_at)` from the injected clock, so dropped
//! ticks (backgrounded tab, slow frames) cannot cause drift and no
//! catch-up replay is needed.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           +-> Completed   (countdown / alarm only, exactly once)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// What the session is measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SessionKind {
    Countdown { target_ms: u64 },
    Stopwatch,
    /// Fires when the wall clock reaches `at_ms`.
    AlarmCheck { at_ms: u64 },
}

/// One running/paused/stopped timing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    pub kind: SessionKind,
    /// Wall-clock time of the last resume; `None` unless running.
    pub started_at_ms: Option<u64>,
    /// Elapsed time banked before the current run segment.
    pub accumulated_ms: u64,
    pub status: TimerStatus,
}

impl TimerSession {
    pub fn new(kind: SessionKind) -> Self {
        Self {
            kind,
            started_at_ms: None,
            accumulated_ms: 0,
            status: TimerStatus::Idle,
        }
    }

    pub fn target_ms(&self) -> Option<u64> {
        match self.kind {
            SessionKind::Countdown { target_ms } => Some(target_ms),
            _ => None,
        }
    }

    pub fn elapsed_ms_at(&self, now_ms: u64) -> u64 {
        let segment = match (self.status, self.started_at_ms) {
            (TimerStatus::Running, Some(started)) => now_ms.saturating_sub(started),
            _ => 0,
        };
        self.accumulated_ms.saturating_add(segment)
    }
}

/// Wall-clock based session engine. The caller drives `tick()`.
#[derive(Debug, Clone)]
pub struct TimeKeeper {
    session: TimerSession,
}

impl TimeKeeper {
    pub fn new(kind: SessionKind) -> Self {
        Self {
            session: TimerSession::new(kind),
        }
    }

    pub fn countdown_secs(secs: u64) -> Self {
        Self::new(SessionKind::Countdown {
            target_ms: secs.saturating_mul(1000),
        })
    }

    pub fn stopwatch() -> Self {
        Self::new(SessionKind::Stopwatch)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn status(&self) -> TimerStatus {
        self.session.status
    }

    pub fn kind(&self) -> SessionKind {
        self.session.kind
    }

    pub fn elapsed_ms(&self, clock: &dyn Clock) -> u64 {
        self.session.elapsed_ms_at(clock.now_ms())
    }

    pub fn elapsed_seconds(&self, clock: &dyn Clock) -> u64 {
        self.elapsed_ms(clock) / 1000
    }

    /// Milliseconds left for countdown/alarm sessions, `None` for stopwatch.
    pub fn remaining_ms(&self, clock: &dyn Clock) -> Option<u64> {
        match self.session.kind {
            SessionKind::Countdown { target_ms } => {
                Some(target_ms.saturating_sub(self.elapsed_ms(clock)))
            }
            SessionKind::AlarmCheck { at_ms } => Some(at_ms.saturating_sub(clock.now_ms())),
            SessionKind::Stopwatch => None,
        }
    }

    /// Rounded up, so a fresh 25 minute countdown reads 1500 and only
    /// reads 0 once it is actually done.
    pub fn remaining_seconds(&self, clock: &dyn Clock) -> Option<u64> {
        self.remaining_ms(clock).map(|ms| ms.div_ceil(1000))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, clock: &dyn Clock) -> Option<Event> {
        match self.session.status {
            TimerStatus::Running => None,
            TimerStatus::Completed => {
                // Restart a finished countdown from zero.
                self.session.accumulated_ms = 0;
                self.resume_at(clock)
            }
            TimerStatus::Idle | TimerStatus::Paused => self.resume_at(clock),
        }
    }

    pub fn pause(&mut self, clock: &dyn Clock) -> Option<Event> {
        if self.session.status != TimerStatus::Running {
            return None;
        }
        let now = clock.now_ms();
        self.session.accumulated_ms = self.session.elapsed_ms_at(now);
        self.session.started_at_ms = None;
        self.session.status = TimerStatus::Paused;
        debug!(elapsed_ms = self.session.accumulated_ms, "timer paused");
        Some(Event::TimerPaused {
            elapsed_ms: self.session.accumulated_ms,
            at: clock.now_utc(),
        })
    }

    pub fn reset(&mut self, clock: &dyn Clock) -> Option<Event> {
        self.session.accumulated_ms = 0;
        self.session.started_at_ms = None;
        self.session.status = TimerStatus::Idle;
        Some(Event::TimerReset { at: clock.now_utc() })
    }

    /// Replace what is being measured. Always resets.
    pub fn set_kind(&mut self, kind: SessionKind, clock: &dyn Clock) -> Option<Event> {
        self.session.kind = kind;
        self.reset(clock)
    }

    /// New countdown length in seconds. Resets the session.
    pub fn set_target(&mut self, secs: u64, clock: &dyn Clock) -> Option<Event> {
        let kind = SessionKind::Countdown {
            target_ms: secs.saturating_mul(1000),
        };
        self.set_kind(kind, clock)
    }

    /// Re-read the clock. Returns `Some(Event::TimerCompleted)` the first
    /// time the countdown or alarm runs out and never again afterwards.
    pub fn tick(&mut self, clock: &dyn Clock) -> Option<Event> {
        if self.session.status != TimerStatus::Running {
            return None;
        }
        let now = clock.now_ms();
        let done = match self.session.kind {
            SessionKind::Countdown { target_ms } => self.session.elapsed_ms_at(now) >= target_ms,
            SessionKind::AlarmCheck { at_ms } => now >= at_ms,
            SessionKind::Stopwatch => false,
        };
        if !done {
            return None;
        }

        let elapsed = match self.session.kind {
            SessionKind::Countdown { target_ms } => target_ms,
            _ => self.session.elapsed_ms_at(now),
        };
        self.session.accumulated_ms = elapsed;
        self.session.started_at_ms = None;
        self.session.status = TimerStatus::Completed;
        debug!(elapsed_ms = elapsed, "timer completed");
        Some(Event::TimerCompleted {
            kind: self.session.kind,
            elapsed_ms: elapsed,
            at: clock.now_utc(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn resume_at(&mut self, clock: &dyn Clock) -> Option<Event> {
        self.session.started_at_ms = Some(clock.now_ms());
        self.session.status = TimerStatus::Running;
        debug!(accumulated_ms = self.session.accumulated_ms, "timer running");
        Some(Event::TimerStarted {
            kind: self.session.kind,
            elapsed_ms: self.session.accumulated_ms,
            at: clock.now_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn start_pause_resume() {
        let clock = ManualClock::new(0);
        let mut keeper = TimeKeeper::stopwatch();
        assert_eq!(keeper.status(), TimerStatus::Idle);

        assert!(keeper.start(&clock).is_some());
        assert_eq!(keeper.status(), TimerStatus::Running);
        assert!(keeper.start(&clock).is_none());

        clock.advance_secs(10);
        assert!(keeper.pause(&clock).is_some());
        assert_eq!(keeper.status(), TimerStatus::Paused);
        assert!(keeper.session().started_at_ms.is_none());

        clock.advance_secs(100);
        assert_eq!(keeper.elapsed_seconds(&clock), 10);

        keeper.start(&clock);
        clock.advance_secs(5);
        assert_eq!(keeper.elapsed_seconds(&clock), 15);
    }

    #[test]
    fn reset_goes_to_idle() {
        let clock = ManualClock::new(0);
        let mut keeper = TimeKeeper::countdown_secs(60);
        keeper.start(&clock);
        clock.advance_secs(30);
        keeper.reset(&clock);
        assert_eq!(keeper.status(), TimerStatus::Idle);
        assert_eq!(keeper.elapsed_ms(&clock), 0);
        assert_eq!(keeper.remaining_seconds(&clock), Some(60));
    }

    #[test]
    fn remaining_rounds_up() {
        let clock = ManualClock::new(0);
        let mut keeper = TimeKeeper::countdown_secs(1500);
        assert_eq!(keeper.remaining_seconds(&clock), Some(1500));
        keeper.start(&clock);
        clock.advance(1);
        assert_eq!(keeper.remaining_seconds(&clock), Some(1500));
        clock.advance(999);
        assert_eq!(keeper.remaining_seconds(&clock), Some(1499));
    }

    #[test]
    fn countdown_completes_exactly_once() {
        let clock = ManualClock::new(0);
        let mut keeper = TimeKeeper::countdown_secs(3);
        keeper.start(&clock);
        clock.advance_secs(2);
        assert!(keeper.tick(&clock).is_none());
        clock.advance_secs(1);
        assert!(matches!(keeper.tick(&clock), Some(Event::TimerCompleted { .. })));
        for _ in 0..20 {
            clock.advance_secs(1);
            assert!(keeper.tick(&clock).is_none());
        }
        assert_eq!(keeper.status(), TimerStatus::Completed);
        assert_eq!(keeper.remaining_seconds(&clock), Some(0));
    }

    #[test]
    fn completed_countdown_restarts_from_zero() {
        let clock = ManualClock::new(0);
        let mut keeper = TimeKeeper::countdown_secs(1);
        keeper.start(&clock);
        clock.advance_secs(5);
        keeper.tick(&clock);
        keeper.start(&clock);
        assert_eq!(keeper.remaining_seconds(&clock), Some(1));
    }

    #[test]
    fn alarm_fires_on_wall_clock() {
        let clock = ManualClock::new(1_000);
        let mut keeper = TimeKeeper::new(SessionKind::AlarmCheck { at_ms: 61_000 });
        keeper.start(&clock);
        clock.advance_secs(59);
        assert!(keeper.tick(&clock).is_none());
        assert_eq!(keeper.remaining_seconds(&clock), Some(1));
        clock.advance_secs(1);
        assert!(keeper.tick(&clock).is_some());
        assert!(keeper.tick(&clock).is_none());
    }

    #[test]
    fn stopwatch_never_completes() {
        let clock = ManualClock::new(0);
        let mut keeper = TimeKeeper::stopwatch();
        keeper.start(&clock);
        clock.advance_secs(86_400);
        assert!(keeper.tick(&clock).is_none());
        assert_eq!(keeper.remaining_ms(&clock), None);
        assert_eq!(keeper.elapsed_seconds(&clock), 86_400);
    }

    #[test]
    fn set_target_resets_running_countdown() {
        let clock = ManualClock::new(0);
        let mut keeper = TimeKeeper::countdown_secs(60);
        keeper.start(&clock);
        clock.advance_secs(30);
        assert!(matches!(
            keeper.set_target(300, &clock),
            Some(Event::TimerReset { .. })
        ));
        assert_eq!(keeper.status(), TimerStatus::Idle);
        assert_eq!(keeper.remaining_seconds(&clock), Some(300));
    }
}

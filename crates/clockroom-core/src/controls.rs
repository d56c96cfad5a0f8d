//! Idle-driven visibility of on-screen controls.
//!
//! ```text
//!                 enter fullscreen
//! VisiblePersistent ────────────────> VisibleTimed
//!        ^                              |     ^
//!        | leave fullscreen   idle timeout    | pointer / touch
//!        |                              v     |
//!        +──────────────────────────── Hidden +
//! ```
//!
//! The idle timeout is suppressed while the pointer is over a control.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;

pub const DEFAULT_IDLE_HIDE_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityState {
    VisiblePersistent,
    VisibleTimed,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct ControlVisibilityController {
    state: VisibilityState,
    hovering: bool,
    hide_at_ms: Option<u64>,
    idle_ms: u64,
}

impl Default for ControlVisibilityController {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_HIDE_MS)
    }
}

impl ControlVisibilityController {
    pub fn new(idle_ms: u64) -> Self {
        Self {
            state: VisibilityState::VisiblePersistent,
            hovering: false,
            hide_at_ms: None,
            idle_ms,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != VisibilityState::Hidden
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.hide_at_ms
    }

    fn in_fullscreen(&self) -> bool {
        self.state != VisibilityState::VisiblePersistent
    }

    /// Pointer movement or touch.
    pub fn interaction(&mut self, now_ms: u64) -> Option<Event> {
        if !self.in_fullscreen() {
            return None;
        }
        self.hide_at_ms = Some(now_ms + self.idle_ms);
        self.transition(VisibilityState::VisibleTimed)
    }

    pub fn hover_enter(&mut self) {
        self.hovering = true;
    }

    /// Leaving a control counts as fresh interaction.
    pub fn hover_leave(&mut self, now_ms: u64) -> Option<Event> {
        self.hovering = false;
        self.interaction(now_ms)
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<Event> {
        let due = self.hide_at_ms.is_some_and(|at| now_ms >= at);
        if !due || !self.in_fullscreen() {
            return None;
        }
        self.hide_at_ms = None;
        if self.hovering {
            debug!("idle hide suppressed by hover");
            return None;
        }
        self.transition(VisibilityState::Hidden)
    }

    pub fn set_fullscreen(&mut self, active: bool, now_ms: u64) -> Option<Event> {
        if active {
            self.hide_at_ms = Some(now_ms + self.idle_ms);
            self.transition(VisibilityState::VisibleTimed)
        } else {
            self.hide_at_ms = None;
            self.transition(VisibilityState::VisiblePersistent)
        }
    }

    /// Drop the pending hide timer.
    pub fn cancel(&mut self) {
        self.hide_at_ms = None;
    }

    fn transition(&mut self, next: VisibilityState) -> Option<Event> {
        if self.state == next {
            return None;
        }
        debug!(from = ?self.state, to = ?next, "controls visibility");
        self.state = next;
        Some(Event::ControlsVisibility { state: next })
    }
}

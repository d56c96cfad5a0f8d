use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::controls::VisibilityState;
use crate::host::Theme;
use crate::storage::Background;
use crate::timer::SessionKind;

/// Every state change in a clock session produces an Event.
/// Presentation layers render from snapshots and react to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        kind: SessionKind,
        /// Elapsed time banked before this run segment.
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Countdown ran out or alarm time reached. Emitted once per run.
    TimerCompleted {
        kind: SessionKind,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    NotificationStarted {
        sound_id: String,
        looped: bool,
    },
    NotificationStopped {
        sound_id: String,
    },
    FullscreenChanged {
        active: bool,
        simulated: bool,
    },
    ControlsVisibility {
        state: VisibilityState,
    },
    ThemeChanged {
        theme: Theme,
        /// Dark theme wipes every page-specific visual setting.
        preferences_reset: bool,
    },
    BackgroundChanged {
        background: Background,
    },
    SoundSelected {
        sound_id: String,
    },
    SoundToggled {
        enabled: bool,
    },
    SettingsToggled {
        open: bool,
    },
    Navigated {
        path: String,
        fullscreen_intent: bool,
    },
    /// Transient user-facing message.
    Toast {
        message: String,
    },
}

//! # Clockroom Core Library
//!
//! The clock session engine behind the Clockroom tools (timer, stopwatch,
//! alarm, world clock). Each tool is a separate page load; this crate is
//! what makes them feel like one persistent app.
//!
//! ## Architecture
//!
//! - **Time keeping**: wall-clock derived elapsed/remaining time; the
//!   caller invokes `tick()` and dropped ticks never cause drift
//! - **Notification audio**: procedurally synthesized alerts plus a few
//!   bundled files, with emulated looping and idempotent stop
//! - **Fullscreen continuity**: native-then-simulated fullscreen and a
//!   one-shot intent handed to the next page
//! - **Preferences**: mode-scoped key/value settings over SQLite
//! - **Controls**: idle-driven visibility state machine
//!
//! Browser capabilities are traits ([`Clock`], [`KvStore`],
//! [`FullscreenPlatform`], [`AudioOutput`], [`ThemeHost`], [`Navigator`],
//! [`Translator`]) so sessions run deterministically in tests.
//!
//! ## Key Components
//!
//! - [`ClockSession`]: per-page orchestrator
//! - [`TimeKeeper`]: drift-free timer state machine
//! - [`NotificationAudioEngine`]: alert playback
//! - [`PreferenceStore`]: layered settings
//! - [`Config`]: application configuration

pub mod audio;
pub mod clock;
pub mod controls;
pub mod error;
pub mod events;
pub mod fullscreen;
pub mod host;
pub mod session;
pub mod storage;
pub mod timer;
pub mod weather;

pub use audio::{AudioOutput, NotificationAudioEngine, PlayOptions, SilentOutput, SoundMeta, ToneBuffer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controls::{ControlVisibilityController, VisibilityState};
pub use error::{AudioError, ConfigError, FullscreenError, StorageError, WeatherError};
pub use events::Event;
pub use fullscreen::{FullscreenController, FullscreenPlatform, LayoutOnlyPlatform, NativeApi, Transition};
pub use host::{ClockMode, MemoryTheme, Navigator, Theme, ThemeHost, Translator};
pub use session::{ClockSession, SessionHost, SessionSettings, SessionSnapshot, SettingsDraft, Toast};
pub use storage::{
    Background, BackgroundKind, Config, Database, FullscreenIntent, KvStore, MemoryKv, PrefKey,
    PreferenceStore, WeatherCache,
};
pub use timer::{SessionKind, TimeKeeper, TimerSession, TimerStatus};
pub use weather::{WeatherClient, WeatherReport};

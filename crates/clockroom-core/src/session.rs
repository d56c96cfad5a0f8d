//! Clock session orchestration.
//!
//! A [`ClockSession`] is one tool page from mount to unmount. It owns the
//! time keeper, the notification engine, the fullscreen and visibility
//! state machines and the preference store, and exposes the handlers the
//! presentation layer calls. The caller drives [`ClockSession::tick`]
//! roughly once per second; every timer the page needs (date refresh,
//! idle hide, sound loop, post-mount fullscreen, toast expiry) is a
//! deadline checked there, so tearing down is just clearing them.

use std::rc::Rc;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc, Weekday};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audio::{AudioOutput, NotificationAudioEngine, PlayOptions};
use crate::clock::Clock;
use crate::controls::ControlVisibilityController;
use crate::events::Event;
use crate::fullscreen::{FullscreenController, FullscreenPlatform};
use crate::host::{ClockMode, Navigator, Theme, ThemeHost, Translator};
use crate::storage::{Background, Config, FullscreenIntent, KvStore, PrefKey, PreferenceStore};
use crate::timer::{SessionKind, TimeKeeper, TimerStatus};

const ALARM_UNSET: u64 = u64::MAX;

/// Tunables for one session, usually taken from [`Config`].
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub countdown_secs: u64,
    pub date_refresh_ms: u64,
    pub idle_hide_ms: u64,
    pub toast_ms: u64,
    pub mount_delay_ms: u64,
    pub ring_ms: u64,
    pub loop_gap_ms: u64,
    pub sample_rate: u32,
    pub asset_once_ms: u64,
    pub default_theme: Theme,
    /// Offset used for the date and weekday display.
    pub utc_offset_secs: i32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            countdown_secs: config.timer.default_countdown_secs,
            date_refresh_ms: config.timer.date_refresh_ms.max(1),
            idle_hide_ms: config.controls.idle_hide_ms,
            toast_ms: config.controls.toast_ms,
            mount_delay_ms: config.fullscreen.mount_delay_ms,
            ring_ms: config.audio.ring_ms,
            loop_gap_ms: config.audio.loop_gap_ms,
            sample_rate: config.audio.sample_rate,
            asset_once_ms: config.audio.asset_once_ms,
            default_theme: Theme::Dark,
            utc_offset_secs: 0,
        }
    }
}

/// Collaborators a page hands to the session.
pub struct SessionHost {
    pub clock: Rc<dyn Clock>,
    pub preferences: PreferenceStore,
    /// Cleared when the browsing session ends.
    pub navigation: Box<dyn KvStore>,
    pub fullscreen: Box<dyn FullscreenPlatform>,
    pub audio: Box<dyn AudioOutput>,
    pub theme: Box<dyn ThemeHost>,
    pub navigator: Box<dyn Navigator>,
    pub translator: Box<dyn Translator>,
    pub locale: String,
}

/// Batch of edits from the settings dialog.
#[derive(Debug, Clone, Default)]
pub struct SettingsDraft {
    pub apply_to_all_pages: Option<bool>,
    pub background: Option<Background>,
    pub sound_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub expires_at_ms: u64,
}

/// Read-only view for rendering, re-derived on every call.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: ClockMode,
    pub status: TimerStatus,
    pub elapsed_seconds: u64,
    pub remaining_seconds: Option<u64>,
    pub is_fullscreen: bool,
    pub show_controls: bool,
    pub settings_open: bool,
    pub theme: Option<Theme>,
    pub background: Background,
    pub sound_id: String,
    pub sound_enabled: bool,
    pub local_time: DateTime<FixedOffset>,
    pub weekday: String,
    pub locale: String,
    pub toast: Option<Toast>,
}

pub struct ClockSession {
    mode: ClockMode,
    clock: Rc<dyn Clock>,
    keeper: TimeKeeper,
    audio: NotificationAudioEngine,
    fullscreen: FullscreenController,
    controls: ControlVisibilityController,
    preferences: PreferenceStore,
    navigation: Box<dyn KvStore>,
    theme_host: Box<dyn ThemeHost>,
    navigator: Box<dyn Navigator>,
    translator: Box<dyn Translator>,
    locale: String,
    settings: SessionSettings,

    background: Background,
    sound_id: String,
    sound_enabled: bool,
    settings_open: bool,
    current_date: DateTime<Utc>,
    toast: Option<Toast>,

    date_refresh_at: Option<u64>,
    fullscreen_enter_at: Option<u64>,
    mounted: bool,
}

impl ClockSession {
    /// Mount the page for `mode`: consume a handed-off fullscreen intent,
    /// start the date refresh loop and load visual preferences.
    pub fn mount(mode: ClockMode, host: SessionHost, settings: SessionSettings) -> Self {
        let SessionHost {
            clock,
            mut preferences,
            mut navigation,
            fullscreen,
            audio,
            mut theme,
            navigator,
            translator,
            locale,
        } = host;

        let now = clock.now_ms();
        let keeper = match mode {
            ClockMode::Timer => TimeKeeper::countdown_secs(settings.countdown_secs),
            ClockMode::Stopwatch | ClockMode::WorldClock => TimeKeeper::stopwatch(),
            ClockMode::Alarm => TimeKeeper::new(SessionKind::AlarmCheck { at_ms: ALARM_UNSET }),
        };

        let fullscreen_enter_at = FullscreenIntent::take(navigation.as_mut())
            .then(|| now + settings.mount_delay_ms);

        if theme.theme().is_none() {
            let initial = preferences.initial_theme(mode, settings.default_theme);
            theme.set_theme(initial.as_str());
        }
        let background = preferences.background(mode);
        let sound_id = preferences.sound_id(mode);

        info!(%mode, resume_fullscreen = fullscreen_enter_at.is_some(), "clock page mounted");
        Self {
            mode,
            keeper,
            audio: NotificationAudioEngine::new(audio)
                .with_sample_rate(settings.sample_rate)
                .with_loop_gap(settings.loop_gap_ms)
                .with_asset_length(settings.asset_once_ms),
            fullscreen: FullscreenController::new(fullscreen),
            controls: ControlVisibilityController::new(settings.idle_hide_ms),
            preferences,
            navigation,
            theme_host: theme,
            navigator,
            translator,
            locale,
            background,
            sound_id,
            sound_enabled: true,
            settings_open: false,
            current_date: clock.now_utc(),
            toast: None,
            date_refresh_at: Some(now + settings.date_refresh_ms),
            fullscreen_enter_at,
            mounted: true,
            clock,
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.keeper.status()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn audio(&self) -> &NotificationAudioEngine {
        &self.audio
    }

    pub fn preferences(&mut self) -> &mut PreferenceStore {
        &mut self.preferences
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let clock = self.clock.as_ref();
        let offset = FixedOffset::east_opt(self.settings.utc_offset_secs).unwrap_or(Utc.fix());
        let local_time = self.current_date.with_timezone(&offset);
        let remaining_seconds = match self.keeper.kind() {
            SessionKind::AlarmCheck { at_ms: ALARM_UNSET } => None,
            _ => self.keeper.remaining_seconds(clock),
        };
        SessionSnapshot {
            mode: self.mode,
            status: self.keeper.status(),
            elapsed_seconds: self.keeper.elapsed_seconds(clock),
            remaining_seconds,
            is_fullscreen: self.fullscreen.is_fullscreen(),
            show_controls: self.controls.is_visible(),
            settings_open: self.settings_open,
            theme: self.current_theme(),
            background: self.background.clone(),
            sound_id: self.sound_id.clone(),
            sound_enabled: self.sound_enabled,
            weekday: self
                .translator
                .t(&format!("weekday.{}", weekday_key(local_time.weekday()))),
            local_time,
            locale: self.locale.clone(),
            toast: self.toast.clone(),
        }
    }

    // ── Driving loop ─────────────────────────────────────────────────

    /// Re-read the clock and fire whatever is due.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.mounted {
            return events;
        }
        let now = self.clock.now_ms();

        if let Some(done) = self.keeper.tick(self.clock.as_ref()) {
            events.push(done);
            if self.sound_enabled {
                events.extend(self.audio.play(
                    &self.sound_id,
                    PlayOptions::looped_for(self.settings.ring_ms),
                    now,
                ));
            }
        }
        events.extend(self.audio.poll(now));
        events.extend(self.controls.poll(now));

        if self.fullscreen_enter_at.is_some_and(|at| now >= at) {
            self.fullscreen_enter_at = None;
            let changed = self.fullscreen.enter();
            self.after_fullscreen(changed, now, &mut events);
        }

        if self.date_refresh_at.is_some_and(|at| now >= at) {
            self.current_date = self.clock.now_utc();
            self.date_refresh_at = Some(now + self.settings.date_refresh_ms);
        }

        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at_ms) {
            self.toast = None;
        }
        events
    }

    /// Cancel every timer and silence audio. Safe to call twice.
    pub fn unmount(&mut self) -> Vec<Event> {
        self.date_refresh_at = None;
        self.fullscreen_enter_at = None;
        self.toast = None;
        self.controls.cancel();
        self.mounted = false;
        self.audio.stop().into_iter().collect()
    }

    // ── Handlers ─────────────────────────────────────────────────────

    pub fn toggle_run(&mut self) -> Vec<Event> {
        let clock = Rc::clone(&self.clock);
        match (self.mode, self.keeper.kind()) {
            (ClockMode::WorldClock, _) => return Vec::new(),
            (_, SessionKind::AlarmCheck { at_ms: ALARM_UNSET }) => return Vec::new(),
            _ => {}
        }
        let mut events: Vec<Event> = self.audio.stop().into_iter().collect();
        let changed = if self.keeper.status() == TimerStatus::Running {
            self.keeper.pause(clock.as_ref())
        } else {
            self.keeper.start(clock.as_ref())
        };
        events.extend(changed);
        events
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.audio.stop().into_iter().collect();
        events.extend(self.keeper.reset(self.clock.as_ref()));
        events
    }

    /// Change the countdown length. Resets the session.
    pub fn set_countdown(&mut self, secs: u64) -> Vec<Event> {
        let mut events: Vec<Event> = self.audio.stop().into_iter().collect();
        events.extend(self.keeper.set_target(secs, self.clock.as_ref()));
        events
    }

    /// Arm the alarm for wall-clock `at_ms` and start watching for it.
    pub fn set_alarm(&mut self, at_ms: u64) -> Vec<Event> {
        let clock = Rc::clone(&self.clock);
        let mut events: Vec<Event> = self.audio.stop().into_iter().collect();
        events.extend(self.keeper.set_kind(SessionKind::AlarmCheck { at_ms }, clock.as_ref()));
        events.extend(self.keeper.start(clock.as_ref()));
        events
    }

    /// Dark resets every page's visuals; light only records the manual
    /// choice for this page.
    pub fn toggle_theme(&mut self) -> Vec<Event> {
        let next = self
            .current_theme()
            .unwrap_or(self.settings.default_theme)
            .toggled();
        self.theme_host.set_theme(next.as_str());

        let preferences_reset = next == Theme::Dark;
        let result = if preferences_reset {
            self.preferences.reset_all()
        } else {
            self.preferences.mark_manual_theme(self.mode, next)
        };
        if let Err(e) = result.and(self.preferences.set_theme(next)) {
            warn!(error = %e, "theme preferences not persisted");
        }
        self.reload_preferences();
        debug!(theme = next.as_str(), preferences_reset, "theme toggled");
        vec![
            Event::ThemeChanged {
                theme: next,
                preferences_reset,
            },
            Event::BackgroundChanged {
                background: self.background.clone(),
            },
        ]
    }

    pub fn toggle_fullscreen(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        let changed = self.fullscreen.toggle();
        self.after_fullscreen(changed, now, &mut events);
        events
    }

    /// Result of a pending platform fullscreen request.
    pub fn settle_fullscreen(&mut self, ok: bool) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        let changed = self.fullscreen.settle(ok);
        self.after_fullscreen(changed, now, &mut events);
        events
    }

    /// Native fullscreen changed outside our control (Escape key).
    pub fn platform_fullscreen_changed(&mut self, native_active: bool) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        let changed = self.fullscreen.platform_changed(native_active);
        self.after_fullscreen(changed, now, &mut events);
        events
    }

    /// Mute or unmute completion alerts. Muting silences a ringing alert.
    pub fn toggle_sound(&mut self) -> Vec<Event> {
        self.sound_enabled = !self.sound_enabled;
        let mut events = Vec::new();
        if !self.sound_enabled {
            events.extend(self.audio.stop());
        }
        events.push(Event::SoundToggled {
            enabled: self.sound_enabled,
        });
        events
    }

    /// Pick the alert sound, persist it and play a preview.
    pub fn set_sound_id(&mut self, sound_id: &str) -> Vec<Event> {
        let Some(meta) = NotificationAudioEngine::resolve(sound_id) else {
            return Vec::new();
        };
        if let Err(e) = self.preferences.set(self.mode, PrefKey::SoundId, &meta.id) {
            warn!(error = %e, "sound choice kept in memory only");
        }
        self.sound_id = meta.id.to_string();

        let mut events = vec![Event::SoundSelected {
            sound_id: self.sound_id.clone(),
        }];
        if self.sound_enabled {
            let now = self.clock.now_ms();
            events.extend(self.audio.play(meta.id, PlayOptions::once(), now));
        }
        events
    }

    pub fn open_settings(&mut self) -> Vec<Event> {
        self.set_settings_open(true)
    }

    pub fn close_settings(&mut self) -> Vec<Event> {
        self.set_settings_open(false)
    }

    /// Apply the settings dialog. Any persistence failure is reported as a
    /// toast; the in-memory values still apply.
    pub fn save_settings(&mut self, draft: SettingsDraft) -> Vec<Event> {
        let mut failed = false;
        if let Some(all) = draft.apply_to_all_pages {
            failed |= self.preferences.set_apply_to_all_pages(all).is_err();
        }
        if let Some(background) = &draft.background {
            failed |= self.preferences.set_background(self.mode, background).is_err();
        }
        if let Some(sound_id) = &draft.sound_id {
            if let Some(meta) = NotificationAudioEngine::resolve(sound_id) {
                failed |= self
                    .preferences
                    .set(self.mode, PrefKey::SoundId, &meta.id)
                    .is_err();
            }
        }
        self.reload_preferences();

        let mut events = vec![Event::BackgroundChanged {
            background: self.background.clone(),
        }];
        if failed {
            events.push(self.show_toast("settings.saveFailed"));
        } else {
            events.extend(self.close_settings());
        }
        events
    }

    /// Apply a background straight from the picker. A failed write still
    /// shows; the user gets a toast.
    pub fn set_background(&mut self, background: &Background) -> Vec<Event> {
        let result = self.preferences.set_background(self.mode, background);
        self.reload_preferences();
        let mut events = vec![Event::BackgroundChanged {
            background: self.background.clone(),
        }];
        if let Err(e) = result {
            warn!(error = %e, "background not persisted");
            events.push(self.show_toast("settings.saveFailed"));
        }
        events
    }

    /// Use an uploaded image as background and remember it in the history.
    pub fn add_background_image(&mut self, data_url: &str) -> Vec<Event> {
        let history = self.preferences.push_image_history(data_url);
        let applied = self
            .preferences
            .set_background(self.mode, &Background::image(data_url));
        self.reload_preferences();
        let mut events = vec![Event::BackgroundChanged {
            background: self.background.clone(),
        }];
        if history.is_err() || applied.is_err() {
            events.push(self.show_toast("settings.saveFailed"));
        }
        events
    }

    /// Go to another tool, carrying fullscreen over to it.
    pub fn navigate_to(&mut self, target: ClockMode) -> Vec<Event> {
        let carry = self.fullscreen.is_fullscreen();
        if carry {
            FullscreenIntent::post(self.navigation.as_mut());
        }
        self.navigator.navigate(target.path());
        vec![Event::Navigated {
            path: target.path().to_string(),
            fullscreen_intent: carry,
        }]
    }

    pub fn pointer_moved(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        self.controls.interaction(now).into_iter().collect()
    }

    pub fn hover_enter(&mut self) {
        self.controls.hover_enter();
    }

    pub fn hover_leave(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        self.controls.hover_leave(now).into_iter().collect()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn current_theme(&self) -> Option<Theme> {
        self.theme_host.theme().and_then(|t| t.parse().ok())
    }

    fn reload_preferences(&mut self) {
        self.background = self.preferences.background(self.mode);
        self.sound_id = self.preferences.sound_id(self.mode);
    }

    fn after_fullscreen(&mut self, changed: Option<Event>, now: u64, events: &mut Vec<Event>) {
        let Some(event) = changed else {
            return;
        };
        let active = matches!(event, Event::FullscreenChanged { active: true, .. });
        events.push(event);
        events.extend(self.controls.set_fullscreen(active, now));
    }

    fn set_settings_open(&mut self, open: bool) -> Vec<Event> {
        if self.settings_open == open {
            return Vec::new();
        }
        self.settings_open = open;
        vec![Event::SettingsToggled { open }]
    }

    fn show_toast(&mut self, key: &str) -> Event {
        let message = self.translator.t(key);
        self.toast = Some(Toast {
            message: message.clone(),
            expires_at_ms: self.clock.now_ms() + self.settings.toast_ms,
        });
        Event::Toast { message }
    }
}

impl Drop for ClockSession {
    fn drop(&mut self) {
        self.audio.stop();
    }
}

fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

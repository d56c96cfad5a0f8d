//! Mode-scoped preference store.
//!
//! Values are JSON encoded under keys of the form
//! `clock-<key>` (global) and `clock-<mode>-<key>` (one clock tool).
//! Reads resolve the mode override first, then the global value, then the
//! built-in default.
//!
//! Storage failures never propagate to the page: a failed write is kept in
//! an in-memory overlay so the UI keeps showing what the user picked, and
//! corrupt entries are evicted and replaced by the default.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::KvStore;
use crate::error::StorageError;
use crate::host::{ClockMode, Theme};

const KEY_PREFIX: &str = "clock";
pub const DEFAULT_IMAGE_HISTORY_CAP: usize = 10;

/// Preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    BackgroundType,
    BackgroundColor,
    BackgroundImage,
    ApplyToAllPages,
    ManualTheme,
    SoundId,
    ImageHistory,
    Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scoping {
    /// Per mode with a global fallback.
    Layered,
    GlobalOnly,
    ModeOnly,
}

impl PrefKey {
    /// Keys that may be overridden per mode.
    pub const MODE_SCOPED: [PrefKey; 5] = [
        PrefKey::BackgroundType,
        PrefKey::BackgroundColor,
        PrefKey::BackgroundImage,
        PrefKey::ManualTheme,
        PrefKey::SoundId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrefKey::BackgroundType => "background-type",
            PrefKey::BackgroundColor => "background-color",
            PrefKey::BackgroundImage => "background-image",
            PrefKey::ApplyToAllPages => "apply-to-all-pages",
            PrefKey::ManualTheme => "manual-theme",
            PrefKey::SoundId => "sound-id",
            PrefKey::ImageHistory => "image-history",
            PrefKey::Theme => "theme",
        }
    }

    fn scoping(self) -> Scoping {
        match self {
            PrefKey::ApplyToAllPages | PrefKey::ImageHistory | PrefKey::Theme => {
                Scoping::GlobalOnly
            }
            PrefKey::ManualTheme => Scoping::ModeOnly,
            _ => Scoping::Layered,
        }
    }

    fn global_key(self) -> String {
        format!("{KEY_PREFIX}-{}", self.name())
    }

    fn mode_key(self, mode: ClockMode) -> String {
        match self {
            PrefKey::ManualTheme => format!("{KEY_PREFIX}-{}-{}", self.name(), mode.as_str()),
            _ => format!("{KEY_PREFIX}-{}-{}", mode.as_str(), self.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Default,
    Color,
    Image,
}

/// Resolved background for one mode. A `Color` kind always carries a
/// color and an `Image` kind always carries an image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Background {
    pub kind: BackgroundKind,
    pub color: Option<String>,
    pub image: Option<String>,
}

impl Background {
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Color,
            color: Some(value.into()),
            image: None,
        }
    }

    pub fn image(data_url: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Image,
            color: None,
            image: Some(data_url.into()),
        }
    }

    fn is_complete(&self) -> bool {
        match self.kind {
            BackgroundKind::Default => true,
            BackgroundKind::Color => self.color.is_some(),
            BackgroundKind::Image => self.image.is_some(),
        }
    }
}

/// Encode raw image bytes as a `data:` URL suitable for
/// [`Background::image`].
pub fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Layered preference store over any [`KvStore`].
pub struct PreferenceStore {
    backend: Box<dyn KvStore>,
    /// Values whose write or delete did not reach the backend.
    overlay: HashMap<String, Option<String>>,
    history_cap: usize,
    default_sound_id: String,
}

impl PreferenceStore {
    pub fn new(backend: Box<dyn KvStore>) -> Self {
        Self {
            backend,
            overlay: HashMap::new(),
            history_cap: DEFAULT_IMAGE_HISTORY_CAP,
            default_sound_id: crate::audio::DEFAULT_SOUND_ID.to_string(),
        }
    }

    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(1);
        self
    }

    pub fn with_default_sound(mut self, sound_id: impl Into<String>) -> Self {
        self.default_sound_id = sound_id.into();
        self
    }

    // ── Generic access ───────────────────────────────────────────────

    /// Resolve `key` for `mode`: mode override, then global.
    pub fn get<T: DeserializeOwned>(&mut self, mode: ClockMode, key: PrefKey) -> Option<T> {
        match key.scoping() {
            Scoping::GlobalOnly => self.read_json(&key.global_key()),
            Scoping::ModeOnly => self.read_json(&key.mode_key(mode)),
            Scoping::Layered => self
                .read_json(&key.mode_key(mode))
                .or_else(|| self.read_json(&key.global_key())),
        }
    }

    /// Write `key` for `mode`. With apply-to-all-pages on, layered keys go
    /// to the global namespace and every per-mode copy is removed so none
    /// of them shadows the new value.
    ///
    /// On failure the value is still visible to later reads in this
    /// process; the error is returned so callers can tell the user.
    pub fn set<T: Serialize>(
        &mut self,
        mode: ClockMode,
        key: PrefKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|e| StorageError::WriteRejected {
            key: key.name().to_string(),
            message: e.to_string(),
        })?;
        match key.scoping() {
            Scoping::GlobalOnly => self.write_raw(&key.global_key(), encoded),
            Scoping::ModeOnly => self.write_raw(&key.mode_key(mode), encoded),
            Scoping::Layered if self.apply_to_all_pages() => {
                let result = self.write_raw(&key.global_key(), encoded);
                let cleared = self.clear_mode_overrides(key);
                result.and(cleared)
            }
            Scoping::Layered => self.write_raw(&key.mode_key(mode), encoded),
        }
    }

    /// Remove the per-mode value of `key`.
    pub fn remove(&mut self, mode: ClockMode, key: PrefKey) -> Result<(), StorageError> {
        match key.scoping() {
            Scoping::GlobalOnly => self.remove_raw(&key.global_key()),
            _ => self.remove_raw(&key.mode_key(mode)),
        }
    }

    // ── Typed accessors ──────────────────────────────────────────────

    pub fn apply_to_all_pages(&mut self) -> bool {
        self.read_json(&PrefKey::ApplyToAllPages.global_key())
            .unwrap_or(true)
    }

    pub fn set_apply_to_all_pages(&mut self, value: bool) -> Result<(), StorageError> {
        self.write_raw(&PrefKey::ApplyToAllPages.global_key(), value.to_string())
    }

    pub fn sound_id(&mut self, mode: ClockMode) -> String {
        self.get(mode, PrefKey::SoundId)
            .unwrap_or_else(|| self.default_sound_id.clone())
    }

    pub fn manual_theme(&mut self, mode: ClockMode) -> bool {
        self.get(mode, PrefKey::ManualTheme).unwrap_or(false)
    }

    /// Last theme the user picked on any page.
    pub fn theme(&mut self) -> Option<Theme> {
        self.read_json(&PrefKey::Theme.global_key())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.write_json(&PrefKey::Theme.global_key(), &theme)
    }

    /// Theme a page should start in: the stored pick, then light for a page
    /// that was manually switched, then `fallback`.
    pub fn initial_theme(&mut self, mode: ClockMode, fallback: Theme) -> Theme {
        if let Some(theme) = self.theme() {
            return theme;
        }
        if self.manual_theme(mode) {
            return Theme::Light;
        }
        fallback
    }

    /// Background for `mode`, taken from the first layer that names a
    /// kind. An incomplete layer resolves to the default background.
    pub fn background(&mut self, mode: ClockMode) -> Background {
        let layers = [
            (
                PrefKey::BackgroundType.mode_key(mode),
                PrefKey::BackgroundColor.mode_key(mode),
                PrefKey::BackgroundImage.mode_key(mode),
            ),
            (
                PrefKey::BackgroundType.global_key(),
                PrefKey::BackgroundColor.global_key(),
                PrefKey::BackgroundImage.global_key(),
            ),
        ];
        for (kind_key, color_key, image_key) in layers {
            if let Some(kind) = self.read_json::<BackgroundKind>(&kind_key) {
                let background = Background {
                    kind,
                    color: self.read_json(&color_key),
                    image: self.read_json(&image_key),
                };
                if background.is_complete() {
                    return background;
                }
                return Background::default();
            }
        }
        Background::default()
    }

    /// Write kind and value together so no layer is left half-set.
    pub fn set_background(
        &mut self,
        mode: ClockMode,
        background: &Background,
    ) -> Result<(), StorageError> {
        if !background.is_complete() {
            return Err(StorageError::WriteRejected {
                key: PrefKey::BackgroundType.name().to_string(),
                message: format!("{:?} background without a value", background.kind),
            });
        }
        let mut result = Ok(());
        let targets = if self.apply_to_all_pages() {
            for m in ClockMode::ALL {
                if let Err(e) = self.clear_background(m) {
                    result = result.and(Err(e));
                }
            }
            vec![(
                PrefKey::BackgroundType.global_key(),
                PrefKey::BackgroundColor.global_key(),
                PrefKey::BackgroundImage.global_key(),
            )]
        } else {
            vec![(
                PrefKey::BackgroundType.mode_key(mode),
                PrefKey::BackgroundColor.mode_key(mode),
                PrefKey::BackgroundImage.mode_key(mode),
            )]
        };

        // Every key is attempted so the overlay holds a complete layer
        // even when the backend refuses writes or deletes.
        for (kind_key, color_key, image_key) in targets {
            let color = match &background.color {
                Some(color) => self.write_json(&color_key, color),
                None => self.remove_raw(&color_key),
            };
            let image = match &background.image {
                Some(image) => self.write_json(&image_key, image),
                None => self.remove_raw(&image_key),
            };
            let kind = self.write_json(&kind_key, &background.kind);
            result = result.and(color).and(image).and(kind);
        }
        result
    }

    /// Drop the per-mode background entirely. All three keys are attempted;
    /// the first failure is returned.
    pub fn clear_background(&mut self, mode: ClockMode) -> Result<(), StorageError> {
        let kind = self.remove_raw(&PrefKey::BackgroundType.mode_key(mode));
        let color = self.remove_raw(&PrefKey::BackgroundColor.mode_key(mode));
        let image = self.remove_raw(&PrefKey::BackgroundImage.mode_key(mode));
        kind.and(color).and(image)
    }

    // ── Image history ────────────────────────────────────────────────

    /// Most recent first.
    pub fn image_history(&mut self) -> Vec<String> {
        self.read_json(&PrefKey::ImageHistory.global_key())
            .unwrap_or_default()
    }

    /// Move `image` to the head of the history, dropping older duplicates
    /// and anything past the cap.
    pub fn push_image_history(&mut self, image: &str) -> Result<Vec<String>, StorageError> {
        let mut history = self.image_history();
        history.retain(|existing| existing != image);
        history.insert(0, image.to_string());
        history.truncate(self.history_cap);
        self.write_json(&PrefKey::ImageHistory.global_key(), &history)?;
        Ok(history)
    }

    // ── Theme-driven resets ──────────────────────────────────────────

    /// Clear every mode-scoped key for every mode, drop the global image and
    /// restore the global defaults.
    pub fn reset_all(&mut self) -> Result<(), StorageError> {
        let mut first_error = None;
        for mode in ClockMode::ALL {
            for key in PrefKey::MODE_SCOPED {
                if let Err(e) = self.remove_raw(&key.mode_key(mode)) {
                    first_error.get_or_insert(e);
                }
            }
        }
        let restores = [
            self.remove_raw(&PrefKey::BackgroundImage.global_key()),
            self.remove_raw(&PrefKey::BackgroundColor.global_key()),
            self.write_json(&PrefKey::BackgroundType.global_key(), &BackgroundKind::Default),
            self.set_apply_to_all_pages(true),
        ];
        for result in restores {
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        debug!("preferences reset to defaults");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Light theme chosen on `mode`: remember the manual choice and, when
    /// this page has its own image but there is no global one, give the
    /// other pages a plain background matching `theme`.
    pub fn mark_manual_theme(&mut self, mode: ClockMode, theme: Theme) -> Result<(), StorageError> {
        self.set(mode, PrefKey::ManualTheme, &true)?;

        let page_image = self
            .read_json::<String>(&PrefKey::BackgroundImage.mode_key(mode))
            .is_some();
        let global_image = self
            .read_json::<String>(&PrefKey::BackgroundImage.global_key())
            .is_some();
        if !page_image || global_image {
            return Ok(());
        }

        for other in ClockMode::ALL.into_iter().filter(|m| *m != mode) {
            let has_own = self
                .read_json::<BackgroundKind>(&PrefKey::BackgroundType.mode_key(other))
                .is_some();
            if has_own {
                continue;
            }
            self.write_json(
                &PrefKey::BackgroundColor.mode_key(other),
                &theme.default_background_color(),
            )?;
            self.write_json(&PrefKey::BackgroundType.mode_key(other), &BackgroundKind::Color)?;
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear_mode_overrides(&mut self, key: PrefKey) -> Result<(), StorageError> {
        let mut result = Ok(());
        for mode in ClockMode::ALL {
            if let Err(e) = self.remove_raw(&key.mode_key(mode)) {
                result = Err(e);
            }
        }
        result
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overlay.get(key) {
            return value.clone();
        }
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "preference read failed");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "evicting malformed preference");
                let _ = self.remove_raw(key);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|e| StorageError::WriteRejected {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.write_raw(key, encoded)
    }

    fn write_raw(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        match self.backend.set(key, &value) {
            Ok(()) => {
                self.overlay.remove(key);
                Ok(())
            }
            Err(e) => {
                warn!(key, error = %e, "preference write dropped, keeping in memory");
                self.overlay.insert(key.to_string(), Some(value));
                Err(e)
            }
        }
    }

    fn remove_raw(&mut self, key: &str) -> Result<(), StorageError> {
        match self.backend.remove(key) {
            Ok(()) => {
                self.overlay.remove(key);
                Ok(())
            }
            Err(e) => {
                warn!(key, error = %e, "preference delete dropped, keeping in memory");
                self.overlay.insert(key.to_string(), None);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKv;

    #[test]
    fn image_data_url_encodes_bytes() {
        assert_eq!(
            image_data_url("image/png", b"\x89PNG"),
            "data:image/png;base64,iVBORw=="
        );
    }

    /// Accepts reads, rejects every write.
    struct FullKv(MemoryKv);

    impl KvStore for FullKv {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected {
                key: key.to_string(),
                message: "quota exceeded".into(),
            })
        }
        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.0.keys()
        }
    }

    /// Accepts writes, rejects every delete.
    struct NoDeleteKv(MemoryKv);

    impl KvStore for NoDeleteKv {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set(key, value)
        }
        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected {
                key: key.to_string(),
                message: "storage disabled".into(),
            })
        }
        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.0.keys()
        }
    }

    fn store() -> PreferenceStore {
        PreferenceStore::new(Box::new(MemoryKv::new()))
    }

    #[test]
    fn key_layout() {
        assert_eq!(PrefKey::SoundId.global_key(), "clock-sound-id");
        assert_eq!(PrefKey::SoundId.mode_key(ClockMode::Alarm), "clock-alarm-sound-id");
        assert_eq!(
            PrefKey::ManualTheme.mode_key(ClockMode::Timer),
            "clock-manual-theme-timer"
        );
    }

    #[test]
    fn mode_override_wins_over_global() {
        let mut prefs = store();
        prefs.set_apply_to_all_pages(false).unwrap();
        assert_eq!(prefs.sound_id(ClockMode::Timer), "bell");

        prefs.set(ClockMode::Timer, PrefKey::SoundId, &"chime").unwrap();
        assert_eq!(prefs.sound_id(ClockMode::Timer), "chime");
        assert_eq!(prefs.sound_id(ClockMode::Alarm), "bell");
    }

    #[test]
    fn apply_to_all_clears_shadowing_overrides() {
        let mut prefs = store();
        prefs.set_apply_to_all_pages(false).unwrap();
        prefs.set(ClockMode::Timer, PrefKey::SoundId, &"chime").unwrap();
        prefs.set(ClockMode::Alarm, PrefKey::SoundId, &"subtle").unwrap();

        prefs.set_apply_to_all_pages(true).unwrap();
        prefs.set(ClockMode::Stopwatch, PrefKey::SoundId, &"success").unwrap();

        for mode in ClockMode::ALL {
            assert_eq!(prefs.sound_id(mode), "success");
        }
    }

    #[test]
    fn malformed_entry_is_evicted() {
        let mut kv = MemoryKv::new();
        kv.set("clock-image-history", "{not json").unwrap();
        let mut prefs = PreferenceStore::new(Box::new(kv));
        assert!(prefs.image_history().is_empty());
        assert!(prefs.read_raw("clock-image-history").is_none());
    }

    #[test]
    fn failed_write_stays_visible_in_memory() {
        let mut prefs = PreferenceStore::new(Box::new(FullKv(MemoryKv::new())));
        assert!(prefs.set(ClockMode::Timer, PrefKey::SoundId, &"chime").is_err());
        assert_eq!(prefs.sound_id(ClockMode::Timer), "chime");
    }

    #[test]
    fn incomplete_background_layer_resolves_to_default() {
        let mut kv = MemoryKv::new();
        kv.set("clock-timer-background-type", "\"image\"").unwrap();
        let mut prefs = PreferenceStore::new(Box::new(kv));
        assert_eq!(prefs.background(ClockMode::Timer), Background::default());
    }

    #[test]
    fn set_background_rejects_missing_value() {
        let mut prefs = store();
        let broken = Background {
            kind: BackgroundKind::Color,
            color: None,
            image: None,
        };
        assert!(prefs.set_background(ClockMode::Timer, &broken).is_err());
    }

    #[test]
    fn page_background_switches_kind_cleanly() {
        let mut prefs = store();
        prefs.set_apply_to_all_pages(false).unwrap();
        prefs
            .set_background(ClockMode::Timer, &Background::image("data:image/png;base64,AA"))
            .unwrap();
        prefs
            .set_background(ClockMode::Timer, &Background::color("#123456"))
            .unwrap();
        let bg = prefs.background(ClockMode::Timer);
        assert_eq!(bg, Background::color("#123456"));
        assert_eq!(prefs.background(ClockMode::Alarm), Background::default());
    }

    #[test]
    fn refused_delete_still_applies_global_background() {
        let mut prefs = PreferenceStore::new(Box::new(NoDeleteKv(MemoryKv::new())));
        let result = prefs.set_background(ClockMode::Timer, &Background::color("#336699"));
        assert!(result.is_err());
        for mode in ClockMode::ALL {
            assert_eq!(prefs.background(mode), Background::color("#336699"));
        }
    }

    #[test]
    fn stored_theme_wins_over_manual_flag() {
        let mut prefs = store();
        assert_eq!(prefs.initial_theme(ClockMode::Timer, Theme::Dark), Theme::Dark);

        prefs.mark_manual_theme(ClockMode::Timer, Theme::Light).unwrap();
        assert_eq!(prefs.initial_theme(ClockMode::Timer, Theme::Dark), Theme::Light);
        assert_eq!(prefs.initial_theme(ClockMode::Alarm, Theme::Dark), Theme::Dark);

        prefs.set_theme(Theme::Dark).unwrap();
        assert_eq!(prefs.initial_theme(ClockMode::Timer, Theme::Light), Theme::Dark);
        assert_eq!(prefs.read_raw("clock-theme").as_deref(), Some("\"dark\""));
    }

    #[test]
    fn image_history_dedupes_and_caps() {
        let mut prefs = store();
        prefs.push_image_history("a").unwrap();
        prefs.push_image_history("b").unwrap();
        let history = prefs.push_image_history("a").unwrap();
        assert_eq!(history, vec!["a".to_string(), "b".to_string()]);

        let mut prefs = store();
        for i in 0..11 {
            prefs.push_image_history(&format!("img-{i}")).unwrap();
        }
        let history = prefs.image_history();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], "img-10");
        assert!(!history.contains(&"img-0".to_string()));
    }

    #[test]
    fn reset_all_restores_defaults() {
        let mut prefs = store();
        prefs.set_apply_to_all_pages(false).unwrap();
        for mode in ClockMode::ALL {
            prefs
                .set_background(mode, &Background::color("#abcdef"))
                .unwrap();
            prefs.set(mode, PrefKey::ManualTheme, &true).unwrap();
        }
        prefs.reset_all().unwrap();

        assert!(prefs.apply_to_all_pages());
        for mode in ClockMode::ALL {
            assert_eq!(prefs.background(mode), Background::default());
            assert!(!prefs.manual_theme(mode));
        }
        assert!(prefs.read_raw("clock-background-image").is_none());
    }

    #[test]
    fn light_theme_seeds_other_pages_when_image_is_page_only() {
        let mut prefs = store();
        prefs.set_apply_to_all_pages(false).unwrap();
        prefs
            .set_background(ClockMode::Timer, &Background::image("data:image/png;base64,AA"))
            .unwrap();
        prefs
            .set_background(ClockMode::Alarm, &Background::color("#ff0000"))
            .unwrap();

        prefs.mark_manual_theme(ClockMode::Timer, Theme::Light).unwrap();

        assert!(prefs.manual_theme(ClockMode::Timer));
        assert_eq!(
            prefs.background(ClockMode::Stopwatch),
            Background::color("#ffffff")
        );
        assert_eq!(
            prefs.background(ClockMode::Alarm),
            Background::color("#ff0000")
        );
        assert_eq!(prefs.background(ClockMode::Timer).kind, BackgroundKind::Image);
    }

    #[test]
    fn light_theme_without_page_image_only_marks_override() {
        let mut prefs = store();
        prefs.mark_manual_theme(ClockMode::Alarm, Theme::Light).unwrap();
        assert!(prefs.manual_theme(ClockMode::Alarm));
        assert!(!prefs.manual_theme(ClockMode::Timer));
        assert_eq!(prefs.background(ClockMode::Timer), Background::default());
    }
}

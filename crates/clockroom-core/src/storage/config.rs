//! TOML-based application configuration.
//!
//! Holds the tunables of the session engine:
//! - Default countdown length
//! - Idle threshold before controls hide in fullscreen
//! - Delay before a handed-off fullscreen request is replayed
//! - Notification sound defaults and ring length
//! - Image history cap
//! - Weather endpoint and cache lifetime
//!
//! Configuration is stored at `~/.config/clockroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_countdown_secs")]
    pub default_countdown_secs: u64,
    /// Period of the date/weekday refresh loop.
    #[serde(default = "default_refresh_ms")]
    pub date_refresh_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    #[serde(default = "default_idle_hide_ms")]
    pub idle_hide_ms: u64,
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullscreenConfig {
    #[serde(default = "default_mount_delay_ms")]
    pub mount_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_sound")]
    pub default_sound: String,
    /// How long a completion alert keeps looping.
    #[serde(default = "default_ring_ms")]
    pub ring_ms: u64,
    /// Silence between synthetic loop repetitions.
    #[serde(default = "default_loop_gap_ms")]
    pub loop_gap_ms: u64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// How long a one-shot bundled file is treated as playing.
    #[serde(default = "default_asset_once_ms")]
    pub asset_once_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_history_cap")]
    pub image_history_cap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_weather_ttl_secs")]
    pub ttl_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/clockroom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub fullscreen: FullscreenConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

fn default_countdown_secs() -> u64 {
    25 * 60
}
fn default_refresh_ms() -> u64 {
    1_000
}
fn default_idle_hide_ms() -> u64 {
    3_000
}
fn default_toast_ms() -> u64 {
    3_000
}
fn default_mount_delay_ms() -> u64 {
    100
}
fn default_sound() -> String {
    crate::audio::DEFAULT_SOUND_ID.into()
}
fn default_ring_ms() -> u64 {
    30_000
}
fn default_loop_gap_ms() -> u64 {
    600
}
fn default_sample_rate() -> u32 {
    44_100
}
fn default_asset_once_ms() -> u64 {
    3_000
}
fn default_history_cap() -> usize {
    crate::storage::preferences::DEFAULT_IMAGE_HISTORY_CAP
}
fn default_weather_url() -> String {
    "https://api.open-meteo.com".into()
}
fn default_weather_ttl_secs() -> u64 {
    4 * 60 * 60
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_countdown_secs: default_countdown_secs(),
            date_refresh_ms: default_refresh_ms(),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            idle_hide_ms: default_idle_hide_ms(),
            toast_ms: default_toast_ms(),
        }
    }
}

impl Default for FullscreenConfig {
    fn default() -> Self {
        Self {
            mount_delay_ms: default_mount_delay_ms(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            default_sound: default_sound(),
            ring_ms: default_ring_ms(),
            loop_gap_ms: default_loop_gap_ms(),
            sample_rate: default_sample_rate(),
            asset_once_ms: default_asset_once_ms(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            image_history_cap: default_history_cap(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            ttl_secs: default_weather_ttl_secs(),
        }
    }
}

impl Config {
    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    /// Replace the leaf at `key`, parsing `value` as the type already there.
    fn assign(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let replacement = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("not a leaf value".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(leaf.to_string(), replacement);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::lookup(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: serde_json::Error| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        };
        let mut json = serde_json::to_value(&*self).map_err(invalid)?;
        Self::assign(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(invalid)?;
        Ok(())
    }

    /// Set a config value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.update(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.controls.idle_hide_ms, 3_000);
        assert_eq!(parsed.audio.default_sound, "bell");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[controls]\nidle_hide_ms = 5000\n").unwrap();
        assert_eq!(parsed.controls.idle_hide_ms, 5_000);
        assert_eq!(parsed.controls.toast_ms, 3_000);
        assert_eq!(parsed.timer.default_countdown_secs, 1_500);
        assert_eq!(parsed.weather.ttl_secs, 14_400);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("fullscreen.mount_delay_ms").as_deref(), Some("100"));
        assert_eq!(cfg.get("audio.default_sound").as_deref(), Some("bell"));
        assert!(cfg.get("audio").is_none());
        assert!(cfg.get("audio.missing").is_none());
    }

    #[test]
    fn update_parses_by_existing_type() {
        let mut cfg = Config::default();
        cfg.update("controls.idle_hide_ms", "4500").unwrap();
        cfg.update("audio.default_sound", "chime").unwrap();
        assert_eq!(cfg.controls.idle_hide_ms, 4_500);
        assert_eq!(cfg.audio.default_sound, "chime");
    }

    #[test]
    fn update_rejects_unknown_key_and_bad_number() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("controls.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.update("controls.idle_hide_ms", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.update("timer", "1").is_err());
    }
}

//! Collaborators owned by the hosting page: clock tool identity, theme,
//! translations and navigation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four clock tools. Also the scope key for preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    Timer,
    Stopwatch,
    Alarm,
    WorldClock,
}

impl ClockMode {
    pub const ALL: [ClockMode; 4] = [
        ClockMode::Timer,
        ClockMode::Stopwatch,
        ClockMode::Alarm,
        ClockMode::WorldClock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClockMode::Timer => "timer",
            ClockMode::Stopwatch => "stopwatch",
            ClockMode::Alarm => "alarm",
            ClockMode::WorldClock => "worldclock",
        }
    }

    /// Route of the tool page.
    pub fn path(self) -> &'static str {
        match self {
            ClockMode::Timer => "/timer",
            ClockMode::Stopwatch => "/stopwatch",
            ClockMode::Alarm => "/alarm",
            ClockMode::WorldClock => "/world-clock",
        }
    }
}

impl fmt::Display for ClockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timer" | "countdown" => Ok(ClockMode::Timer),
            "stopwatch" => Ok(ClockMode::Stopwatch),
            "alarm" => Ok(ClockMode::Alarm),
            "worldclock" | "world-clock" => Ok(ClockMode::WorldClock),
            other => Err(format!("unknown clock mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Solid background that matches this theme.
    pub fn default_background_color(self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#000000",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Translation lookup. Treated as a pure function.
pub trait Translator {
    fn t(&self, key: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn t(&self, key: &str) -> String {
        self(key)
    }
}

/// Externally owned theme state. `theme()` is `None` until the host resolves it.
pub trait ThemeHost {
    fn theme(&self) -> Option<String>;
    fn set_theme(&mut self, value: &str);
}

/// Page-to-page navigation primitive.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Theme held in memory, for hosts without their own theme state.
#[derive(Debug, Default, Clone)]
pub struct MemoryTheme {
    value: Option<String>,
}

impl MemoryTheme {
    pub fn new(theme: Theme) -> Self {
        Self {
            value: Some(theme.as_str().to_string()),
        }
    }
}

impl ThemeHost for MemoryTheme {
    fn theme(&self) -> Option<String> {
        self.value.clone()
    }

    fn set_theme(&mut self, value: &str) {
        self.value = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_round_trip_through_strings() {
        for mode in ClockMode::ALL {
            assert_eq!(mode.as_str().parse::<ClockMode>().unwrap(), mode);
        }
        assert_eq!("world-clock".parse::<ClockMode>().unwrap(), ClockMode::WorldClock);
        assert!("sundial".parse::<ClockMode>().is_err());
    }

    #[test]
    fn closures_translate() {
        let t = |key: &str| format!("<{key}>");
        assert_eq!(t.t("toast.saved"), "<toast.saved>");
    }
}

use std::path::PathBuf;

use clap::Subcommand;
use clockroom_core::audio::catalog;
use clockroom_core::storage::image_data_url;
use clockroom_core::{Background, ClockMode, Config, Database, PrefKey, Theme};
use serde_json::json;

use super::terminal::open_preferences;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show the resolved preferences of a page
    Show {
        /// Clock page
        mode: ClockMode,
    },
    /// Choose the notification sound
    Sound {
        mode: ClockMode,
        /// Sound id (see `sound list`)
        sound_id: String,
    },
    /// Use a solid background color
    Color {
        mode: ClockMode,
        /// CSS color, e.g. "#336699"
        color: String,
    },
    /// Use an image file as background
    Image {
        mode: ClockMode,
        /// PNG, JPEG, GIF or WebP file
        path: PathBuf,
    },
    /// Go back to the theme's default background
    ClearBackground { mode: ClockMode },
    /// Whether visual changes apply to every page
    ApplyAll {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Recently used background images
    History,
    /// Switch theme the way the theme button does
    Theme { mode: ClockMode, theme: Theme },
    /// Reset every page to defaults
    Reset,
}

fn mime_for(path: &std::path::Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut prefs = open_preferences(&db, &config);

    match action {
        PrefsAction::Show { mode } => {
            let view = json!({
                "mode": mode,
                "background": prefs.background(mode),
                "sound_id": prefs.sound_id(mode),
                "apply_to_all_pages": prefs.apply_to_all_pages(),
                "manual_theme": prefs.manual_theme(mode),
                "theme": prefs.theme(),
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        PrefsAction::Sound { mode, sound_id } => {
            let meta = catalog::find(&sound_id).ok_or_else(|| format!("unknown sound: {sound_id}"))?;
            prefs.set(mode, PrefKey::SoundId, &meta.id)?;
            println!("sound for {mode}: {}", meta.id);
        }
        PrefsAction::Color { mode, color } => {
            prefs.set_background(mode, &Background::color(color))?;
            println!("ok");
        }
        PrefsAction::Image { mode, path } => {
            let mime = mime_for(&path)
                .ok_or_else(|| format!("unsupported image type: {}", path.display()))?;
            let bytes = std::fs::read(&path)?;
            let data_url = image_data_url(mime, &bytes);
            prefs.push_image_history(&data_url)?;
            prefs.set_background(mode, &Background::image(data_url))?;
            println!("ok");
        }
        PrefsAction::ClearBackground { mode } => {
            prefs.clear_background(mode)?;
            println!("ok");
        }
        PrefsAction::ApplyAll { enabled } => {
            prefs.set_apply_to_all_pages(enabled)?;
            println!("apply to all pages: {enabled}");
        }
        PrefsAction::History => {
            for (i, image) in prefs.image_history().iter().enumerate() {
                let head: String = image.chars().take(48).collect();
                println!("{i}: {head}... ({} bytes)", image.len());
            }
        }
        PrefsAction::Theme { mode, theme } => {
            match theme {
                Theme::Dark => prefs.reset_all()?,
                Theme::Light => prefs.mark_manual_theme(mode, theme)?,
            }
            prefs.set_theme(theme)?;
            println!("theme: {}", theme.as_str());
        }
        PrefsAction::Reset => {
            prefs.reset_all()?;
            println!("preferences reset to defaults");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(std::path::Path::new("a.PNG")), Some("image/png"));
        assert_eq!(mime_for(std::path::Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for(std::path::Path::new("a.txt")), None);
        assert_eq!(mime_for(std::path::Path::new("noext")), None);
    }
}

//! Terminal stand-ins for the page host.

use std::collections::BTreeSet;
use std::io::Write;

use clockroom_core::audio::VoiceId;
use clockroom_core::{AudioError, AudioOutput, Config, Database, Navigator, PreferenceStore, ToneBuffer};

/// The sound card when one can be opened, the terminal bell otherwise.
pub fn audio_output() -> Box<dyn AudioOutput> {
    device_output().unwrap_or_else(|| Box::new(TerminalBell::default()))
}

#[cfg(feature = "device-audio")]
fn device_output() -> Option<Box<dyn AudioOutput>> {
    let sounds_dir = match clockroom_core::storage::data_dir() {
        Ok(dir) => dir.join("sounds"),
        Err(e) => {
            tracing::warn!(error = %e, "no data directory for bundled sounds");
            return None;
        }
    };
    match super::device::DeviceOutput::open(sounds_dir) {
        Ok(output) => Some(Box::new(output)),
        Err(e) => {
            tracing::warn!(error = %e, "no audio device, using the terminal bell");
            None
        }
    }
}

#[cfg(not(feature = "device-audio"))]
fn device_output() -> Option<Box<dyn AudioOutput>> {
    None
}

/// Fallback output: rings the terminal bell for every voice started.
#[derive(Default)]
pub struct TerminalBell {
    next_id: VoiceId,
    voices: BTreeSet<VoiceId>,
    tags: BTreeSet<(String, VoiceId)>,
}

impl TerminalBell {
    fn ring(&mut self) -> VoiceId {
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
        self.next_id += 1;
        self.voices.insert(self.next_id);
        self.next_id
    }
}

impl AudioOutput for TerminalBell {
    fn play_buffer(&mut self, buffer: &ToneBuffer) -> Result<VoiceId, AudioError> {
        if buffer.samples.is_empty() {
            return Err(AudioError::Unavailable("empty buffer".to_string()));
        }
        Ok(self.ring())
    }

    fn play_asset(&mut self, _path: &str, tag: &str, _looped: bool) -> Result<VoiceId, AudioError> {
        let id = self.ring();
        self.tags.insert((tag.to_string(), id));
        Ok(id)
    }

    fn stop_voice(&mut self, voice: VoiceId) {
        self.voices.remove(&voice);
    }

    fn stop_tagged(&mut self, tag: &str) {
        let tagged: Vec<_> = self.tags.iter().filter(|(t, _)| t == tag).cloned().collect();
        for entry in tagged {
            self.voices.remove(&entry.1);
            self.tags.remove(&entry);
        }
    }

    fn active_voices(&self) -> usize {
        self.voices.len()
    }
}

/// Prints the page it would load.
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&mut self, path: &str) {
        println!("-> {path}");
    }
}

pub fn open_preferences(db: &Database, config: &Config) -> PreferenceStore {
    PreferenceStore::new(Box::new(db.preferences()))
        .with_history_cap(config.preferences.image_history_cap)
        .with_default_sound(config.audio.default_sound.clone())
}

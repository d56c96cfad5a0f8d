//! Playback seam.

use std::collections::BTreeMap;

use super::synth::ToneBuffer;
use crate::error::AudioError;

pub type VoiceId = u64;

/// Something that can play a tone buffer or a bundled file.
pub trait AudioOutput {
    fn play_buffer(&mut self, buffer: &ToneBuffer) -> Result<VoiceId, AudioError>;

    /// Play a bundled file, tagged so it can be bulk-stopped later.
    fn play_asset(&mut self, path: &str, tag: &str, looped: bool) -> Result<VoiceId, AudioError>;

    /// Tear down one synthesized voice.
    fn stop_voice(&mut self, voice: VoiceId);

    /// Pause, rewind and detach every element carrying `tag`.
    fn stop_tagged(&mut self, tag: &str);

    fn active_voices(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
enum Voice {
    Buffer,
    Asset { tag: String },
}

/// Output without a device. Keeps voice bookkeeping so callers can see
/// what would be playing.
#[derive(Debug, Default)]
pub struct SilentOutput {
    next_id: VoiceId,
    voices: BTreeMap<VoiceId, Voice>,
    started: usize,
}

impl SilentOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total voices ever started.
    pub fn started(&self) -> usize {
        self.started
    }

    fn add(&mut self, voice: Voice) -> VoiceId {
        self.next_id += 1;
        self.started += 1;
        self.voices.insert(self.next_id, voice);
        self.next_id
    }
}

impl AudioOutput for SilentOutput {
    fn play_buffer(&mut self, buffer: &ToneBuffer) -> Result<VoiceId, AudioError> {
        if buffer.samples.is_empty() {
            return Err(AudioError::Unavailable("empty buffer".into()));
        }
        Ok(self.add(Voice::Buffer))
    }

    fn play_asset(&mut self, _path: &str, tag: &str, _looped: bool) -> Result<VoiceId, AudioError> {
        Ok(self.add(Voice::Asset {
            tag: tag.to_string(),
        }))
    }

    fn stop_voice(&mut self, voice: VoiceId) {
        self.voices.remove(&voice);
    }

    fn stop_tagged(&mut self, tag: &str) {
        self.voices
            .retain(|_, v| !matches!(v, Voice::Asset { tag: t } if t == tag));
    }

    fn active_voices(&self) -> usize {
        self.voices.len()
    }
}

//! Sound card output through rodio.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clockroom_core::audio::VoiceId;
use clockroom_core::{AudioError, AudioOutput, ToneBuffer};
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

struct Voice {
    sink: Sink,
    tag: Option<String>,
}

/// Plays rendered tones and bundled files on the default output device.
/// Every voice gets its own sink so it can be stopped on its own.
pub struct DeviceOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sounds_dir: PathBuf,
    next_id: VoiceId,
    voices: BTreeMap<VoiceId, Voice>,
}

impl DeviceOutput {
    /// Open the default device. Bundled files are looked up by file name
    /// under `sounds_dir`.
    pub fn open(sounds_dir: PathBuf) -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
            sounds_dir,
            next_id: 0,
            voices: BTreeMap::new(),
        })
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        Sink::try_new(&self.handle).map_err(|e| AudioError::Blocked(e.to_string()))
    }

    fn keep(&mut self, sink: Sink, tag: Option<&str>) -> VoiceId {
        self.next_id += 1;
        self.voices.insert(
            self.next_id,
            Voice {
                sink,
                tag: tag.map(str::to_string),
            },
        );
        self.next_id
    }

}

/// Bundled sounds are addressed by page URL (`/sounds/x.mp3`); on disk
/// they live flat in `sounds_dir`.
fn asset_file(sounds_dir: &Path, path: &str) -> Result<PathBuf, AudioError> {
    let name = Path::new(path)
        .file_name()
        .ok_or_else(|| AudioError::Unavailable(format!("not a sound file: {path}")))?;
    Ok(sounds_dir.join(name))
}

impl AudioOutput for DeviceOutput {
    fn play_buffer(&mut self, buffer: &ToneBuffer) -> Result<VoiceId, AudioError> {
        if buffer.samples.is_empty() {
            return Err(AudioError::Unavailable("empty buffer".to_string()));
        }
        let sink = self.new_sink()?;
        sink.append(SamplesBuffer::new(1, buffer.sample_rate, buffer.samples.clone()));
        Ok(self.keep(sink, None))
    }

    fn play_asset(&mut self, path: &str, tag: &str, looped: bool) -> Result<VoiceId, AudioError> {
        let file_path = asset_file(&self.sounds_dir, path)?;
        let file = File::open(&file_path)
            .map_err(|e| AudioError::Unavailable(format!("{}: {e}", file_path.display())))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::Unavailable(format!("{}: {e}", file_path.display())))?;
        let sink = self.new_sink()?;
        if looped {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        Ok(self.keep(sink, Some(tag)))
    }

    fn stop_voice(&mut self, voice: VoiceId) {
        if let Some(voice) = self.voices.remove(&voice) {
            voice.sink.stop();
        }
    }

    fn stop_tagged(&mut self, tag: &str) {
        let tagged: Vec<VoiceId> = self
            .voices
            .iter()
            .filter(|(_, v)| v.tag.as_deref() == Some(tag))
            .map(|(id, _)| *id)
            .collect();
        for id in tagged {
            self.stop_voice(id);
        }
    }

    fn active_voices(&self) -> usize {
        self.voices.values().filter(|v| !v.sink.empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sounds_resolve_by_file_name() {
        let dir = Path::new("/data/sounds");
        assert_eq!(
            asset_file(dir, "/sounds/gentle-wake.mp3").unwrap(),
            PathBuf::from("/data/sounds/gentle-wake.mp3")
        );
        assert!(asset_file(dir, "/").is_err());
    }
}

//! Notification playback lifecycle.
//!
//! At most one alert is active per engine. Starting a new one fully stops
//! the previous one first. Synthesized tones cannot loop across their
//! envelope natively, so looping is emulated with a re-trigger deadline
//! that the owner polls.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::catalog::{self, SoundMeta, SoundSource, DEFAULT_SOUND_ID};
use super::output::{AudioOutput, VoiceId};
use super::synth::{SynthProfile, SynthType, ToneBuffer};
use crate::events::Event;

/// Tag carried by every bundled-file element this engine creates.
pub const NOTIFICATION_TAG: &str = "clock-notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayOptions {
    pub looped: bool,
    /// Stop automatically after this long.
    pub duration_ms: Option<u64>,
}

impl PlayOptions {
    pub fn once() -> Self {
        Self::default()
    }

    pub fn looped_for(duration_ms: u64) -> Self {
        Self {
            looped: true,
            duration_ms: Some(duration_ms),
        }
    }
}

#[derive(Debug)]
enum Playing {
    Synth {
        buffer: ToneBuffer,
        voice: Option<VoiceId>,
    },
    Asset {
        voice: VoiceId,
    },
}

#[derive(Debug)]
struct ActivePlayback {
    sound_id: &'static str,
    playing: Playing,
    retrigger_at_ms: Option<u64>,
    stop_at_ms: Option<u64>,
}

pub struct NotificationAudioEngine {
    output: Box<dyn AudioOutput>,
    sample_rate: u32,
    loop_gap_ms: u64,
    asset_once_ms: u64,
    rendered: HashMap<SynthType, ToneBuffer>,
    active: Option<ActivePlayback>,
}

impl NotificationAudioEngine {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            sample_rate: 44_100,
            loop_gap_ms: 600,
            asset_once_ms: 3_000,
            rendered: HashMap::new(),
            active: None,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self.rendered.clear();
        self
    }

    pub fn with_loop_gap(mut self, loop_gap_ms: u64) -> Self {
        self.loop_gap_ms = loop_gap_ms;
        self
    }

    /// Assumed length of a bundled file played once.
    pub fn with_asset_length(mut self, asset_once_ms: u64) -> Self {
        self.asset_once_ms = asset_once_ms;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_sound(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.sound_id)
    }

    pub fn output(&self) -> &dyn AudioOutput {
        self.output.as_ref()
    }

    /// Earliest pending loop or stop deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        let active = self.active.as_ref()?;
        match (active.retrigger_at_ms, active.stop_at_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Play `sound_id`. Unknown ids fall back to the default sound.
    ///
    /// Platform failures are logged and the alert plays silently; the
    /// returned event is `None` in that case.
    pub fn play(&mut self, sound_id: &str, options: PlayOptions, now_ms: u64) -> Option<Event> {
        self.stop();

        let meta = match catalog::find(sound_id) {
            Some(meta) => meta,
            None => {
                warn!(sound_id, "unknown sound, using default");
                catalog::find(DEFAULT_SOUND_ID)?
            }
        };

        let playing = match meta.source {
            SoundSource::Asset(path) => {
                match self.output.play_asset(path, NOTIFICATION_TAG, options.looped) {
                    Ok(voice) => Playing::Asset { voice },
                    Err(e) => {
                        warn!(sound_id = meta.id, error = %e, "asset playback failed");
                        return None;
                    }
                }
            }
            SoundSource::Synth(synth) => {
                let buffer = self.buffer_for(synth);
                match self.output.play_buffer(&buffer) {
                    Ok(voice) => Playing::Synth {
                        buffer,
                        voice: Some(voice),
                    },
                    Err(e) => {
                        warn!(sound_id = meta.id, error = %e, "tone playback failed");
                        return None;
                    }
                }
            }
        };

        let retrigger_at_ms = match (&playing, options.looped) {
            (Playing::Synth { buffer, .. }, true) => {
                Some(now_ms + buffer.duration_ms() + self.loop_gap_ms)
            }
            _ => None,
        };
        // A one-shot ends with its sound even without a requested duration.
        let natural_end = match (&playing, options.looped) {
            (_, true) => None,
            (Playing::Synth { buffer, .. }, false) => Some(now_ms + buffer.duration_ms()),
            (Playing::Asset { .. }, false) => Some(now_ms + self.asset_once_ms),
        };
        let stop_at_ms = match (options.duration_ms.map(|d| now_ms + d), natural_end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.active = Some(ActivePlayback {
            sound_id: meta.id,
            playing,
            retrigger_at_ms,
            stop_at_ms,
        });
        debug!(sound_id = meta.id, looped = options.looped, "notification started");
        Some(Event::NotificationStarted {
            sound_id: meta.id.to_string(),
            looped: options.looped,
        })
    }

    /// Advance loop and stop deadlines.
    pub fn poll(&mut self, now_ms: u64) -> Option<Event> {
        let active = self.active.as_mut()?;
        if active.stop_at_ms.is_some_and(|at| now_ms >= at) {
            return self.stop();
        }
        let due = active.retrigger_at_ms.filter(|at| now_ms >= *at)?;
        if let Playing::Synth { buffer, voice } = &mut active.playing {
            if let Some(old) = voice.take() {
                self.output.stop_voice(old);
            }
            match self.output.play_buffer(buffer) {
                Ok(id) => *voice = Some(id),
                Err(e) => warn!(error = %e, "loop retrigger failed"),
            }
            // Schedule from the missed deadline, not from now, so a slow
            // poll does not stretch the cadence.
            let period = buffer.duration_ms() + self.loop_gap_ms;
            let mut next = due + period;
            while next <= now_ms {
                next += period.max(1);
            }
            active.retrigger_at_ms = Some(next);
        }
        None
    }

    /// Cancel timers, tear down voices and detach tagged elements.
    /// A no-op when nothing is playing.
    pub fn stop(&mut self) -> Option<Event> {
        let active = self.active.take()?;
        match active.playing {
            Playing::Synth { voice, .. } => {
                if let Some(voice) = voice {
                    self.output.stop_voice(voice);
                }
            }
            Playing::Asset { voice } => {
                self.output.stop_voice(voice);
            }
        }
        self.output.stop_tagged(NOTIFICATION_TAG);
        debug!(sound_id = active.sound_id, "notification stopped");
        Some(Event::NotificationStopped {
            sound_id: active.sound_id.to_string(),
        })
    }

    /// Metadata of the sound that `play(sound_id)` would use.
    pub fn resolve(sound_id: &str) -> Option<&'static SoundMeta> {
        catalog::find(sound_id).or_else(|| catalog::find(DEFAULT_SOUND_ID))
    }

    fn buffer_for(&mut self, synth: SynthType) -> ToneBuffer {
        let sample_rate = self.sample_rate;
        self.rendered
            .entry(synth)
            .or_insert_with(|| SynthProfile::for_type(synth).render(sample_rate))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::output::SilentOutput;
    use crate::error::AudioError;

    fn engine() -> NotificationAudioEngine {
        NotificationAudioEngine::new(Box::new(SilentOutput::new())).with_sample_rate(8_000)
    }

    /// Refuses everything, like a browser before the first user gesture.
    struct BlockedOutput;

    impl AudioOutput for BlockedOutput {
        fn play_buffer(&mut self, _buffer: &ToneBuffer) -> Result<VoiceId, AudioError> {
            Err(AudioError::Blocked("no user gesture".into()))
        }
        fn play_asset(&mut self, _p: &str, _t: &str, _l: bool) -> Result<VoiceId, AudioError> {
            Err(AudioError::Blocked("no user gesture".into()))
        }
        fn stop_voice(&mut self, _voice: VoiceId) {}
        fn stop_tagged(&mut self, _tag: &str) {}
        fn active_voices(&self) -> usize {
            0
        }
    }

    #[test]
    fn stop_twice_is_harmless() {
        let mut engine = engine();
        engine.play("chime", PlayOptions::once(), 0);
        assert_eq!(engine.output().active_voices(), 1);
        assert!(engine.stop().is_some());
        assert!(engine.stop().is_none());
        assert_eq!(engine.output().active_voices(), 0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn stop_without_playback_is_noop() {
        let mut engine = engine();
        assert!(engine.stop().is_none());
        assert!(engine.poll(0).is_none());
    }

    #[test]
    fn new_sound_replaces_previous() {
        let mut engine = engine();
        engine.play("classic-alarm", PlayOptions::looped_for(10_000), 0);
        engine.play("bell", PlayOptions::once(), 5);
        assert_eq!(engine.current_sound(), Some("bell"));
        assert_eq!(engine.output().active_voices(), 1);
    }

    #[test]
    fn unknown_sound_falls_back_to_default() {
        let mut engine = engine();
        let event = engine.play("foghorn", PlayOptions::once(), 0);
        assert!(matches!(event, Some(Event::NotificationStarted { ref sound_id, .. }) if sound_id == "bell"));
    }

    #[test]
    fn synthetic_loop_retriggers_until_duration() {
        let mut engine = engine().with_loop_gap(500);
        engine.play("digital-beep", PlayOptions::looped_for(5_000), 0);
        let first = engine.next_deadline().unwrap();
        assert!(first < 5_000);

        assert!(engine.poll(first).is_none());
        assert!(engine.is_playing());
        assert_eq!(engine.output().active_voices(), 1);
        assert!(engine.next_deadline().unwrap() > first);

        assert!(matches!(
            engine.poll(5_000),
            Some(Event::NotificationStopped { .. })
        ));
        assert_eq!(engine.output().active_voices(), 0);
    }

    #[test]
    fn one_shot_ends_with_its_buffer() {
        let mut engine = engine();
        engine.play("chime", PlayOptions::once(), 1_000);
        let end = engine.next_deadline().unwrap();
        assert!(end > 1_000);
        assert!(end < 1_000 + 10_000);

        assert!(engine.poll(end - 1).is_none());
        assert!(engine.is_playing());
        assert!(matches!(
            engine.poll(end),
            Some(Event::NotificationStopped { ref sound_id }) if sound_id == "chime"
        ));
        assert!(!engine.is_playing());
        assert_eq!(engine.output().active_voices(), 0);
        assert!(engine.stop().is_none());
    }

    #[test]
    fn one_shot_file_uses_configured_length() {
        let mut engine = engine().with_asset_length(2_500);
        engine.play("gentle-wake", PlayOptions::once(), 0);
        assert_eq!(engine.next_deadline(), Some(2_500));
        assert!(engine.poll(24 * 60 * 60 * 1000).is_some());
        assert!(!engine.is_playing());
    }

    #[test]
    fn blocked_platform_plays_silently() {
        let mut engine = NotificationAudioEngine::new(Box::new(BlockedOutput));
        assert!(engine.play("bell", PlayOptions::once(), 0).is_none());
        assert!(engine.play("gentle-wake", PlayOptions::once(), 0).is_none());
        assert!(!engine.is_playing());
        assert!(engine.stop().is_none());
    }
}

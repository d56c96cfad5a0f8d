//! Procedural tone synthesis.
//!
//! Each [`SynthType`] maps to a [`SynthProfile`]: a handful of partials,
//! each with a waveform, a frequency ramp and an attack/decay envelope.
//! Rendering a profile yields a mono [`ToneBuffer`] any output can play.

use std::f32::consts::PI;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// Gain an exponential decay ramps down to. Zero is unreachable on an
/// exponential curve.
const DECAY_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthType {
    Bell,
    Chime,
    Success,
    Subtle,
    Reminder,
    KitchenTimer,
    DigitalBeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

impl Waveform {
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => (2.0 / PI) * phase.sin().asin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decay {
    Linear,
    Exponential,
}

/// One oscillator with its envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partial {
    pub waveform: Waveform,
    pub offset_ms: u32,
    pub duration_ms: u32,
    pub freq_start: f32,
    pub freq_end: f32,
    pub gain: f32,
    pub attack_ms: u32,
    pub decay: Decay,
}

impl Partial {
    fn tone(waveform: Waveform, offset_ms: u32, duration_ms: u32, freq: f32, gain: f32) -> Self {
        Self {
            waveform,
            offset_ms,
            duration_ms,
            freq_start: freq,
            freq_end: freq,
            gain,
            attack_ms: 5,
            decay: Decay::Exponential,
        }
    }

    fn attack(mut self, attack_ms: u32) -> Self {
        self.attack_ms = attack_ms;
        self
    }

    fn linear(mut self) -> Self {
        self.decay = Decay::Linear;
        self
    }

    fn sweep_to(mut self, freq_end: f32) -> Self {
        self.freq_end = freq_end;
        self
    }

    fn end_ms(&self) -> u32 {
        self.offset_ms + self.duration_ms
    }

    fn envelope(&self, t_ms: f32) -> f32 {
        let attack = (self.attack_ms as f32).min(self.duration_ms as f32);
        if t_ms < attack {
            return self.gain * t_ms / attack.max(f32::EPSILON);
        }
        let span = (self.duration_ms as f32 - attack).max(f32::EPSILON);
        let progress = ((t_ms - attack) / span).clamp(0.0, 1.0);
        match self.decay {
            Decay::Linear => self.gain * (1.0 - progress),
            Decay::Exponential => self.gain * (DECAY_FLOOR / self.gain).powf(progress),
        }
    }

    fn frequency(&self, t_ms: f32) -> f32 {
        if self.freq_start == self.freq_end {
            return self.freq_start;
        }
        let progress = (t_ms / self.duration_ms.max(1) as f32).clamp(0.0, 1.0);
        self.freq_start * (self.freq_end / self.freq_start).powf(progress)
    }
}

/// Time-bounded description of one synthetic alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthProfile {
    pub partials: Vec<Partial>,
}

impl SynthProfile {
    pub fn for_type(synth: SynthType) -> Self {
        use Waveform::*;
        let partials = match synth {
            SynthType::Bell => vec![
                Partial::tone(Sine, 0, 1_400, 830.0, 0.5),
                Partial::tone(Sine, 0, 900, 1_660.0, 0.2),
                Partial::tone(Sine, 0, 500, 2_490.0, 0.08),
            ],
            SynthType::Chime => vec![
                Partial::tone(Sine, 0, 800, 1_318.5, 0.35),
                Partial::tone(Sine, 180, 800, 1_046.5, 0.35),
                Partial::tone(Sine, 360, 1_000, 784.0, 0.35),
            ],
            SynthType::Success => vec![
                Partial::tone(Triangle, 0, 220, 523.25, 0.4),
                Partial::tone(Triangle, 120, 220, 659.25, 0.4),
                Partial::tone(Triangle, 240, 500, 783.99, 0.45),
            ],
            SynthType::Subtle => vec![Partial::tone(Sine, 0, 450, 440.0, 0.15).attack(60)],
            SynthType::Reminder => vec![
                Partial::tone(Sine, 0, 180, 880.0, 0.4).linear(),
                Partial::tone(Sine, 260, 180, 880.0, 0.4).linear(),
            ],
            SynthType::KitchenTimer => {
                let mut ticks: Vec<Partial> = (0..6)
                    .map(|i| Partial::tone(Square, i * 110, 25, 1_500.0, 0.12).attack(1).linear())
                    .collect();
                ticks.push(Partial::tone(Sine, 700, 700, 1_200.0, 0.45).sweep_to(1_150.0));
                ticks
            }
            SynthType::DigitalBeep => (0..3)
                .map(|i| Partial::tone(Square, i * 200, 110, 1_000.0, 0.2).attack(2).linear())
                .collect(),
        };
        Self { partials }
    }

    pub fn duration_ms(&self) -> u32 {
        self.partials.iter().map(Partial::end_ms).max().unwrap_or(0)
    }

    pub fn render(&self, sample_rate: u32) -> ToneBuffer {
        let sr = sample_rate.max(1) as f32;
        let total = (self.duration_ms() as f32 / 1000.0 * sr).ceil() as usize;
        let mut samples = vec![0.0f32; total];

        for partial in &self.partials {
            let start = (partial.offset_ms as f32 / 1000.0 * sr) as usize;
            let len = (partial.duration_ms as f32 / 1000.0 * sr) as usize;
            let mut phase = 0.0f32;
            for i in 0..len {
                let Some(slot) = samples.get_mut(start + i) else {
                    break;
                };
                let t_ms = i as f32 / sr * 1000.0;
                *slot += partial.waveform.sample(phase) * partial.envelope(t_ms);
                phase = (phase + 2.0 * PI * partial.frequency(t_ms) / sr) % (2.0 * PI);
            }
        }

        for s in &mut samples {
            *s = s.clamp(-1.0, 1.0);
        }
        ToneBuffer {
            sample_rate,
            samples,
        }
    }
}

/// Rendered mono PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl ToneBuffer {
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// 16-bit mono PCM WAV.
    pub fn write_wav<W: Write>(&self, mut out: W) -> io::Result<()> {
        let data_len = (self.samples.len() * 2) as u32;
        let byte_rate = self.sample_rate * 2;

        out.write_all(b"RIFF")?;
        out.write_all(&(36 + data_len).to_le_bytes())?;
        out.write_all(b"WAVEfmt ")?;
        out.write_all(&16u32.to_le_bytes())?;
        out.write_all(&1u16.to_le_bytes())?; // PCM
        out.write_all(&1u16.to_le_bytes())?; // mono
        out.write_all(&self.sample_rate.to_le_bytes())?;
        out.write_all(&byte_rate.to_le_bytes())?;
        out.write_all(&2u16.to_le_bytes())?;
        out.write_all(&16u16.to_le_bytes())?;
        out.write_all(b"data")?;
        out.write_all(&data_len.to_le_bytes())?;
        for s in &self.samples {
            let v = (s * i16::MAX as f32) as i16;
            out.write_all(&v.to_le_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SynthType; 7] = [
        SynthType::Bell,
        SynthType::Chime,
        SynthType::Success,
        SynthType::Subtle,
        SynthType::Reminder,
        SynthType::KitchenTimer,
        SynthType::DigitalBeep,
    ];

    #[test]
    fn every_type_renders_audible_bounded_audio() {
        for synth in ALL {
            let buffer = SynthProfile::for_type(synth).render(8_000);
            assert!(!buffer.samples.is_empty(), "{synth:?} rendered nothing");
            assert!(buffer.peak() > 0.01, "{synth:?} is silent");
            assert!(buffer.peak() <= 1.0);
            assert!(buffer.duration_ms() <= 2_000, "{synth:?} is too long");
        }
    }

    #[test]
    fn success_is_an_ascending_triad() {
        let profile = SynthProfile::for_type(SynthType::Success);
        let freqs: Vec<f32> = profile.partials.iter().map(|p| p.freq_start).collect();
        assert_eq!(freqs.len(), 3);
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn envelope_attacks_then_decays() {
        let p = Partial::tone(Waveform::Sine, 0, 1_000, 440.0, 0.5).attack(100);
        assert!(p.envelope(50.0) < p.envelope(100.0));
        assert!(p.envelope(900.0) < p.envelope(200.0));
        assert!(p.envelope(1_000.0) <= DECAY_FLOOR + f32::EPSILON);
    }

    #[test]
    fn wav_header_matches_payload() {
        let buffer = SynthProfile::for_type(SynthType::DigitalBeep).render(8_000);
        let mut bytes = Vec::new();
        buffer.write_wav(&mut bytes).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 44 + buffer.samples.len() * 2);
    }
}

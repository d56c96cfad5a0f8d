pub mod catalog;
mod engine;
mod output;
pub mod synth;

pub use catalog::{SoundMeta, SoundSource, DEFAULT_SOUND_ID};
pub use engine::{NotificationAudioEngine, PlayOptions, NOTIFICATION_TAG};
pub use output::{AudioOutput, SilentOutput, VoiceId};
pub use synth::{SynthProfile, SynthType, ToneBuffer};

//! Notification sound catalog.

use serde::Serialize;

use super::synth::SynthType;

/// Where a sound comes from. A sound is either a bundled file or a
/// synthesized tone, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum SoundSource {
    Asset(&'static str),
    Synth(SynthType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoundMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub source: SoundSource,
    /// Audit-only provenance.
    pub license: &'static str,
    pub attribution: &'static str,
    /// Sort hint; higher is listed first.
    pub usage_count: u32,
}

pub const DEFAULT_SOUND_ID: &str = "bell";

const GENERATED: &str = "Generated at runtime";

pub static SOUNDS: &[SoundMeta] = &[
    SoundMeta {
        id: "bell",
        name: "Bell",
        source: SoundSource::Synth(SynthType::Bell),
        license: "MIT",
        attribution: GENERATED,
        usage_count: 1_200,
    },
    SoundMeta {
        id: "chime",
        name: "Chime",
        source: SoundSource::Synth(SynthType::Chime),
        license: "MIT",
        attribution: GENERATED,
        usage_count: 860,
    },
    SoundMeta {
        id: "success",
        name: "Success",
        source: SoundSource::Synth(SynthType::Success),
        license: "MIT",
        attribution: GENERATED,
        usage_count: 540,
    },
    SoundMeta {
        id: "subtle",
        name: "Subtle",
        source: SoundSource::Synth(SynthType::Subtle),
        license: "MIT",
        attribution: GENERATED,
        usage_count: 410,
    },
    SoundMeta {
        id: "reminder",
        name: "Reminder",
        source: SoundSource::Synth(SynthType::Reminder),
        license: "MIT",
        attribution: GENERATED,
        usage_count: 390,
    },
    SoundMeta {
        id: "kitchen-timer",
        name: "Kitchen Timer",
        source: SoundSource::Synth(SynthType::KitchenTimer),
        license: "MIT",
        attribution: GENERATED,
        usage_count: 720,
    },
    SoundMeta {
        id: "digital-beep",
        name: "Digital Beep",
        source: SoundSource::Synth(SynthType::DigitalBeep),
        license: "MIT",
        attribution: GENERATED,
        usage_count: 980,
    },
    SoundMeta {
        id: "classic-alarm",
        name: "Classic Alarm",
        source: SoundSource::Asset("/sounds/classic-alarm.mp3"),
        license: "CC0 1.0",
        attribution: "Public domain recording",
        usage_count: 650,
    },
    SoundMeta {
        id: "gentle-wake",
        name: "Gentle Wake",
        source: SoundSource::Asset("/sounds/gentle-wake.mp3"),
        license: "CC BY 4.0",
        attribution: "Licensed field recording",
        usage_count: 300,
    },
];

pub fn find(id: &str) -> Option<&'static SoundMeta> {
    SOUNDS.iter().find(|s| s.id == id)
}

/// Most used first, ties by name.
pub fn sorted_by_usage() -> Vec<&'static SoundMeta> {
    let mut sounds: Vec<_> = SOUNDS.iter().collect();
    sounds.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.name.cmp(b.name)));
    sounds
}

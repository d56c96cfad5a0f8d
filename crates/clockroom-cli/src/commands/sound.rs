use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Subcommand;
use clockroom_core::audio::{catalog, SoundSource, SynthProfile};
use clockroom_core::{Config, NotificationAudioEngine, PlayOptions};

use super::terminal::audio_output;

#[derive(Subcommand)]
pub enum SoundAction {
    /// List notification sounds, most used first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a synthesized sound to a WAV file
    Render {
        /// Sound id
        id: String,
        /// Output file
        #[arg(long, short)]
        out: PathBuf,
        /// Sample rate in Hz (defaults to the configured rate)
        #[arg(long)]
        sample_rate: Option<u32>,
    },
    /// Play a sound once
    Play {
        /// Sound id
        id: String,
    },
}

pub fn run(action: SoundAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SoundAction::List { json } => {
            let sounds = catalog::sorted_by_usage();
            if json {
                println!("{}", serde_json::to_string_pretty(&sounds)?);
            } else {
                for meta in sounds {
                    let kind = match meta.source {
                        SoundSource::Synth(_) => "synth",
                        SoundSource::Asset(_) => "file",
                    };
                    println!("{:<14} {:<16} {kind}", meta.id, meta.name);
                }
            }
        }
        SoundAction::Render {
            id,
            out,
            sample_rate,
        } => {
            let meta = catalog::find(&id).ok_or_else(|| format!("unknown sound: {id}"))?;
            let SoundSource::Synth(synth) = meta.source else {
                return Err(format!("{id} is a bundled file, not a synthesized tone").into());
            };
            let rate = sample_rate.unwrap_or_else(|| Config::load_or_default().audio.sample_rate);
            let buffer = SynthProfile::for_type(synth).render(rate);
            buffer.write_wav(BufWriter::new(File::create(&out)?))?;
            println!(
                "wrote {} ({} ms, {} Hz)",
                out.display(),
                buffer.duration_ms(),
                rate
            );
        }
        SoundAction::Play { id } => {
            let meta = catalog::find(&id).ok_or_else(|| format!("unknown sound: {id}"))?;
            let config = Config::load_or_default();
            let mut engine = NotificationAudioEngine::new(audio_output())
                .with_sample_rate(config.audio.sample_rate)
                .with_asset_length(config.audio.asset_once_ms);
            let started = Instant::now();
            engine.play(meta.id, PlayOptions::once(), 0);
            while engine.is_playing() {
                std::thread::sleep(Duration::from_millis(20));
                engine.poll(started.elapsed().as_millis() as u64);
            }
            println!("played {}", meta.id);
        }
    }
    Ok(())
}

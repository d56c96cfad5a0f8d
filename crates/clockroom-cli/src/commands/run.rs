use std::rc::Rc;
use std::time::Duration;

use chrono::Local;
use clap::Args;
use clockroom_core::{
    Clock, ClockMode, ClockSession, Config, Database, Event, LayoutOnlyPlatform, MemoryTheme,
    SessionHost, SessionSettings, SessionSnapshot, SystemClock, Theme, TimerStatus,
};
use tracing::debug;

use super::terminal::{audio_output, open_preferences, PrintNavigator};

const TICK_MS: u64 = 250;

#[derive(Args)]
pub struct RunArgs {
    /// Clock page: timer, stopwatch, alarm, worldclock
    mode: ClockMode,
    /// Countdown length in seconds (timer page)
    #[arg(long)]
    seconds: Option<u64>,
    /// Arm the alarm this many seconds from now (alarm page)
    #[arg(long)]
    alarm_in: Option<u64>,
    /// Start in fullscreen
    #[arg(long)]
    fullscreen: bool,
    /// How long a finished timer keeps ringing, in seconds
    #[arg(long)]
    ring_secs: Option<u64>,
    /// Leave the page after this many seconds
    #[arg(long)]
    duration: Option<u64>,
    /// Override the stored theme for this run
    #[arg(long)]
    theme: Option<Theme>,
    /// Print events and status as JSON lines
    #[arg(long)]
    json: bool,
}

fn translate(key: &str) -> String {
    match key {
        "settings.saveFailed" => "Settings could not be saved".to_string(),
        _ => match key.strip_prefix("weekday.") {
            Some(day) => {
                let mut chars = day.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            None => key.to_string(),
        },
    }
}

fn format_clock(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

fn status_line(snap: &SessionSnapshot) -> String {
    let shown = snap.remaining_seconds.unwrap_or(snap.elapsed_seconds);
    let status = serde_json::to_value(snap.status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    match snap.mode {
        ClockMode::WorldClock => format!(
            "{} {}",
            snap.weekday,
            snap.local_time.format("%Y-%m-%d %H:%M:%S")
        ),
        ClockMode::Alarm if snap.remaining_seconds.is_none() => "alarm not set".to_string(),
        _ => format!("{} [{status}]", format_clock(shown)),
    }
}

fn report(events: &mut Vec<Event>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for event in events.drain(..) {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            match &event {
                Event::TimerCompleted { .. } => println!("time is up"),
                Event::NotificationStarted { sound_id, .. } => println!("ringing: {sound_id}"),
                Event::NotificationStopped { .. } => println!("alert stopped"),
                Event::FullscreenChanged { active, simulated } => {
                    println!("fullscreen: {active} (simulated: {simulated})")
                }
                Event::Toast { message } => println!("! {message}"),
                _ => {}
            }
        }
    }
    Ok(())
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());

    let mut settings = SessionSettings::from(&config);
    settings.utc_offset_secs = Local::now().offset().local_minus_utc();
    if let Some(secs) = args.ring_secs {
        settings.ring_ms = secs.saturating_mul(1000);
    }

    let host = SessionHost {
        clock: Rc::clone(&clock),
        preferences: open_preferences(&db, &config),
        navigation: Box::new(db.navigation()),
        fullscreen: Box::new(LayoutOnlyPlatform::default()),
        audio: audio_output(),
        theme: Box::new(args.theme.map(MemoryTheme::new).unwrap_or_default()),
        navigator: Box::new(PrintNavigator),
        translator: Box::new(translate),
        locale: "en".to_string(),
    };
    let mut session = ClockSession::mount(args.mode, host, settings);

    let mut events = Vec::new();
    if let Some(secs) = args.seconds {
        events.extend(session.set_countdown(secs));
    }
    if let Some(secs) = args.alarm_in {
        events.extend(session.set_alarm(clock.now_ms() + secs.saturating_mul(1000)));
    }
    if args.fullscreen {
        events.extend(session.toggle_fullscreen());
    }
    if matches!(args.mode, ClockMode::Timer | ClockMode::Stopwatch) {
        events.extend(session.toggle_run());
    }

    let started = clock.now_ms();
    let mut last_line = String::new();
    loop {
        events.extend(session.tick());
        report(&mut events, args.json)?;

        let snap = session.snapshot();
        let line = status_line(&snap);
        if line != last_line {
            if args.json {
                println!("{}", serde_json::to_string(&snap)?);
            } else {
                println!("{line}");
            }
            last_line = line;
        }

        let finished = snap.status == TimerStatus::Completed && !session.audio().is_playing();
        let expired = args
            .duration
            .is_some_and(|d| clock.now_ms().saturating_sub(started) >= d.saturating_mul(1000));
        if finished || expired {
            debug!(mode = %args.mode, finished, "leaving page");
            break;
        }
        std::thread::sleep(Duration::from_millis(TICK_MS));
    }

    events.extend(session.unmount());
    report(&mut events, args.json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(3661), "1:01:01");
    }

    #[test]
    fn weekday_translation() {
        assert_eq!(translate("weekday.monday"), "Monday");
        assert_eq!(translate("other.key"), "other.key");
    }
}

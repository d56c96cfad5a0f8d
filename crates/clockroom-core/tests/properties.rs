//! Property tests for timing and preference reset.

use clockroom_core::host::Theme;
use clockroom_core::{
    Background, BackgroundKind, ClockMode, ManualClock, MemoryKv, PrefKey, PreferenceStore,
    TimeKeeper,
};
use proptest::prelude::*;

fn mode_strategy() -> impl Strategy<Value = ClockMode> {
    prop::sample::select(ClockMode::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum Mutation {
    Color(ClockMode, String),
    Image(ClockMode, String),
    ApplyToAll(bool),
    Sound(ClockMode, String),
    ManualLight(ClockMode),
}

fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        (mode_strategy(), "#[0-9a-f]{6}").prop_map(|(m, c)| Mutation::Color(m, c)),
        (mode_strategy(), "[a-z]{1,8}")
            .prop_map(|(m, s)| Mutation::Image(m, format!("data:image/png;base64,{s}"))),
        any::<bool>().prop_map(Mutation::ApplyToAll),
        (mode_strategy(), prop::sample::select(vec!["chime", "subtle", "gentle-wake"]))
            .prop_map(|(m, s)| Mutation::Sound(m, s.to_string())),
        mode_strategy().prop_map(Mutation::ManualLight),
    ]
}

proptest! {
    /// Elapsed time equals the sum of running intervals, however the
    /// run is split into start/pause segments.
    #[test]
    fn elapsed_matches_running_time(segments in prop::collection::vec((0u64..600_000, 0u64..600_000), 1..20)) {
        let clock = ManualClock::new(1_000_000);
        let mut keeper = TimeKeeper::stopwatch();
        let mut running_ms = 0;
        for (run, idle) in segments {
            keeper.start(&clock);
            clock.advance(run);
            running_ms += run;
            keeper.pause(&clock);
            clock.advance(idle);
        }
        prop_assert_eq!(keeper.elapsed_ms(&clock), running_ms);
        prop_assert_eq!(keeper.elapsed_seconds(&clock), running_ms / 1000);
    }

    /// Switching to dark always returns every page to the defaults.
    #[test]
    fn dark_reset_restores_defaults(mutations in prop::collection::vec(mutation_strategy(), 0..24)) {
        let mut prefs = PreferenceStore::new(Box::new(MemoryKv::new()));
        for mutation in mutations {
            match mutation {
                Mutation::Color(mode, color) => {
                    prefs.set_background(mode, &Background::color(color)).unwrap();
                }
                Mutation::Image(mode, image) => {
                    prefs.set_background(mode, &Background::image(image)).unwrap();
                }
                Mutation::ApplyToAll(all) => prefs.set_apply_to_all_pages(all).unwrap(),
                Mutation::Sound(mode, sound) => prefs.set(mode, PrefKey::SoundId, &sound).unwrap(),
                Mutation::ManualLight(mode) => prefs.mark_manual_theme(mode, Theme::Light).unwrap(),
            }
        }

        prefs.reset_all().unwrap();

        prop_assert!(prefs.apply_to_all_pages());
        for mode in ClockMode::ALL {
            prop_assert_eq!(prefs.background(mode).kind, BackgroundKind::Default);
            prop_assert!(!prefs.manual_theme(mode));
        }
    }
}

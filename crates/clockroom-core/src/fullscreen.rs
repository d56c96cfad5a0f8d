//! Fullscreen state with a native-then-simulated fallback chain.
//!
//! Native variants are tried in [`FALLBACK_CHAIN`] order. If every one of
//! them fails the page is put in simulated fullscreen (layout only), so
//! the internal state always flips and the UI stays consistent.
//! A transition that is still in flight blocks new requests.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FullscreenError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeApi {
    Standard,
    Webkit,
    Moz,
    Ms,
}

pub const FALLBACK_CHAIN: [NativeApi; 4] = [
    NativeApi::Standard,
    NativeApi::Webkit,
    NativeApi::Moz,
    NativeApi::Ms,
];

/// Outcome of a platform call that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Settled,
    /// Completes later through [`FullscreenController::settle`].
    Pending,
}

pub trait FullscreenPlatform {
    fn request(&mut self, api: NativeApi) -> Result<Transition, FullscreenError>;
    fn exit(&mut self, api: NativeApi) -> Result<Transition, FullscreenError>;
    /// Layout-only fullscreen.
    fn set_simulated(&mut self, active: bool);
    /// Page-level marker that lets header and footer hide themselves.
    fn set_body_marker(&mut self, active: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", content = "api", rename_all = "lowercase")]
pub enum FullscreenMode {
    Native(NativeApi),
    Simulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    entering: bool,
    api: NativeApi,
}

pub struct FullscreenController {
    platform: Box<dyn FullscreenPlatform>,
    active: Option<FullscreenMode>,
    in_flight: Option<InFlight>,
}

impl FullscreenController {
    pub fn new(platform: Box<dyn FullscreenPlatform>) -> Self {
        Self {
            platform,
            active: None,
            in_flight: None,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.active.is_some()
    }

    pub fn mode(&self) -> Option<FullscreenMode> {
        self.active
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_fullscreen() {
            self.exit()
        } else {
            self.enter()
        }
    }

    pub fn enter(&mut self) -> Option<Event> {
        if self.in_flight.is_some() || self.active.is_some() {
            return None;
        }
        for api in FALLBACK_CHAIN {
            match self.platform.request(api) {
                Ok(Transition::Settled) => return self.apply(Some(FullscreenMode::Native(api))),
                Ok(Transition::Pending) => {
                    self.in_flight = Some(InFlight {
                        entering: true,
                        api,
                    });
                    return None;
                }
                Err(e) => debug!(?api, error = %e, "fullscreen variant unavailable"),
            }
        }
        warn!("no native fullscreen, simulating");
        self.platform.set_simulated(true);
        self.apply(Some(FullscreenMode::Simulated))
    }

    pub fn exit(&mut self) -> Option<Event> {
        if self.in_flight.is_some() {
            return None;
        }
        match self.active? {
            FullscreenMode::Simulated => {
                self.platform.set_simulated(false);
                self.apply(None)
            }
            FullscreenMode::Native(api) => match self.platform.exit(api) {
                Ok(Transition::Settled) => self.apply(None),
                Ok(Transition::Pending) => {
                    self.in_flight = Some(InFlight {
                        entering: false,
                        api,
                    });
                    None
                }
                Err(e) => {
                    warn!(?api, error = %e, "fullscreen exit rejected, leaving anyway");
                    self.apply(None)
                }
            },
        }
    }

    /// Resolve the transition in flight. A failed enter still ends in
    /// (simulated) fullscreen; an exit always ends out of fullscreen.
    pub fn settle(&mut self, ok: bool) -> Option<Event> {
        let in_flight = self.in_flight.take()?;
        match (in_flight.entering, ok) {
            (true, true) => self.apply(Some(FullscreenMode::Native(in_flight.api))),
            (true, false) => {
                warn!(api = ?in_flight.api, "fullscreen request rejected, simulating");
                self.platform.set_simulated(true);
                self.apply(Some(FullscreenMode::Simulated))
            }
            (false, _) => self.apply(None),
        }
    }

    /// The platform reports a native fullscreen change, e.g. the user
    /// pressed Escape.
    pub fn platform_changed(&mut self, native_active: bool) -> Option<Event> {
        if let Some(in_flight) = self.in_flight {
            return self.settle(in_flight.entering == native_active);
        }
        match (self.active, native_active) {
            (Some(FullscreenMode::Native(_)), false) => self.apply(None),
            _ => None,
        }
    }

    fn apply(&mut self, mode: Option<FullscreenMode>) -> Option<Event> {
        self.active = mode;
        self.platform.set_body_marker(mode.is_some());
        debug!(?mode, "fullscreen changed");
        Some(Event::FullscreenChanged {
            active: mode.is_some(),
            simulated: mode == Some(FullscreenMode::Simulated),
        })
    }
}

/// Platform with no native fullscreen at all; everything is simulated.
#[derive(Debug, Default)]
pub struct LayoutOnlyPlatform {
    pub simulated: bool,
    pub body_marker: bool,
}

impl FullscreenPlatform for LayoutOnlyPlatform {
    fn request(&mut self, api: NativeApi) -> Result<Transition, FullscreenError> {
        Err(FullscreenError::Unsupported(format!("{api:?}")))
    }

    fn exit(&mut self, api: NativeApi) -> Result<Transition, FullscreenError> {
        Err(FullscreenError::Unsupported(format!("{api:?}")))
    }

    fn set_simulated(&mut self, active: bool) {
        self.simulated = active;
    }

    fn set_body_marker(&mut self, active: bool) {
        self.body_marker = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        requests: Vec<NativeApi>,
        body_marker: bool,
        simulated: bool,
    }

    /// Supports only `supported`; answers with `answer`.
    struct FakePlatform {
        supported: Option<NativeApi>,
        answer: Transition,
        log: Rc<RefCell<Log>>,
    }

    impl FullscreenPlatform for FakePlatform {
        fn request(&mut self, api: NativeApi) -> Result<Transition, FullscreenError> {
            self.log.borrow_mut().requests.push(api);
            if Some(api) == self.supported {
                Ok(self.answer)
            } else {
                Err(FullscreenError::Unsupported(format!("{api:?}")))
            }
        }
        fn exit(&mut self, _api: NativeApi) -> Result<Transition, FullscreenError> {
            Ok(self.answer)
        }
        fn set_simulated(&mut self, active: bool) {
            self.log.borrow_mut().simulated = active;
        }
        fn set_body_marker(&mut self, active: bool) {
            self.log.borrow_mut().body_marker = active;
        }
    }

    fn controller(supported: Option<NativeApi>, answer: Transition) -> (FullscreenController, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let platform = FakePlatform {
            supported,
            answer,
            log: Rc::clone(&log),
        };
        (FullscreenController::new(Box::new(platform)), log)
    }

    #[test]
    fn falls_through_chain_to_first_supported() {
        let (mut fs, log) = controller(Some(NativeApi::Moz), Transition::Settled);
        assert!(fs.enter().is_some());
        assert_eq!(fs.mode(), Some(FullscreenMode::Native(NativeApi::Moz)));
        assert_eq!(
            log.borrow().requests,
            vec![NativeApi::Standard, NativeApi::Webkit, NativeApi::Moz]
        );
        assert!(log.borrow().body_marker);

        assert!(fs.exit().is_some());
        assert!(!fs.is_fullscreen());
        assert!(!log.borrow().body_marker);
    }

    #[test]
    fn simulates_when_every_variant_throws() {
        let (mut fs, log) = controller(None, Transition::Settled);
        let event = fs.enter();
        assert!(matches!(
            event,
            Some(Event::FullscreenChanged { active: true, simulated: true })
        ));
        assert!(log.borrow().simulated);
        fs.toggle();
        assert!(!log.borrow().simulated);
        assert!(!fs.is_fullscreen());
    }

    #[test]
    fn pending_transition_blocks_reentry() {
        let (mut fs, log) = controller(Some(NativeApi::Standard), Transition::Pending);
        assert!(fs.toggle().is_none());
        assert!(fs.is_transitioning());
        assert!(fs.toggle().is_none());
        assert!(fs.enter().is_none());
        assert_eq!(log.borrow().requests.len(), 1);

        assert!(fs.platform_changed(true).is_some());
        assert!(fs.is_fullscreen());
        assert!(!fs.is_transitioning());
    }

    #[test]
    fn rejected_pending_enter_still_flips() {
        let (mut fs, _log) = controller(Some(NativeApi::Standard), Transition::Pending);
        fs.enter();
        fs.settle(false);
        assert_eq!(fs.mode(), Some(FullscreenMode::Simulated));
    }

    #[test]
    fn escape_key_leaves_native_fullscreen() {
        let (mut fs, _log) = controller(Some(NativeApi::Standard), Transition::Settled);
        fs.enter();
        assert!(fs.platform_changed(false).is_some());
        assert!(!fs.is_fullscreen());
        assert!(fs.platform_changed(false).is_none());
    }
}

mod keeper;

pub use keeper::{SessionKind, TimeKeeper, TimerSession, TimerStatus};

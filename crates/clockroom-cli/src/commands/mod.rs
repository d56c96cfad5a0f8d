pub mod config;
pub mod navigate;
pub mod prefs;
pub mod run;
pub mod session;
pub mod sound;
pub mod weather;

#[cfg(feature = "device-audio")]
mod device;
mod terminal;

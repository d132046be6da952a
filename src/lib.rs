//! A 2D player controller: a human who can die, fade as a ghost, be reborn
//! and possess vessels, built on Bevy and Rapier.

pub mod audio;
pub mod config;
pub mod console;
pub mod core;
pub mod effects;
pub mod input;
pub mod player;
pub mod reaper;
pub mod session;
#[cfg(feature = "visual_debug")]
pub mod visual_debug;
pub mod world;

//! Throw Control Module
//!
//! This module owns ball flight: trajectory planning, the per-ball
//! `Idle -> Falling -> Bouncing -> Idle` phase machine, and the Bevy
//! systems that turn mouse and keyboard input into throws and into a
//! simulated anchor pose.

mod controller;
mod state;
mod systems;

pub use controller::*;
pub use state::*;
pub use systems::*;

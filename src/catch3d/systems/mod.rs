//! Systems module for catch3d
//!
//! This module contains the Bevy systems wrapped around the frame
//! scheduler, organized into submodules by functionality:
//!
//! - `setup`: Scene initialization (camera, light, balls, glove, HUD)
//! - `frame`: One scheduler tick per update and scene sync
//! - `hud`: Score, status and catch popup text
//! - `headless`: Scripted anchor, scripted throws and the run summary
//! - `physics`: Rapier sensor contacts (`rapier` feature)

mod frame;
mod headless;
mod hud;
#[cfg(feature = "rapier")]
mod physics;
mod setup;

// Re-export all public systems
pub use frame::{run_frame, FrameLog, SceneSnapshot};
pub use headless::{
    advance_scripted_anchor, finish_headless_run, scripted_throws, use_builtin_glove, HeadlessRun,
    ScriptedAnchor,
};
pub use hud::{place_popup_at_glove, update_hud};
#[cfg(feature = "rapier")]
pub use physics::{
    add_sensor_backend, attach_sensor_colliders, collect_sensor_contacts, sync_glove_collider,
    GloveCollider,
};
pub use setup::{poll_glove_asset, setup_scene};

//! Type definitions for the glove catch game
//!
//! This module is organized into submodules:
//! - `object` - Movable balls, the fixed-size pool and the `Spatial` capability
//! - `target` - The anchor-relative glove collider and its readiness gate
//! - `config` - Game configuration and persistence
//! - `scene` - Bevy components and resources for the rendered scene

pub mod config;
pub mod object;
pub mod scene;
pub mod target;

// Re-export all public types for convenient access
pub use config::*;
pub use object::*;
pub use scene::*;
pub use target::*;

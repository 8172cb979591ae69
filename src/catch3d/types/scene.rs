//! Scene components and resources
//!
//! Marker components tying Bevy entities back to the simulation, plus the
//! handle of the glove model being loaded.

use bevy::prelude::*;

use super::object::ObjectId;

/// Marker component for the main 3D camera
#[derive(Component)]
pub struct MainCamera;

/// Rendered ball; mirrors the pool entry with the same id.
#[derive(Component, Clone, Copy, Debug)]
pub struct BallVisual {
    pub id: ObjectId,
}

/// Rendered glove. `scale` is applied on top of the target's world pose.
#[derive(Component, Clone, Copy, Debug)]
pub struct GloveVisual {
    pub scale: f32,
}

/// Which HUD line a text entity shows.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudText {
    Score,
    Status,
    Notification,
}

/// Glove model being loaded. `None` when the built-in box is used.
#[derive(Resource, Default)]
pub struct GloveAsset {
    pub handle: Option<Handle<Scene>>,
}

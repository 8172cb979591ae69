//! Game configuration types and persistence
//!
//! Every tunable of the catch game lives here with its default. Configs are
//! stored as JSON; missing fields fall back to their defaults so old files
//! keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// What happens to a ball after it is caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoredPolicy {
    /// The ball disappears.
    #[default]
    Hide,
    /// The ball stays visible and moves with the glove.
    StickToTarget,
}

/// Where contacts come from each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactBackend {
    /// Built-in AABB overlap test.
    #[default]
    Bounds,
    /// Contacts reported from outside, e.g. physics sensor events.
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSettings {
    #[serde(default = "default_pool_size")]
    pub size: usize,
    #[serde(default = "default_pool_origin")]
    pub origin: [f32; 3],
    #[serde(default = "default_pool_spacing")]
    pub spacing: [f32; 3],
    #[serde(default = "default_ball_radius")]
    pub ball_radius: f32,
    #[serde(default = "default_visual_variants")]
    pub visual_variants: usize,
}

fn default_pool_size() -> usize {
    6
}
fn default_pool_origin() -> [f32; 3] {
    [-0.765_746_5, 0.667_171, -3.153_857]
}
fn default_pool_spacing() -> [f32; 3] {
    [0.3, 0.0, 0.0]
}
fn default_ball_radius() -> f32 {
    0.1
}
fn default_visual_variants() -> usize {
    3
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            origin: default_pool_origin(),
            spacing: default_pool_spacing(),
            ball_radius: default_ball_radius(),
            visual_variants: default_visual_variants(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowSettings {
    #[serde(default = "default_fall_duration_ms")]
    pub fall_duration_ms: f64,
    /// Half-width of the uniform x/z jitter around the ball's position.
    #[serde(default = "default_jitter")]
    pub jitter: f32,
    /// Landing height is the glove's height minus this.
    #[serde(default = "default_landing_offset")]
    pub landing_offset: f32,
    #[serde(default = "default_bounce_height")]
    pub bounce_height: f32,
    /// Glove height used when no glove is available.
    #[serde(default = "default_fallback_target_y")]
    pub fallback_target_y: f32,
}

fn default_fall_duration_ms() -> f64 {
    2000.0
}
fn default_jitter() -> f32 {
    0.25
}
fn default_landing_offset() -> f32 {
    0.1
}
fn default_bounce_height() -> f32 {
    0.3
}
fn default_fallback_target_y() -> f32 {
    -2.0
}

impl Default for ThrowSettings {
    fn default() -> Self {
        Self {
            fall_duration_ms: default_fall_duration_ms(),
            jitter: default_jitter(),
            landing_offset: default_landing_offset(),
            bounce_height: default_bounce_height(),
            fallback_target_y: default_fallback_target_y(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSettings {
    /// Glove position in the anchor's frame.
    #[serde(default = "default_target_offset")]
    pub offset: [f32; 3],
    /// Glove rotation in the anchor's frame (XYZ Euler, radians).
    #[serde(default = "default_target_rotation")]
    pub rotation_euler: [f32; 3],
    #[serde(default = "default_target_half_extents")]
    pub half_extents: [f32; 3],
    /// Render scale of the glove model.
    #[serde(default = "default_target_scale")]
    pub scale: f32,
    /// glTF model for the glove. `None` uses a built-in box that is ready at startup.
    #[serde(default)]
    pub model_path: Option<String>,
}

fn default_target_offset() -> [f32; 3] {
    [0.0, -0.7, 1.0]
}
fn default_target_rotation() -> [f32; 3] {
    [std::f32::consts::FRAC_PI_2, 0.0, 0.0]
}
fn default_target_half_extents() -> [f32; 3] {
    [0.35, 0.35, 0.2]
}
fn default_target_scale() -> f32 {
    2.0
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            offset: default_target_offset(),
            rotation_euler: default_target_rotation(),
            half_extents: default_target_half_extents(),
            scale: default_target_scale(),
            model_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionSettings {
    /// Expansion applied to ball volumes only.
    #[serde(default = "default_bounds_margin")]
    pub margin: f32,
    #[serde(default)]
    pub backend: ContactBackend,
}

fn default_bounds_margin() -> f32 {
    0.05
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            margin: default_bounds_margin(),
            backend: ContactBackend::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_display_ms")]
    pub display_ms: f64,
    #[serde(default)]
    pub policy: ScoredPolicy,
}

fn default_display_ms() -> f64 {
    2000.0
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
            policy: ScoredPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSettings {
    /// Upper bound on simulated time per frame after a stall.
    #[serde(default = "default_max_frame_delta_ms")]
    pub max_frame_delta_ms: f64,
}

fn default_max_frame_delta_ms() -> f64 {
    100.0
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: default_max_frame_delta_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub pool: PoolSettings,
    #[serde(default)]
    pub throw: ThrowSettings,
    #[serde(default)]
    pub target: TargetSettings,
    #[serde(default)]
    pub collision: CollisionSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub frame: FrameSettings,
    /// Seed for throw jitter; the same seed replays the same trajectories.
    #[serde(default)]
    pub seed: u64,
}

impl GameConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {e}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse config '{}': {e}", path.display()))?;
        Ok(config.sanitized())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {e}"))?;
        fs::write(path, json)
            .map_err(|e| format!("Failed to write config '{}': {e}", path.display()))
    }

    /// Loads `path` if given, falling back to defaults on error. The error
    /// is handed back since this usually runs before logging is set up.
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<String>) {
        let Some(path) = path else {
            return (Self::default(), None);
        };
        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Clamps values that would break the simulation (negative durations,
    /// margins or radii).
    pub fn sanitized(mut self) -> Self {
        self.pool.ball_radius = self.pool.ball_radius.max(0.0);
        self.throw.fall_duration_ms = self.throw.fall_duration_ms.max(0.0);
        self.throw.jitter = self.throw.jitter.abs();
        self.collision.margin = self.collision.margin.max(0.0);
        self.scoring.display_ms = self.scoring.display_ms.max(0.0);
        self.frame.max_frame_delta_ms = self.frame.max_frame_delta_ms.max(0.0);
        self
    }
}

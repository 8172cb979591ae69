//! Throw Control State
//!
//! Per-ball flight phases and the throw order they carry.

use bevy::prelude::*;

use crate::catch3d::scheduler::AnchorProvider;
use crate::catch3d::tween::{Easing, TweenHandle};
use crate::catch3d::types::{AnchorPose, GameConfig};

/// Easing for the flight to the landing point.
pub const FALL_EASING: Easing = Easing::QuadraticOut;
/// Easing for the hop from the landing point to the apex.
pub const BOUNCE_EASING: Easing = Easing::BounceOut;

/// A planned throw. Lives as long as its two tweens.
#[derive(Clone, Copy, Debug)]
pub struct ThrowOrder {
    pub origin: Vec3,
    pub landing: Vec3,
    pub apex: Vec3,
    pub fall_duration_ms: f64,
    pub fall_easing: Easing,
    pub bounce_easing: Easing,
}

impl ThrowOrder {
    /// The bounce takes half as long as the fall.
    pub fn bounce_duration_ms(&self) -> f64 {
        self.fall_duration_ms * 0.5
    }
}

/// `Idle -> Falling -> Bouncing -> Idle`. A new throw may replace
/// `Falling` or `Bouncing` at any time.
#[derive(Clone, Copy, Debug, Default)]
pub enum FlightPhase {
    #[default]
    Idle,
    Falling {
        tween: TweenHandle,
        order: ThrowOrder,
    },
    Bouncing {
        tween: TweenHandle,
        order: ThrowOrder,
    },
}

impl FlightPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, FlightPhase::Idle)
    }

    pub fn is_falling(&self) -> bool {
        matches!(self, FlightPhase::Falling { .. })
    }

    pub fn is_bouncing(&self) -> bool {
        matches!(self, FlightPhase::Bouncing { .. })
    }

    pub fn tween(&self) -> Option<TweenHandle> {
        match self {
            FlightPhase::Idle => None,
            FlightPhase::Falling { tween, .. } | FlightPhase::Bouncing { tween, .. } => {
                Some(*tween)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlightPhase::Idle => "idle",
            FlightPhase::Falling { .. } => "falling",
            FlightPhase::Bouncing { .. } => "bouncing",
        }
    }
}

/// Stand-in for face tracking in the windowed app: the glove follows the
/// cursor across a vertical plane through the ball row.
#[derive(Resource, Clone, Debug)]
pub struct SimulatedAnchor {
    pub pose: AnchorPose,
    /// When off the anchor reports "not visible", as if the face left view.
    pub tracking: bool,
    /// World z of the plane the glove moves in.
    pub plane_z: f32,
    /// Glove position relative to the anchor.
    pub glove_offset: Vec3,
}

impl SimulatedAnchor {
    /// Anchor placed so the glove starts at `glove_at`.
    pub fn new(glove_at: Vec3, glove_offset: Vec3) -> Self {
        Self {
            pose: AnchorPose::at(glove_at - glove_offset),
            tracking: true,
            plane_z: glove_at.z,
            glove_offset,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let row = Vec3::from_array(config.pool.origin);
        Self::new(
            Vec3::new(0.0, row.y - 2.0, row.z),
            Vec3::from_array(config.target.offset),
        )
    }

    /// Moves the anchor so the glove lands on `glove_at`.
    pub fn place_glove(&mut self, glove_at: Vec3) {
        self.pose.position = glove_at - self.glove_offset;
    }
}

impl AnchorProvider for SimulatedAnchor {
    fn anchor_pose(&self) -> AnchorPose {
        if self.tracking {
            self.pose
        } else {
            AnchorPose::hidden()
        }
    }
}

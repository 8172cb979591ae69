//! The anchored target (the glove).
//!
//! The glove sits at a fixed offset from the tracked face anchor. It only
//! takes part in collision once its asset has loaded and while the anchor
//! is in view.

use bevy::log::{info, warn};
use bevy::prelude::*;

use super::config::TargetSettings;
use super::object::Spatial;
use crate::catch3d::bounds::Aabb;

/// Tracked anchor pose, polled once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPose {
    pub visible: bool,
    pub position: Vec3,
    pub rotation: Quat,
}

impl AnchorPose {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            visible: true,
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for AnchorPose {
    fn default() -> Self {
        Self::hidden()
    }
}

/// Asset readiness. `Loading` moves to `Ready` or `Failed` once and never back.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TargetReadiness {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct Target {
    readiness: TargetReadiness,
    pose: AnchorPose,
    local_offset: Vec3,
    local_rotation: Quat,
    half_extents: Vec3,
}

impl Target {
    pub fn new(settings: &TargetSettings) -> Self {
        let [rx, ry, rz] = settings.rotation_euler;
        Self {
            readiness: TargetReadiness::Loading,
            pose: AnchorPose::hidden(),
            local_offset: Vec3::from_array(settings.offset),
            local_rotation: Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            half_extents: Vec3::from_array(settings.half_extents).abs(),
        }
    }

    pub fn readiness(&self) -> &TargetReadiness {
        &self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == TargetReadiness::Ready
    }

    /// Returns `false` if the target had already left `Loading`.
    pub fn mark_ready(&mut self) -> bool {
        if self.readiness != TargetReadiness::Loading {
            return false;
        }
        info!("Glove asset ready; catching enabled");
        self.readiness = TargetReadiness::Ready;
        true
    }

    /// A failed load is terminal for the session; balls keep flying but
    /// can never be caught.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> bool {
        if self.readiness != TargetReadiness::Loading {
            return false;
        }
        let reason = reason.into();
        warn!("Glove asset failed to load: {reason}");
        self.readiness = TargetReadiness::Failed(reason);
        true
    }

    pub fn apply_anchor(&mut self, pose: AnchorPose) {
        self.pose = pose;
    }

    pub fn pose(&self) -> &AnchorPose {
        &self.pose
    }

    /// Ready and currently tracked.
    pub fn is_present(&self) -> bool {
        self.is_ready() && self.pose.visible
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn world_position(&self) -> Vec3 {
        self.pose.position + self.pose.rotation * self.local_offset
    }

    pub fn world_rotation(&self) -> Quat {
        self.pose.rotation * self.local_rotation
    }

    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.world_rotation().inverse() * (world - self.world_position())
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.world_position() + self.world_rotation() * local
    }
}

impl Spatial for Target {
    fn position(&self) -> Vec3 {
        self.world_position()
    }

    fn bounding_volume(&self) -> Option<Aabb> {
        if !self.is_present() {
            return None;
        }
        Some(Aabb::from_oriented_box(
            self.world_position(),
            self.world_rotation(),
            self.half_extents,
        ))
    }
}

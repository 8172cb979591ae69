//! Axis-aligned bounding volumes
//!
//! Every movable object and the anchored target get one [`Aabb`] per frame.
//! Ball volumes carry a fixed margin so a fast ball does not skip past the
//! glove between two frames; the glove's volume stays tight.

use bevy::prelude::*;

use crate::catch3d::types::{ObjectId, ObjectPool, Spatial, Target};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Builds a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self::from_center_half_extents(center, Vec3::splat(radius))
    }

    /// Smallest axis-aligned box containing a rotated box.
    pub fn from_oriented_box(center: Vec3, rotation: Quat, half_extents: Vec3) -> Self {
        let basis = Mat3::from_quat(rotation);
        let h = half_extents.abs();
        let extent =
            basis.x_axis.abs() * h.x + basis.y_axis.abs() * h.y + basis.z_axis.abs() * h.z;
        Self::from_center_half_extents(center, extent)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grows the box by `margin` on every side. Negative margins are ignored.
    pub fn expanded(&self, margin: f32) -> Self {
        let m = Vec3::splat(margin.max(0.0));
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Overlap on all three axes. Touching faces count as overlapping.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// A pick ray in world space. The direction is normalized on construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test. Returns the entry distance (0 when starting inside).
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        if self.direction == Vec3::ZERO {
            return None;
        }

        let inv = |d: f32| if d.abs() > 1e-8 { 1.0 / d } else { f32::MAX };
        let inv_dir = Vec3::new(
            inv(self.direction.x),
            inv(self.direction.y),
            inv(self.direction.z),
        );

        let t1 = (aabb.min - self.origin) * inv_dir;
        let t2 = (aabb.max - self.origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

/// Holds the per-frame volumes for the pool and the target.
#[derive(Clone, Debug, Default)]
pub struct BoundingVolumeTracker {
    margin: f32,
    objects: Vec<Aabb>,
    target: Option<Aabb>,
}

impl BoundingVolumeTracker {
    pub fn new(margin: f32) -> Self {
        Self {
            margin: margin.max(0.0),
            ..Default::default()
        }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Recomputes every volume from current transforms. Must run after the
    /// tween pass and the anchor update of the same frame.
    pub fn refresh(&mut self, pool: &ObjectPool, target: &Target) {
        self.objects.clear();
        self.objects.extend(pool.iter().map(|object| {
            object
                .bounding_volume()
                .unwrap_or_else(|| Aabb::from_sphere(object.position, 0.0))
                .expanded(self.margin)
        }));
        self.target = target.bounding_volume();
    }

    pub fn objects(&self) -> &[Aabb] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&Aabb> {
        self.objects.get(id.0)
    }

    /// `None` while the target is not ready or its anchor is out of view.
    pub fn target(&self) -> Option<&Aabb> {
        self.target.as_ref()
    }
}

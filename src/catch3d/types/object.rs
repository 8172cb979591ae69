//! Movable objects (the balls) and their fixed-size pool.

use std::fmt;

use bevy::prelude::*;

use super::config::PoolSettings;
use crate::catch3d::bounds::Aabb;

/// Index of an object in its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ball#{}", self.0)
    }
}

/// Anything with a world position that can be bounded for collision.
pub trait Spatial {
    fn position(&self) -> Vec3;

    /// `None` when the object currently has no collidable extent.
    fn bounding_volume(&self) -> Option<Aabb>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovableObject {
    pub id: ObjectId,
    pub position: Vec3,
    /// Material variant used by the renderer.
    pub visual_index: usize,
    /// True while a throw animation owns this object.
    pub thrown: bool,
    pub visible: bool,
    pub radius: f32,
    /// Offset in the target's local frame once the object sticks to the glove.
    pub attachment: Option<Vec3>,
}

impl MovableObject {
    pub fn new(id: ObjectId, position: Vec3, radius: f32, visual_index: usize) -> Self {
        Self {
            id,
            position,
            visual_index,
            thrown: false,
            visible: true,
            radius: radius.max(0.0),
            attachment: None,
        }
    }
}

impl Spatial for MovableObject {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn bounding_volume(&self) -> Option<Aabb> {
        Some(Aabb::from_sphere(self.position, self.radius))
    }
}

/// Balls are created once at startup and never destroyed.
#[derive(Clone, Debug, Default)]
pub struct ObjectPool {
    objects: Vec<MovableObject>,
}

impl ObjectPool {
    /// Lays the pool out in a row: `origin + spacing * i`.
    pub fn from_settings(settings: &PoolSettings) -> Self {
        let origin = Vec3::from_array(settings.origin);
        let spacing = Vec3::from_array(settings.spacing);
        let variants = settings.visual_variants.max(1);

        let objects = (0..settings.size)
            .map(|i| {
                MovableObject::new(
                    ObjectId(i),
                    origin + spacing * i as f32,
                    settings.ball_radius,
                    i % variants,
                )
            })
            .collect();

        Self { objects }
    }

    pub fn with_positions(positions: impl IntoIterator<Item = Vec3>, radius: f32) -> Self {
        let objects = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| MovableObject::new(ObjectId(i), p, radius, 0))
            .collect();
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        id.0 < self.objects.len()
    }

    pub fn get(&self, id: ObjectId) -> Option<&MovableObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut MovableObject> {
        self.objects.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovableObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MovableObject> {
        self.objects.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_layout_from_settings() {
        let settings = PoolSettings {
            size: 4,
            origin: [1.0, 2.0, 3.0],
            spacing: [0.5, 0.0, 0.0],
            ball_radius: 0.1,
            visual_variants: 3,
        };
        let pool = ObjectPool::from_settings(&settings);

        assert_eq!(pool.len(), 4);
        assert_eq!(pool.get(ObjectId(2)).map(|o| o.position), Some(Vec3::new(2.0, 2.0, 3.0)));
        assert_eq!(pool.get(ObjectId(3)).map(|o| o.visual_index), Some(0));
        assert!(pool.iter().all(|o| o.visible && !o.thrown && o.attachment.is_none()));
    }

    #[test]
    fn test_unknown_id_is_not_in_pool() {
        let pool = ObjectPool::with_positions([Vec3::ZERO], 0.1);
        assert!(pool.contains(ObjectId(0)));
        assert!(!pool.contains(ObjectId(1)));
        assert!(pool.get(ObjectId(7)).is_none());
    }

    #[test]
    fn test_ball_volume_is_sphere_box() {
        let ball = MovableObject::new(ObjectId(0), Vec3::new(1.0, 0.0, 0.0), 0.25, 0);
        let volume = ball.bounding_volume().expect("balls always have a volume");
        assert_eq!(volume.min, Vec3::new(0.75, -0.25, -0.25));
        assert_eq!(volume.max, Vec3::new(1.25, 0.25, 0.25));
    }
}

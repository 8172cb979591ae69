//! Glove-vs-ball contact detection.
//!
//! The detector keeps no state between calls: it only compares the volumes
//! refreshed for the current frame. Counting a contact episode once is the
//! scoring machine's job.

use crate::catch3d::bounds::Aabb;
use crate::catch3d::types::{ObjectId, ObjectPool};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactReport {
    pub object: ObjectId,
    pub contact: bool,
}

/// Tests the target volume against every visible ball accepted by `eligible`.
///
/// Returns at most one report per ball, in pool order. With no target
/// volume (glove not loaded or out of view) nothing is reported.
pub fn detect(
    target: Option<&Aabb>,
    volumes: &[Aabb],
    pool: &ObjectPool,
    eligible: impl Fn(ObjectId) -> bool,
) -> Vec<ContactReport> {
    let Some(target) = target else {
        return Vec::new();
    };

    pool.iter()
        .filter(|object| object.visible && eligible(object.id))
        .filter_map(|object| {
            let volume = volumes.get(object.id.0)?;
            Some(ContactReport {
                object: object.id,
                contact: volume.intersects(target),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec3;

    fn volumes(pool: &ObjectPool) -> Vec<Aabb> {
        pool.iter()
            .map(|o| Aabb::from_sphere(o.position, o.radius))
            .collect()
    }

    #[test]
    fn test_no_target_no_reports() {
        let pool = ObjectPool::with_positions([Vec3::ZERO], 0.5);
        assert!(detect(None, &volumes(&pool), &pool, |_| true).is_empty());
    }

    #[test]
    fn test_hidden_and_ineligible_objects_are_skipped() {
        let mut pool = ObjectPool::with_positions([Vec3::ZERO, Vec3::ZERO, Vec3::ZERO], 0.5);
        if let Some(o) = pool.get_mut(ObjectId(0)) {
            o.visible = false;
        }
        let v = volumes(&pool);
        let target = Aabb::from_sphere(Vec3::ZERO, 0.5);

        let reports = detect(Some(&target), &v, &pool, |id| id != ObjectId(1));
        assert_eq!(
            reports,
            vec![ContactReport {
                object: ObjectId(2),
                contact: true
            }]
        );
    }

    #[test]
    fn test_partial_axis_overlap_is_not_contact() {
        let pool = ObjectPool::with_positions([Vec3::new(0.0, 5.0, 0.0)], 0.5);
        let target = Aabb::from_sphere(Vec3::ZERO, 0.5);
        let reports = detect(Some(&target), &volumes(&pool), &pool, |_| true);
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].contact);
    }
}

//! Tests for bounding volumes, ray picking and contact detection

use bevy::prelude::{Quat, Vec3};
use glovecatch::catch3d::bounds::{Aabb, BoundingVolumeTracker, Ray};
use glovecatch::catch3d::collision::detect;
use glovecatch::catch3d::types::{AnchorPose, ObjectId, ObjectPool, Target, TargetSettings};

fn unit_box(center: Vec3) -> Aabb {
    Aabb::from_center_half_extents(center, Vec3::splat(0.5))
}

#[test]
fn test_intersection_is_symmetric() {
    let a = unit_box(Vec3::ZERO);
    for x in [-2.0, -1.0, -0.5, 0.0, 0.9, 1.0, 1.01, 3.0] {
        for y in [-1.2, 0.0, 0.7] {
            for z in [-1.0, 0.3, 1.5] {
                let b = unit_box(Vec3::new(x, y, z));
                assert_eq!(a.intersects(&b), b.intersects(&a), "offset ({x}, {y}, {z})");
            }
        }
    }
}

#[test]
fn test_contact_needs_overlap_on_all_three_axes() {
    let a = unit_box(Vec3::ZERO);
    assert!(a.intersects(&unit_box(Vec3::new(0.5, 0.5, 0.5))));
    assert!(!a.intersects(&unit_box(Vec3::new(0.5, 0.5, 1.5))));
    assert!(!a.intersects(&unit_box(Vec3::new(0.5, 1.5, 0.5))));
    assert!(!a.intersects(&unit_box(Vec3::new(1.5, 0.5, 0.5))));
}

#[test]
fn test_touching_faces_count_as_contact() {
    let a = unit_box(Vec3::ZERO);
    assert!(a.intersects(&unit_box(Vec3::new(1.0, 0.0, 0.0))));
}

#[test]
fn test_rotated_box_bounds_cover_all_corners() {
    let half = Vec3::new(0.35, 0.35, 0.2);
    let rotation = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
    let aabb = Aabb::from_oriented_box(Vec3::ZERO, rotation, half);
    assert!((aabb.half_extents() - Vec3::new(0.35, 0.2, 0.35)).length() < 1e-5);
}

#[test]
fn test_tracker_expands_balls_but_not_target() {
    let pool = ObjectPool::with_positions([Vec3::ZERO, Vec3::X], 0.1);
    let mut target = Target::new(&TargetSettings {
        offset: [0.0, 0.0, 0.0],
        rotation_euler: [0.0, 0.0, 0.0],
        half_extents: [0.2, 0.2, 0.2],
        ..Default::default()
    });
    target.mark_ready();
    target.apply_anchor(AnchorPose::at(Vec3::new(0.0, 2.0, 0.0)));

    let mut tracker = BoundingVolumeTracker::new(0.05);
    tracker.refresh(&pool, &target);

    assert_eq!(tracker.objects().len(), 2);
    let ball = tracker.object(ObjectId(1)).expect("one volume per ball");
    assert!((ball.half_extents() - Vec3::splat(0.15)).length() < 1e-6);
    let glove = tracker.target().expect("target is present");
    assert!((glove.half_extents() - Vec3::splat(0.2)).length() < 1e-6);
}

#[test]
fn test_hidden_balls_still_get_a_volume() {
    let mut pool = ObjectPool::with_positions([Vec3::ZERO], 0.1);
    if let Some(ball) = pool.get_mut(ObjectId(0)) {
        ball.visible = false;
    }
    let mut tracker = BoundingVolumeTracker::new(0.0);
    tracker.refresh(&pool, &Target::new(&TargetSettings::default()));
    assert_eq!(tracker.objects().len(), 1);
    assert!(tracker.target().is_none());
}

#[test]
fn test_detect_reports_only_the_overlapping_ball() {
    let positions = (0..6).map(|i| Vec3::new(i as f32 * 0.3, 0.0, 0.0));
    let pool = ObjectPool::with_positions(positions, 0.1);
    let volumes: Vec<Aabb> = pool
        .iter()
        .map(|o| Aabb::from_sphere(o.position, o.radius).expanded(0.05))
        .collect();
    let target = Aabb::from_center_half_extents(Vec3::new(0.6, 0.0, 0.0), Vec3::splat(0.1));

    let reports = detect(Some(&target), &volumes, &pool, |_| true);
    assert_eq!(reports.len(), 6);
    let hits: Vec<ObjectId> = reports.iter().filter(|r| r.contact).map(|r| r.object).collect();
    assert_eq!(hits, vec![ObjectId(2)]);
}

#[test]
fn test_ray_hits_nearest_face() {
    let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
    let t = ray.intersect_aabb(&unit_box(Vec3::ZERO)).expect("ray points at the box");
    assert!((t - 4.5).abs() < 1e-5);
    assert!((ray.point_at(t).z - 0.5).abs() < 1e-5);
}

#[test]
fn test_ray_misses_box_behind_origin() {
    let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
    assert!(ray.intersect_aabb(&unit_box(Vec3::ZERO)).is_none());
    let zero = Ray::new(Vec3::ZERO, Vec3::ZERO);
    assert!(zero.intersect_aabb(&unit_box(Vec3::ZERO)).is_none());
}

#[test]
fn test_detect_needs_overlap_on_every_axis() {
    let pool = ObjectPool::with_positions([Vec3::ZERO], 0.1);
    let volumes = [Aabb::from_sphere(Vec3::ZERO, 0.1).expanded(0.05)];
    let glove_at = |center: Vec3| Aabb::from_center_half_extents(center, Vec3::splat(0.1));
    let touching = |center: Vec3| detect(Some(&glove_at(center)), &volumes, &pool, |_| true)[0].contact;

    assert!(touching(Vec3::new(0.2, 0.2, 0.2)));
    assert!(!touching(Vec3::new(0.3, 0.2, 0.2)));
    assert!(!touching(Vec3::new(0.2, 0.3, 0.2)));
    assert!(!touching(Vec3::new(0.2, 0.2, 0.3)));
    assert!(!touching(Vec3::new(-0.2, -0.2, -0.3)));
}

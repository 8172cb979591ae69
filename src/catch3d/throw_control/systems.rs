//! Throw Control Systems
//!
//! Contains systems for moving the simulated anchor with the mouse, toggling
//! tracking, and turning clicks and key presses into throws.

use bevy::log::{debug, info};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::state::*;
use crate::catch3d::bounds::Ray;
use crate::catch3d::scheduler::FrameScheduler;
use crate::catch3d::types::MainCamera;

fn cursor_ray(
    windows: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) -> Option<Ray> {
    let window = windows.single().ok()?;
    let cursor_position = window.cursor_position()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    let ray = camera
        .viewport_to_world(camera_transform, cursor_position)
        .ok()?;
    Some(Ray::new(ray.origin, *ray.direction))
}

/// System to move the glove with the mouse
///
/// Casts a ray from the camera through the cursor and intersects it with the
/// glove's plane (Z = plane_z). The anchor is placed so the glove sits on
/// the hit point.
pub fn update_anchor_from_mouse(
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut anchor: ResMut<SimulatedAnchor>,
) {
    let Some(ray) = cursor_ray(&windows, &camera_query) else {
        return;
    };

    // Ray is parallel to the plane
    if ray.direction.z.abs() < 0.0001 {
        return;
    }

    let t = (anchor.plane_z - ray.origin.z) / ray.direction.z;
    if t < 0.0 {
        return;
    }

    let hit = ray.point_at(t);
    anchor.place_glove(hit);
}

/// H toggles tracking, simulating the face leaving and re-entering view.
pub fn toggle_anchor_tracking(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut anchor: ResMut<SimulatedAnchor>,
) {
    if keyboard.just_pressed(KeyCode::KeyH) {
        anchor.tracking = !anchor.tracking;
        info!(
            "Anchor tracking {}",
            if anchor.tracking { "resumed" } else { "lost" }
        );
    }
}

/// Left click throws the ball under the cursor; Space throws the next
/// ball that is at rest.
pub fn handle_throw_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut scheduler: ResMut<FrameScheduler>,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        if let Some(ray) = cursor_ray(&windows, &camera_query) {
            if scheduler.throw_selected(&ray).is_none() {
                debug!("Click hit no throwable ball");
            }
        }
    }

    if keyboard.just_pressed(KeyCode::Space) {
        match scheduler.state().next_throwable() {
            Some(id) => {
                scheduler.throw_object(id, None);
            }
            None => debug!("No ball at rest to throw"),
        }
    }
}

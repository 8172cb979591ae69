//! Rapier sensor contact backend.
//!
//! Balls get kinematic sphere colliders and the glove a sensor box. Every
//! frame the balls currently intersecting the sensor are queued on the game
//! state, which scores them instead of running its own overlap test. The
//! sensor is disabled while the glove is not present, so it never touches
//! balls from a stale pose.

use bevy::log::debug;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::frame::run_frame;
use super::setup::setup_scene;
use crate::catch3d::scheduler::{AnchorProvider, FrameScheduler};
use crate::catch3d::types::BallVisual;

/// Collider entity for the glove, kept separate from the (scaled) visual.
#[derive(Component)]
pub struct GloveCollider;

fn contact_types() -> ActiveCollisionTypes {
    ActiveCollisionTypes::default()
        | ActiveCollisionTypes::KINEMATIC_KINEMATIC
        | ActiveCollisionTypes::KINEMATIC_STATIC
}

pub fn attach_sensor_colliders(
    mut commands: Commands,
    scheduler: Res<FrameScheduler>,
    balls: Query<(Entity, &BallVisual)>,
) {
    let state = scheduler.state();

    for (entity, ball) in balls.iter() {
        let Some(object) = state.pool().get(ball.id) else {
            continue;
        };
        commands.entity(entity).insert((
            RigidBody::KinematicPositionBased,
            Collider::ball(object.radius),
            contact_types(),
        ));
    }

    let half = state.target().half_extents();
    commands.spawn((
        Collider::cuboid(half.x, half.y, half.z),
        Sensor,
        ColliderDisabled,
        contact_types(),
        Transform::default(),
        GloveCollider,
    ));
}

/// Follows the target's world pose while it is present and disables the
/// sensor while it is not.
pub fn sync_glove_collider(
    mut commands: Commands,
    scheduler: Res<FrameScheduler>,
    mut colliders: Query<(Entity, &mut Transform, Has<ColliderDisabled>), With<GloveCollider>>,
) {
    let target = scheduler.state().target();
    let present = target.is_present();

    for (entity, mut transform, disabled) in colliders.iter_mut() {
        if !present {
            if !disabled {
                debug!("Glove sensor disabled");
                commands.entity(entity).insert(ColliderDisabled);
            }
            continue;
        }

        transform.translation = target.world_position();
        transform.rotation = target.world_rotation();
        if disabled {
            debug!("Glove sensor enabled");
            commands.entity(entity).remove::<ColliderDisabled>();
        }
    }
}

/// Queues every ball the enabled glove sensor currently intersects.
pub fn collect_sensor_contacts(
    rapier: ReadRapierContext,
    balls: Query<&BallVisual>,
    gloves: Query<Entity, (With<GloveCollider>, Without<ColliderDisabled>)>,
    mut scheduler: ResMut<FrameScheduler>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for glove in gloves.iter() {
        for (e1, e2, intersecting) in context.intersection_pairs_with(glove) {
            if !intersecting {
                continue;
            }
            let other = if e1 == glove { e2 } else { e1 };
            if let Ok(ball) = balls.get(other) {
                if scheduler.state().scoreboard().is_active(ball.id) {
                    debug!("Sensor contact with {}", ball.id);
                }
                scheduler.state_mut().report_external_contact(ball.id);
            }
        }
    }
}

/// Registers the rapier plugin and the sensor systems around `run_frame::<A>`.
pub fn add_sensor_backend<A: AnchorProvider + Resource>(app: &mut App) {
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_systems(Startup, attach_sensor_colliders.after(setup_scene))
        .add_systems(
            Update,
            (
                collect_sensor_contacts.before(run_frame::<A>),
                sync_glove_collider.after(run_frame::<A>),
            ),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catch3d::scheduler::NullRender;
    use crate::catch3d::types::{AnchorPose, GameConfig};

    fn sensor_app() -> (App, Entity) {
        let mut app = App::new();
        app.insert_resource(FrameScheduler::new(GameConfig::default()))
            .add_systems(Update, sync_glove_collider);
        let glove = app
            .world_mut()
            .spawn((Transform::default(), ColliderDisabled, GloveCollider))
            .id();
        (app, glove)
    }

    fn tick_with(app: &mut App, now_ms: f64, anchor: AnchorPose) {
        app.world_mut()
            .resource_mut::<FrameScheduler>()
            .tick(now_ms, &anchor, &mut NullRender);
        app.update();
    }

    fn is_disabled(app: &App, glove: Entity) -> bool {
        app.world().get::<ColliderDisabled>(glove).is_some()
    }

    #[test]
    fn test_sensor_follows_target_readiness() {
        let (mut app, glove) = sensor_app();
        let pose = AnchorPose::at(Vec3::new(0.2, -1.5, 0.0));

        // Still loading: stays disabled even with a visible anchor.
        tick_with(&mut app, 0.0, pose);
        assert!(is_disabled(&app, glove));

        app.world_mut()
            .resource_mut::<FrameScheduler>()
            .state_mut()
            .target_loaded(Ok(()));
        tick_with(&mut app, 16.0, pose);
        assert!(!is_disabled(&app, glove));
        let expected = app
            .world()
            .resource::<FrameScheduler>()
            .state()
            .target()
            .world_position();
        let transform = app.world().get::<Transform>(glove).copied();
        assert_eq!(transform.map(|t| t.translation), Some(expected));

        // Tracking lost: disabled again and left where it was.
        tick_with(&mut app, 32.0, AnchorPose::hidden());
        assert!(is_disabled(&app, glove));
        let transform = app.world().get::<Transform>(glove).copied();
        assert_eq!(transform.map(|t| t.translation), Some(expected));

        tick_with(&mut app, 48.0, pose);
        assert!(!is_disabled(&app, glove));
    }
}

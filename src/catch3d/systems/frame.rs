//! Per-frame driver system
//!
//! Runs one scheduler tick per Bevy update and copies the resulting state
//! onto the ball and glove entities.

use bevy::log::debug;
use bevy::prelude::*;

use crate::catch3d::scheduler::{AnchorProvider, FrameReport, FrameScheduler, GameState, RenderSurface};
use crate::catch3d::scoring::ScoreNotification;
use crate::catch3d::types::{BallVisual, GloveVisual, ObjectId};

#[derive(Clone, Copy, Debug)]
struct BallSnapshot {
    id: ObjectId,
    position: Vec3,
    visible: bool,
}

#[derive(Clone, Copy, Debug)]
struct GloveSnapshot {
    position: Vec3,
    rotation: Quat,
    visible: bool,
}

/// Render surface that records what the scene should show this frame.
#[derive(Default)]
pub struct SceneSnapshot {
    balls: Vec<BallSnapshot>,
    glove: Option<GloveSnapshot>,
}

impl RenderSurface for SceneSnapshot {
    fn render(&mut self, state: &GameState) {
        self.balls.clear();
        self.balls.extend(state.pool().iter().map(|o| BallSnapshot {
            id: o.id,
            position: o.position,
            visible: o.visible,
        }));

        let target = state.target();
        self.glove = Some(GloveSnapshot {
            position: target.world_position(),
            rotation: target.world_rotation(),
            visible: target.is_present(),
        });
    }
}

/// Running record of ticks, kept for the HUD and the headless summary.
#[derive(Resource, Default)]
pub struct FrameLog {
    pub last: Option<FrameReport>,
    pub catches: Vec<(u64, ScoreNotification)>,
    pub contact_reports: usize,
}

/// Radians each ball turns about x and y per frame.
const BALL_SPIN_PER_FRAME: f64 = 0.01;

fn ball_spin(frame: u64) -> Quat {
    let angle = (frame as f64 * BALL_SPIN_PER_FRAME).rem_euclid(std::f64::consts::TAU) as f32;
    Quat::from_euler(EulerRot::XYZ, angle, angle, 0.0)
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Ticks the scheduler with anchor source `A` and syncs the scene.
pub fn run_frame<A: AnchorProvider + Resource>(
    time: Res<Time>,
    anchor: Res<A>,
    mut scheduler: ResMut<FrameScheduler>,
    mut log: ResMut<FrameLog>,
    mut snapshot: Local<SceneSnapshot>,
    mut balls: Query<(&BallVisual, &mut Transform, &mut Visibility), Without<GloveVisual>>,
    mut gloves: Query<(&GloveVisual, &mut Transform, &mut Visibility), Without<BallVisual>>,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    let report = scheduler.tick(now_ms, &*anchor, &mut *snapshot);

    log.contact_reports += report.contacts.len();
    for notification in &report.notifications {
        log.catches.push((report.frame, *notification));
    }
    if report.expired > 0 {
        debug!("Frame {}: {} notification(s) expired", report.frame, report.expired);
    }
    let spin = ball_spin(report.frame);
    log.last = Some(report);

    for (ball, mut transform, mut vis) in balls.iter_mut() {
        let Some(state) = snapshot.balls.get(ball.id.0) else {
            continue;
        };
        transform.translation = state.position;
        transform.rotation = spin;
        *vis = visibility(state.visible);
    }

    if let Some(glove) = snapshot.glove {
        for (visual, mut transform, mut vis) in gloves.iter_mut() {
            transform.translation = glove.position;
            transform.rotation = glove.rotation;
            transform.scale = Vec3::splat(visual.scale);
            *vis = visibility(glove.visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_spin_advances_each_frame() {
        assert_eq!(ball_spin(0), Quat::IDENTITY);
        let expected = Quat::from_euler(EulerRot::XYZ, 0.5, 0.5, 0.0);
        assert!(ball_spin(50).angle_between(expected) < 1e-4);
        assert!(ball_spin(51).angle_between(ball_spin(50)) > 0.0);
    }
}

//! HUD text: score, status line, and the transient catch popup.

use bevy::prelude::*;

use crate::catch3d::scheduler::FrameScheduler;
use crate::catch3d::throw_control::SimulatedAnchor;
use crate::catch3d::types::{HudText, MainCamera, TargetReadiness};

/// Viewport position as a fraction of the viewport size.
fn normalized(screen: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some((screen / viewport).clamp(Vec2::ZERO, Vec2::ONE))
}

fn status_line(scheduler: &FrameScheduler, anchor: &SimulatedAnchor) -> String {
    let state = scheduler.state();
    let glove = match state.target().readiness() {
        TargetReadiness::Loading => "glove loading".to_string(),
        TargetReadiness::Ready if anchor.tracking => "glove tracked".to_string(),
        TargetReadiness::Ready => "glove out of view".to_string(),
        TargetReadiness::Failed(reason) => format!("glove unavailable ({reason})"),
    };
    format!(
        "{glove} | {} in flight | click or Space to throw, H to toggle tracking",
        state.throws().in_flight()
    )
}

/// Catch popups open over the glove's on-screen position.
pub fn place_popup_at_glove(
    mut scheduler: ResMut<FrameScheduler>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let target = scheduler.state().target();
    if !target.is_present() {
        return;
    }
    let glove = target.world_position();

    let Some(viewport) = camera.logical_viewport_size() else {
        return;
    };
    let Ok(screen) = camera.world_to_viewport(camera_transform, glove) else {
        return;
    };
    if let Some(anchor) = normalized(screen, viewport) {
        scheduler.state_mut().set_popup_anchor(anchor);
    }
}

pub fn update_hud(
    scheduler: Res<FrameScheduler>,
    anchor: Res<SimulatedAnchor>,
    mut texts: Query<(&HudText, &mut Text)>,
    mut popups: Query<(&HudText, &mut Node, &mut Visibility)>,
) {
    let state = scheduler.state();
    let latest = state.scoreboard().notifications().last();

    for (kind, mut text) in texts.iter_mut() {
        text.0 = match kind {
            HudText::Score => format!("Score: {}", state.score()),
            HudText::Status => status_line(&scheduler, &anchor),
            HudText::Notification => latest.map(|n| n.text()).unwrap_or_default(),
        };
    }

    for (kind, mut node, mut visibility) in popups.iter_mut() {
        if *kind != HudText::Notification {
            continue;
        }
        match latest {
            Some(notification) => {
                node.left = Val::Percent(notification.screen_anchor.x * 100.0);
                node.top = Val::Percent(notification.screen_anchor.y * 100.0);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

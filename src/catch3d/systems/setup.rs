//! Scene setup system
//!
//! This module spawns the camera, light, balls, glove and HUD, and watches
//! the glove model until it finishes loading.

use bevy::asset::LoadState;
use bevy::log::info;
use bevy::prelude::*;

use crate::catch3d::scheduler::FrameScheduler;
use crate::catch3d::types::*;

/// Ball colours, indexed by `visual_index`.
const BALL_COLORS: [Color; 3] = [
    Color::srgb(0.95, 0.95, 0.9),
    Color::srgb(0.95, 0.75, 0.2),
    Color::srgb(0.3, 0.6, 0.95),
];

/// Main setup system - initializes the 3D scene
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    mut scheduler: ResMut<FrameScheduler>,
) {
    // Camera at the viewer's eye, looking down at the ball row
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 0.0).looking_at(Vec3::new(0.0, -0.5, -3.0), Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, 2.0).looking_at(Vec3::new(0.0, 0.0, -3.0), Vec3::Y),
    ));

    let state = scheduler.state();
    let ball_materials: Vec<_> = BALL_COLORS
        .iter()
        .map(|color| {
            materials.add(StandardMaterial {
                base_color: *color,
                perceptual_roughness: 0.6,
                ..default()
            })
        })
        .collect();

    for object in state.pool().iter() {
        let material = ball_materials[object.visual_index % ball_materials.len()].clone();
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(object.radius))),
            MeshMaterial3d(material),
            Transform::from_translation(object.position),
            BallVisual { id: object.id },
        ));
    }

    // Glove: the configured model, or a box matching the collider
    let settings = state.config().target.clone();
    let glove_asset = match &settings.model_path {
        Some(path) => {
            info!("Loading glove model from {path}");
            let handle = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()));
            commands.spawn((
                SceneRoot(handle.clone()),
                Transform::from_scale(Vec3::splat(settings.scale)),
                Visibility::Hidden,
                GloveVisual {
                    scale: settings.scale,
                },
            ));
            GloveAsset {
                handle: Some(handle),
            }
        }
        None => {
            let size = Vec3::from_array(settings.half_extents).abs() * 2.0;
            commands.spawn((
                Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(0.55, 0.3, 0.15),
                    perceptual_roughness: 0.9,
                    ..default()
                })),
                Transform::default(),
                Visibility::Hidden,
                GloveVisual { scale: 1.0 },
            ));
            GloveAsset::default()
        }
    };
    let builtin_glove = glove_asset.handle.is_none();
    commands.insert_resource(glove_asset);

    spawn_hud(&mut commands);

    if builtin_glove {
        info!("Using built-in glove");
        scheduler.state_mut().target_loaded(Ok(()));
    }
}

fn spawn_hud(commands: &mut Commands) {
    commands.spawn((
        Text::new("Score: 0"),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText::Score,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.75)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(48.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText::Status,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 36.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.85, 0.2)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            ..default()
        },
        Visibility::Hidden,
        HudText::Notification,
    ));
}

/// Reports the glove model's load result to the game once.
pub fn poll_glove_asset(
    asset_server: Res<AssetServer>,
    glove: Res<GloveAsset>,
    mut scheduler: ResMut<FrameScheduler>,
) {
    let Some(handle) = &glove.handle else {
        return;
    };
    if *scheduler.state().target().readiness() != TargetReadiness::Loading {
        return;
    }

    match asset_server.load_state(handle.id()) {
        LoadState::Loaded => scheduler.state_mut().target_loaded(Ok(())),
        LoadState::Failed(err) => scheduler.state_mut().target_loaded(Err(err.to_string())),
        _ => {}
    }
}

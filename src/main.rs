use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
#[cfg(feature = "rapier")]
use bevy::log::info;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use colored::Colorize;

use glovecatch::catch3d::{
    advance_scripted_anchor, finish_headless_run, handle_throw_input, place_popup_at_glove,
    poll_glove_asset, run_frame, scripted_throws, setup_scene, toggle_anchor_tracking, update_anchor_from_mouse,
    update_hud, use_builtin_glove, ContactBackend, FrameLog, FrameScheduler, GameConfig, HeadlessRun,
    ScriptedAnchor, SimulatedAnchor,
};

const LOG_FILTER: &str = "info,wgpu=error,naga=warn,glovecatch=debug";

/// Glove Catch - catch thrown balls with an anchored glove
#[derive(Parser)]
#[command(name = "glovecatch")]
#[command(
    author,
    version,
    about = "Glove Catch - catch thrown balls with a tracked glove, in 3D or headless"
)]
struct Cli {
    /// Run the simulation without a window and print a summary
    #[arg(long)]
    headless: bool,

    /// Path to a game config JSON file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write the effective config to this path and exit
    #[arg(long = "write-config")]
    write_config: Option<PathBuf>,

    /// Override the throw jitter seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Simulated frame length in headless mode (milliseconds)
    #[arg(long = "frame-ms", default_value_t = 16.0)]
    frame_ms: f64,

    /// Throw a ball every N frames in headless mode (0 disables)
    #[arg(long = "throw-every", default_value_t = 45)]
    throw_every: u64,
}

fn main() {
    let cli = Cli::parse();

    let (mut config, load_error) = GameConfig::load_or_default(cli.config.as_deref());
    if let Some(e) = load_error {
        eprintln!("{} {e}; using default config", "Warning:".yellow().bold());
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    if let Some(path) = &cli.write_config {
        match config.save_to_file(path) {
            Ok(()) => println!("{} {}", "Wrote config:".green().bold(), path.display()),
            Err(e) => {
                eprintln!("{} {e}", "Error:".red().bold());
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.headless {
        run_headless_mode(&cli, config);
    } else {
        run_3d_mode(config);
    }
}

fn log_plugin() -> LogPlugin {
    LogPlugin {
        level: bevy::log::Level::INFO,
        filter: LOG_FILTER.to_string(),
        ..default()
    }
}

fn run_3d_mode(mut config: GameConfig) {
    if config.collision.backend == ContactBackend::External && !cfg!(feature = "rapier") {
        eprintln!(
            "{} sensor contacts need the `rapier` feature; using bounds contacts",
            "Warning:".yellow().bold()
        );
        config.collision.backend = ContactBackend::Bounds;
    }
    let use_sensors = config.collision.backend == ContactBackend::External;

    let anchor = SimulatedAnchor::from_config(&config);

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Glove Catch".to_string(),
                    resolution: (1280u32, 720u32).into(),
                    ..default()
                }),
                ..default()
            })
            .set(log_plugin()),
    )
    .insert_resource(FrameScheduler::new(config))
    .insert_resource(anchor)
    .insert_resource(FrameLog::default())
    .add_systems(Startup, setup_scene)
    .add_systems(
        Update,
        (
            update_anchor_from_mouse,
            toggle_anchor_tracking,
            handle_throw_input,
            poll_glove_asset,
            place_popup_at_glove,
            run_frame::<SimulatedAnchor>,
            update_hud,
        )
            .chain(),
    );

    if use_sensors {
        add_contact_sensors(&mut app);
    }

    app.run();
}

#[cfg(feature = "rapier")]
fn add_contact_sensors(app: &mut App) {
    info!("Contacts come from rapier sensors");
    glovecatch::catch3d::add_sensor_backend::<SimulatedAnchor>(app);
}

#[cfg(not(feature = "rapier"))]
fn add_contact_sensors(_app: &mut App) {}

fn run_headless_mode(cli: &Cli, mut config: GameConfig) {
    // No scene entities exist headless, so sensor contacts can never fire.
    if config.collision.backend == ContactBackend::External {
        config.collision.backend = ContactBackend::Bounds;
    }

    let frame_ms = cli.frame_ms.max(0.0);
    let anchor = ScriptedAnchor::from_config(&config);
    let scheduler = FrameScheduler::new(config);

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        .add_plugins(log_plugin())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            frame_ms / 1000.0,
        )))
        .insert_resource(scheduler)
        .insert_resource(anchor)
        .insert_resource(FrameLog::default())
        .insert_resource(HeadlessRun::new(cli.frames, cli.throw_every, frame_ms))
        .add_systems(Startup, use_builtin_glove)
        .add_systems(
            Update,
            (
                advance_scripted_anchor,
                scripted_throws,
                run_frame::<ScriptedAnchor>,
                finish_headless_run,
            )
                .chain(),
        )
        .run();
}

//! Headless simulation runner
//!
//! Drives the same frame loop without a window: the glove sweeps back and
//! forth under the ball row, balls are thrown on a fixed cadence, and a
//! summary is printed when the frame budget runs out.

use bevy::app::AppExit;
use bevy::log::info;
use bevy::prelude::*;
use colored::Colorize;

use super::frame::FrameLog;
use crate::catch3d::scheduler::{AnchorProvider, FrameScheduler};
use crate::catch3d::types::{AnchorPose, GameConfig};

/// Scripted anchor: the glove moves along x on a sine wave.
#[derive(Resource, Clone, Debug)]
pub struct ScriptedAnchor {
    pub center: Vec3,
    pub amplitude: f32,
    pub period_ms: f64,
    pub glove_offset: Vec3,
    pose: AnchorPose,
}

impl ScriptedAnchor {
    /// Sweeps the glove across the whole ball row, just below it.
    pub fn from_config(config: &GameConfig) -> Self {
        let origin = Vec3::from_array(config.pool.origin);
        let spacing = Vec3::from_array(config.pool.spacing);
        let span = spacing * config.pool.size.saturating_sub(1) as f32;
        let glove_offset = Vec3::from_array(config.target.offset);
        let center = Vec3::new(origin.x + span.x * 0.5, origin.y - 2.0, origin.z + span.z * 0.5);

        let mut anchor = Self {
            center,
            amplitude: span.x.abs() * 0.5,
            period_ms: 4000.0,
            glove_offset,
            pose: AnchorPose::hidden(),
        };
        anchor.advance(0.0);
        anchor
    }

    pub fn glove_at(&self, sim_ms: f64) -> Vec3 {
        let phase = if self.period_ms > 0.0 {
            (sim_ms / self.period_ms * std::f64::consts::TAU) as f32
        } else {
            0.0
        };
        self.center + Vec3::X * self.amplitude * phase.sin()
    }

    pub fn advance(&mut self, sim_ms: f64) {
        self.pose = AnchorPose::at(self.glove_at(sim_ms) - self.glove_offset);
    }
}

impl AnchorProvider for ScriptedAnchor {
    fn anchor_pose(&self) -> AnchorPose {
        self.pose
    }
}

#[derive(Resource, Clone, Debug)]
pub struct HeadlessRun {
    pub frames: u64,
    /// Throw the next resting ball every this many frames (0 disables).
    pub throw_every: u64,
    pub frame_ms: f64,
    throws: u64,
}

impl HeadlessRun {
    pub fn new(frames: u64, throw_every: u64, frame_ms: f64) -> Self {
        Self {
            frames,
            throw_every,
            frame_ms,
            throws: 0,
        }
    }

    pub fn throws(&self) -> u64 {
        self.throws
    }
}

/// Headless runs have no glove model; the built-in box is ready at once.
pub fn use_builtin_glove(mut scheduler: ResMut<FrameScheduler>) {
    info!("Headless run uses the built-in glove");
    scheduler.state_mut().target_loaded(Ok(()));
}

/// Moves the glove to where it is at the simulation time of this frame's tick.
pub fn advance_scripted_anchor(
    time: Res<Time>,
    scheduler: Res<FrameScheduler>,
    mut anchor: ResMut<ScriptedAnchor>,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    anchor.advance(scheduler.sim_ms_at(now_ms));
}

pub fn scripted_throws(mut run: ResMut<HeadlessRun>, mut scheduler: ResMut<FrameScheduler>) {
    if run.throw_every == 0 {
        return;
    }
    let frame = scheduler.state().frame();
    if frame % run.throw_every != 0 {
        return;
    }
    if let Some(id) = scheduler.state().next_throwable() {
        if scheduler.throw_object(id, None).is_some() {
            run.throws += 1;
        }
    }
}

/// Prints the run summary and exits once the frame budget is spent.
pub fn finish_headless_run(
    run: Res<HeadlessRun>,
    scheduler: Res<FrameScheduler>,
    log: Res<FrameLog>,
    mut exit: MessageWriter<AppExit>,
) {
    let state = scheduler.state();
    if state.frame() < run.frames {
        return;
    }

    info!(
        "Headless run finished after {} frames ({:.0} ms simulated)",
        state.frame(),
        state.sim_ms()
    );

    println!("{}", "Glove Catch - headless run".bold().white());
    println!(
        "{} {} frames of {} ms, seed {}",
        "Ran:".bold().white(),
        state.frame(),
        run.frame_ms,
        state.config().seed
    );
    println!("{} {}", "Throws:".bold().white(), run.throws());
    for (frame, catch) in &log.catches {
        println!(
            "  {} {} at frame {} ({:.0} ms)",
            "Caught".green(),
            catch.object,
            frame,
            catch.issued_at_ms
        );
    }
    let score = format!("{}", state.score());
    let score = if state.score() > 0 {
        score.bright_green().bold()
    } else {
        score.yellow().bold()
    };
    println!("{} {} / {}", "Score:".bold().white(), score, state.pool().len());

    exit.write(AppExit::Success);
}

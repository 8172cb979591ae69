//! Frame Scheduler
//!
//! Owns the whole game state and advances it once per frame in a fixed
//! order: tweens, anchor, bounds, contacts and scoring, render. Input is
//! applied between ticks and takes effect on the following pass.

use bevy::log::{debug, info, warn};
use bevy::prelude::*;

use crate::catch3d::bounds::{BoundingVolumeTracker, Ray};
use crate::catch3d::collision::{self, ContactReport};
use crate::catch3d::scoring::{ScoreBoard, ScoreNotification};
use crate::catch3d::throw_control::{ThrowController, ThrowOrder};
use crate::catch3d::tween::TweenEngine;
use crate::catch3d::types::{
    AnchorPose, ContactBackend, GameConfig, ObjectId, ObjectPool, Spatial, Target,
};

/// Source of the tracked anchor pose, polled once per tick.
pub trait AnchorProvider {
    fn anchor_pose(&self) -> AnchorPose;
}

impl AnchorProvider for AnchorPose {
    fn anchor_pose(&self) -> AnchorPose {
        *self
    }
}

/// Called once per tick after the simulation step.
pub trait RenderSurface {
    fn render(&mut self, state: &GameState);
}

/// Discards every frame.
pub struct NullRender;

impl RenderSurface for NullRender {
    fn render(&mut self, _state: &GameState) {}
}

/// Everything that changes while the game runs.
pub struct GameState {
    config: GameConfig,
    pool: ObjectPool,
    target: Target,
    tweens: TweenEngine<Vec3>,
    throws: ThrowController,
    bounds: BoundingVolumeTracker,
    scoreboard: ScoreBoard,
    external_contacts: Vec<ObjectId>,
    sim_ms: f64,
    frame: u64,
}

impl GameState {
    /// The target starts `Loading`; callers report the glove asset through
    /// [`GameState::target_loaded`].
    pub fn new(config: GameConfig) -> Self {
        let config = config.sanitized();
        let pool = ObjectPool::from_settings(&config.pool);
        let throws = ThrowController::new(config.throw.clone(), pool.len(), config.seed);
        let scoreboard = ScoreBoard::new(pool.len(), &config.scoring);

        info!(
            "Game state ready: {} balls, seed {}, contacts via {:?}",
            pool.len(),
            config.seed,
            config.collision.backend
        );

        Self {
            target: Target::new(&config.target),
            tweens: TweenEngine::new(),
            bounds: BoundingVolumeTracker::new(config.collision.margin),
            external_contacts: Vec::new(),
            sim_ms: 0.0,
            frame: 0,
            pool,
            throws,
            scoreboard,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn tweens(&self) -> &TweenEngine<Vec3> {
        &self.tweens
    }

    pub fn throws(&self) -> &ThrowController {
        &self.throws
    }

    pub fn bounds(&self) -> &BoundingVolumeTracker {
        &self.bounds
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    /// Where the next catch popup goes (normalized viewport coordinates).
    pub fn set_popup_anchor(&mut self, anchor: Vec2) {
        self.scoreboard.set_screen_anchor(anchor);
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn sim_ms(&self) -> f64 {
        self.sim_ms
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Resolves the glove asset load. Only the first call has an effect.
    pub fn target_loaded(&mut self, result: Result<(), String>) {
        let changed = match result {
            Ok(()) => self.target.mark_ready(),
            Err(reason) => self.target.mark_failed(reason),
        };
        if !changed {
            debug!("Ignoring repeated glove load result");
        }
    }

    /// Throws a ball. Unknown and already scored balls are dropped.
    pub fn throw_object(&mut self, id: ObjectId, origin: Option<Vec3>) -> Option<ThrowOrder> {
        if !self.pool.contains(id) {
            warn!("Ignoring throw for {id}: not part of the pool");
            return None;
        }
        if !self.scoreboard.is_active(id) {
            debug!("Ignoring throw for {id}: already scored");
            return None;
        }
        self.throws
            .throw(id, origin, &mut self.pool, &self.target, &mut self.tweens)
    }

    /// First visible, unscored ball that is not in flight.
    pub fn next_throwable(&self) -> Option<ObjectId> {
        self.pool
            .iter()
            .filter(|o| o.visible && self.scoreboard.is_active(o.id))
            .find(|o| self.throws.phase(o.id).is_some_and(|p| p.is_idle()))
            .map(|o| o.id)
    }

    /// Queues a contact from an outside source (physics sensors). The queue
    /// is drained every tick and only scored with the `External` backend.
    /// Returns false for ids outside the pool.
    pub fn report_external_contact(&mut self, id: ObjectId) -> bool {
        if !self.pool.contains(id) {
            warn!("Ignoring external contact for {id}: not part of the pool");
            return false;
        }
        if !self.external_contacts.contains(&id) {
            self.external_contacts.push(id);
        }
        true
    }

    pub fn queued_external_contacts(&self) -> &[ObjectId] {
        &self.external_contacts
    }

    /// Nearest visible, unscored ball hit by `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<ObjectId> {
        let margin = self.bounds.margin();
        self.pool
            .iter()
            .filter(|o| o.visible && self.scoreboard.is_active(o.id))
            .filter_map(|o| {
                let volume = o.bounding_volume()?.expanded(margin);
                ray.intersect_aabb(&volume).map(|t| (o.id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn step(&mut self, anchor: AnchorPose) -> (Vec<ContactReport>, Vec<ScoreNotification>, usize) {
        self.frame += 1;

        let events = self.tweens.update(self.sim_ms);
        self.throws
            .apply_events(&events, &mut self.pool, &mut self.tweens);

        self.target.apply_anchor(anchor);
        if anchor.visible {
            for object in self.pool.iter_mut() {
                if let Some(offset) = object.attachment {
                    object.position = self.target.to_world(offset);
                }
            }
        }

        self.bounds.refresh(&self.pool, &self.target);

        let contacts = self.collect_contacts();
        let issued = self
            .scoreboard
            .apply(&contacts, self.sim_ms, &mut self.pool, &self.target);
        for notification in &issued {
            self.throws
                .settle(notification.object, &mut self.pool, &mut self.tweens);
        }
        let expired = self.scoreboard.expire(self.sim_ms);

        (contacts, issued, expired)
    }

    fn collect_contacts(&mut self) -> Vec<ContactReport> {
        let scoreboard = &self.scoreboard;
        let queued = std::mem::take(&mut self.external_contacts);
        match self.config.collision.backend {
            ContactBackend::Bounds => collision::detect(
                self.bounds.target(),
                self.bounds.objects(),
                &self.pool,
                |id| scoreboard.is_active(id),
            ),
            ContactBackend::External => {
                if !self.target.is_present() {
                    return Vec::new();
                }
                queued
                    .into_iter()
                    .filter(|id| {
                        self.pool.get(*id).is_some_and(|o| o.visible) && scoreboard.is_active(*id)
                    })
                    .map(|object| ContactReport {
                        object,
                        contact: true,
                    })
                    .collect()
            }
        }
    }
}

/// What one tick did.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub sim_time_ms: f64,
    /// Simulated time this tick advanced by, after clamping.
    pub delta_ms: f64,
    pub contacts: Vec<ContactReport>,
    pub notifications: Vec<ScoreNotification>,
    pub expired: usize,
}

#[derive(Resource)]
pub struct FrameScheduler {
    state: GameState,
    last_frame_ms: Option<f64>,
}

impl FrameScheduler {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: GameState::new(config),
            last_frame_ms: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn delta_for(&self, now_ms: f64) -> f64 {
        let max_delta = self.state.config.frame.max_frame_delta_ms;
        match self.last_frame_ms {
            None => 0.0,
            Some(last) => (now_ms - last).clamp(0.0, max_delta),
        }
    }

    /// Simulation time a tick at wall time `now_ms` would run at.
    pub fn sim_ms_at(&self, now_ms: f64) -> f64 {
        self.state.sim_ms + self.delta_for(now_ms)
    }

    /// Runs one frame at wall time `now_ms`. The first call only sets the
    /// time base; later calls advance by at most `max_frame_delta_ms`.
    pub fn tick(
        &mut self,
        now_ms: f64,
        anchor: &impl AnchorProvider,
        render: &mut impl RenderSurface,
    ) -> FrameReport {
        let delta_ms = self.delta_for(now_ms);
        if let Some(last) = self.last_frame_ms {
            if now_ms - last > delta_ms {
                debug!("Frame delta {:.1} ms clamped to {delta_ms} ms", now_ms - last);
            }
        }
        self.last_frame_ms = Some(now_ms);
        self.state.sim_ms += delta_ms;

        let (contacts, notifications, expired) = self.state.step(anchor.anchor_pose());
        render.render(&self.state);

        FrameReport {
            frame: self.state.frame,
            sim_time_ms: self.state.sim_ms,
            delta_ms,
            contacts,
            notifications,
            expired,
        }
    }

    pub fn pick(&self, ray: &Ray) -> Option<ObjectId> {
        self.state.pick(ray)
    }

    pub fn throw_object(&mut self, id: ObjectId, origin: Option<Vec3>) -> Option<ThrowOrder> {
        self.state.throw_object(id, origin)
    }

    /// Picks with `ray` and throws the hit ball, if any.
    pub fn throw_selected(&mut self, ray: &Ray) -> Option<ThrowOrder> {
        let id = self.state.pick(ray)?;
        self.state.throw_object(id, None)
    }
}

//! Throw Controller
//!
//! Plans trajectories and drives one tween per thrown ball. The bounce is
//! chained by reacting to the fall tween's completion event on the next
//! engine pass, never from inside the engine.

use bevy::log::{debug, warn};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::state::*;
use crate::catch3d::tween::{TweenEngine, TweenEvent, TweenHandle};
use crate::catch3d::types::{ObjectId, ObjectPool, Spatial, Target, ThrowSettings};

pub struct ThrowController {
    settings: ThrowSettings,
    phases: Vec<FlightPhase>,
    rng: StdRng,
}

impl ThrowController {
    pub fn new(settings: ThrowSettings, pool_len: usize, seed: u64) -> Self {
        Self {
            settings,
            phases: vec![FlightPhase::Idle; pool_len],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn phase(&self, id: ObjectId) -> Option<&FlightPhase> {
        self.phases.get(id.0)
    }

    pub fn in_flight(&self) -> usize {
        self.phases.iter().filter(|p| !p.is_idle()).count()
    }

    /// Landing point: x/z jittered around `from`, y just below the glove.
    pub fn plan(&mut self, from: Vec3, target: &Target) -> ThrowOrder {
        let jitter = self.settings.jitter.abs();
        let dx = self.rng.gen_range(-jitter..=jitter);
        let dz = self.rng.gen_range(-jitter..=jitter);

        let target_y = if target.is_present() {
            target.position().y
        } else {
            self.settings.fallback_target_y
        };

        let landing = Vec3::new(
            from.x + dx,
            target_y - self.settings.landing_offset,
            from.z + dz,
        );

        ThrowOrder {
            origin: from,
            landing,
            apex: landing + Vec3::Y * self.settings.bounce_height,
            fall_duration_ms: self.settings.fall_duration_ms,
            fall_easing: FALL_EASING,
            bounce_easing: BOUNCE_EASING,
        }
    }

    /// Starts (or restarts) a throw. Any tween still driving the ball is
    /// cancelled before the new one is started, so a superseded throw can
    /// never report back.
    pub fn throw(
        &mut self,
        id: ObjectId,
        origin_override: Option<Vec3>,
        pool: &mut ObjectPool,
        target: &Target,
        tweens: &mut TweenEngine<Vec3>,
    ) -> Option<ThrowOrder> {
        let Some(current) = pool.get(id).map(|o| o.position) else {
            warn!("Ignoring throw for {id}: not part of the pool");
            return None;
        };
        if self.phases.len() < pool.len() {
            self.phases.resize(pool.len(), FlightPhase::Idle);
        }

        if let Some(previous) = self.phases[id.0].tween() {
            tweens.cancel(previous);
            debug!("Re-throw of {id} replaces tween {previous:?}");
        }

        let from = origin_override.unwrap_or(current);
        let order = self.plan(from, target);
        let tween = tweens.start(from, order.landing, order.fall_duration_ms, order.fall_easing);
        self.phases[id.0] = FlightPhase::Falling { tween, order };

        if let Some(object) = pool.get_mut(id) {
            object.position = from;
            object.thrown = true;
        }

        debug!(
            "Thrown {id}: {:?} -> {:?} over {} ms",
            order.origin, order.landing, order.fall_duration_ms
        );
        Some(order)
    }

    /// Stops a ball where it is. Used when a ball leaves play.
    pub fn settle(&mut self, id: ObjectId, pool: &mut ObjectPool, tweens: &mut TweenEngine<Vec3>) {
        let Some(phase) = self.phases.get_mut(id.0) else {
            return;
        };
        if let Some(tween) = phase.tween() {
            tweens.cancel(tween);
        }
        *phase = FlightPhase::Idle;
        if let Some(object) = pool.get_mut(id) {
            object.thrown = false;
        }
    }

    fn owner_of(&self, handle: TweenHandle) -> Option<ObjectId> {
        self.phases
            .iter()
            .position(|p| p.tween() == Some(handle))
            .map(ObjectId)
    }

    /// Applies one engine pass: moves balls and advances their phases.
    /// Events from tweens this controller no longer owns are ignored.
    pub fn apply_events(
        &mut self,
        events: &[TweenEvent<Vec3>],
        pool: &mut ObjectPool,
        tweens: &mut TweenEngine<Vec3>,
    ) {
        for event in events {
            let Some(id) = self.owner_of(event.handle()) else {
                continue;
            };

            match *event {
                TweenEvent::Updated { value, .. } => {
                    if let Some(object) = pool.get_mut(id) {
                        object.position = value;
                    }
                }
                TweenEvent::Completed { value, .. } => {
                    if let Some(object) = pool.get_mut(id) {
                        object.position = value;
                    }
                    self.advance_phase(id, pool, tweens);
                }
            }
        }
    }

    fn advance_phase(&mut self, id: ObjectId, pool: &mut ObjectPool, tweens: &mut TweenEngine<Vec3>) {
        match self.phases[id.0] {
            FlightPhase::Falling { order, .. } => {
                let tween = tweens.start(
                    order.landing,
                    order.apex,
                    order.bounce_duration_ms(),
                    order.bounce_easing,
                );
                self.phases[id.0] = FlightPhase::Bouncing { tween, order };
                debug!("{id} landed at {:?}; bouncing", order.landing);
            }
            FlightPhase::Bouncing { order, .. } => {
                self.phases[id.0] = FlightPhase::Idle;
                if let Some(object) = pool.get_mut(id) {
                    object.thrown = false;
                }
                debug!("{id} came to rest at {:?}", order.apex);
            }
            FlightPhase::Idle => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catch3d::types::{AnchorPose, TargetSettings};

    fn settings() -> ThrowSettings {
        ThrowSettings {
            fall_duration_ms: 1000.0,
            jitter: 0.5,
            landing_offset: 0.2,
            bounce_height: 0.4,
            fallback_target_y: -3.0,
        }
    }

    fn ready_target(at: Vec3) -> Target {
        let mut target = Target::new(&TargetSettings {
            offset: [0.0, 0.0, 0.0],
            rotation_euler: [0.0, 0.0, 0.0],
            ..Default::default()
        });
        target.mark_ready();
        target.apply_anchor(AnchorPose::at(at));
        target
    }

    #[test]
    fn test_plan_jitter_stays_in_range() {
        let mut controller = ThrowController::new(settings(), 1, 7);
        let target = ready_target(Vec3::new(0.0, -1.0, 0.0));
        let from = Vec3::new(1.0, 2.0, 3.0);

        for _ in 0..200 {
            let order = controller.plan(from, &target);
            assert!((order.landing.x - from.x).abs() <= 0.5);
            assert!((order.landing.z - from.z).abs() <= 0.5);
            assert!((order.landing.y - (-1.2)).abs() < 1e-5);
            assert!((order.apex.y - order.landing.y - 0.4).abs() < 1e-5);
            assert_eq!(order.bounce_duration_ms(), 500.0);
        }
    }

    #[test]
    fn test_plan_uses_fallback_height_without_target() {
        let mut controller = ThrowController::new(settings(), 1, 7);
        let target = Target::new(&TargetSettings::default());
        let order = controller.plan(Vec3::ZERO, &target);
        assert!((order.landing.y - (-3.2)).abs() < 1e-5);
    }

    #[test]
    fn test_same_seed_same_plan() {
        let target = ready_target(Vec3::ZERO);
        let mut a = ThrowController::new(settings(), 1, 99);
        let mut b = ThrowController::new(settings(), 1, 99);
        assert_eq!(a.plan(Vec3::ONE, &target).landing, b.plan(Vec3::ONE, &target).landing);
    }

    #[test]
    fn test_throw_unknown_object_is_ignored() {
        let mut controller = ThrowController::new(settings(), 1, 1);
        let mut pool = ObjectPool::with_positions([Vec3::ZERO], 0.1);
        let mut tweens = TweenEngine::new();
        let target = ready_target(Vec3::ZERO);

        assert!(controller
            .throw(ObjectId(5), None, &mut pool, &target, &mut tweens)
            .is_none());
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_fall_then_bounce_then_idle() {
        let mut controller = ThrowController::new(settings(), 1, 3);
        let mut pool = ObjectPool::with_positions([Vec3::new(0.0, 1.0, 0.0)], 0.1);
        let mut tweens = TweenEngine::new();
        let target = ready_target(Vec3::new(0.0, -1.0, 0.0));
        let id = ObjectId(0);

        let order = controller
            .throw(id, None, &mut pool, &target, &mut tweens)
            .expect("ball is in the pool");
        assert!(pool.get(id).is_some_and(|o| o.thrown));

        let events = tweens.update(1000.0);
        controller.apply_events(&events, &mut pool, &mut tweens);
        assert!(controller.phase(id).is_some_and(|p| p.is_bouncing()));
        assert_eq!(pool.get(id).map(|o| o.position), Some(order.landing));

        let events = tweens.update(1500.0);
        controller.apply_events(&events, &mut pool, &mut tweens);
        assert!(controller.phase(id).is_some_and(|p| p.is_idle()));
        assert_eq!(pool.get(id).map(|o| o.position), Some(order.apex));
        assert!(pool.get(id).is_some_and(|o| !o.thrown));
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_origin_override_moves_ball_first() {
        let mut controller = ThrowController::new(settings(), 1, 3);
        let mut pool = ObjectPool::with_positions([Vec3::ZERO], 0.1);
        let mut tweens = TweenEngine::new();
        let target = ready_target(Vec3::ZERO);
        let start = Vec3::new(4.0, 4.0, 4.0);

        let order = controller
            .throw(ObjectId(0), Some(start), &mut pool, &target, &mut tweens)
            .expect("ball is in the pool");
        assert_eq!(order.origin, start);
        assert_eq!(pool.get(ObjectId(0)).map(|o| o.position), Some(start));
    }

    #[test]
    fn test_settle_cancels_flight() {
        let mut controller = ThrowController::new(settings(), 1, 3);
        let mut pool = ObjectPool::with_positions([Vec3::ZERO], 0.1);
        let mut tweens = TweenEngine::new();
        let target = ready_target(Vec3::ZERO);

        controller.throw(ObjectId(0), None, &mut pool, &target, &mut tweens);
        controller.settle(ObjectId(0), &mut pool, &mut tweens);

        assert!(tweens.is_empty());
        assert_eq!(controller.in_flight(), 0);
        assert!(pool.get(ObjectId(0)).is_some_and(|o| !o.thrown));
    }
}

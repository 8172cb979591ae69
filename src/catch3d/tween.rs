//! Tween engine
//!
//! Time-parameterized interpolation between two values. Tweens are advanced
//! by [`TweenEngine::update`] and report progress as [`TweenEvent`]s rather
//! than through callbacks, so handling a completion (for example starting a
//! follow-up tween) never re-enters the engine mid-pass.

use bevy::prelude::*;

/// Values that can be interpolated per component.
pub trait Interpolate: Copy {
    fn interpolate(self, target: Self, progress: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, target: f32, progress: f32) -> f32 {
        self + (target - self) * progress
    }
}

impl Interpolate for Vec3 {
    fn interpolate(self, target: Vec3, progress: f32) -> Vec3 {
        Vec3::new(
            self.x.interpolate(target.x, progress),
            self.y.interpolate(target.y, progress),
            self.z.interpolate(target.z, progress),
        )
    }
}

/// Maps normalized elapsed time to normalized progress.
#[derive(Clone, Copy, Debug)]
pub enum Easing {
    Linear,
    QuadraticIn,
    /// Decelerates on arrival.
    QuadraticOut,
    QuadraticInOut,
    CubicOut,
    /// Decaying oscillation that settles at the end value.
    BounceOut,
    Custom(fn(f32) -> f32),
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => t * (2.0 - t),
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::BounceOut => bounce_out(t),
            Easing::Custom(f) => f(t),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadraticIn => "quadratic-in",
            Easing::QuadraticOut => "quadratic-out",
            Easing::QuadraticInOut => "quadratic-in-out",
            Easing::CubicOut => "cubic-out",
            Easing::BounceOut => "bounce-out",
            Easing::Custom(_) => "custom",
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Identifies one `start` call. Handles are never reused by an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenEvent<T> {
    /// Interpolated value for this pass.
    Updated { handle: TweenHandle, value: T },
    /// Emitted exactly once, after the final `Updated`, when elapsed >= duration.
    Completed { handle: TweenHandle, value: T },
}

impl<T: Copy> TweenEvent<T> {
    pub fn handle(&self) -> TweenHandle {
        match self {
            TweenEvent::Updated { handle, .. } | TweenEvent::Completed { handle, .. } => *handle,
        }
    }

    pub fn value(&self) -> T {
        match self {
            TweenEvent::Updated { value, .. } | TweenEvent::Completed { value, .. } => *value,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveTween<T> {
    handle: TweenHandle,
    from: T,
    to: T,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl<T: Interpolate> ActiveTween<T> {
    fn sample(&self, now_ms: f64) -> (T, bool) {
        let elapsed = now_ms - self.start_ms;
        if elapsed >= self.duration_ms {
            return (self.to, true);
        }
        if elapsed <= 0.0 {
            return (self.from, false);
        }
        let t = (elapsed / self.duration_ms) as f32;
        (self.from.interpolate(self.to, self.easing.apply(t)), false)
    }
}

/// Runs any number of independent tweens against one clock.
///
/// The clock only moves forward and is set by `update`. A tween started
/// between passes begins at the current clock, so it is first advanced by
/// the following `update`.
#[derive(Clone, Debug)]
pub struct TweenEngine<T> {
    tweens: Vec<ActiveTween<T>>,
    next_handle: u64,
    clock_ms: f64,
}

impl<T> Default for TweenEngine<T> {
    fn default() -> Self {
        Self {
            tweens: Vec::new(),
            next_handle: 0,
            clock_ms: 0.0,
        }
    }
}

impl<T: Interpolate> TweenEngine<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn start(&mut self, from: T, to: T, duration_ms: f64, easing: Easing) -> TweenHandle {
        let handle = TweenHandle(self.next_handle);
        self.next_handle += 1;

        self.tweens.push(ActiveTween {
            handle,
            from,
            to,
            start_ms: self.clock_ms,
            duration_ms: duration_ms.max(0.0),
            easing,
        });

        handle
    }

    /// Removes a tween before it completes. Returns `false` if it already
    /// finished or was never started here.
    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.handle != handle);
        self.tweens.len() != before
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.tweens.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advances every active tween to `now_ms` and returns the resulting
    /// events in start order. Completed tweens are dropped.
    pub fn update(&mut self, now_ms: f64) -> Vec<TweenEvent<T>> {
        if now_ms > self.clock_ms {
            self.clock_ms = now_ms;
        }
        let now = self.clock_ms;

        let mut events = Vec::with_capacity(self.tweens.len() + 1);
        self.tweens.retain(|tween| {
            let (value, done) = tween.sample(now);
            events.push(TweenEvent::Updated {
                handle: tween.handle,
                value,
            });
            if done {
                events.push(TweenEvent::Completed {
                    handle: tween.handle,
                    value,
                });
            }
            !done
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EASINGS: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicOut,
        Easing::BounceOut,
    ];

    #[test]
    fn test_easing_endpoints() {
        for easing in ALL_EASINGS {
            assert_eq!(easing.apply(0.0), 0.0, "{} at 0", easing.name());
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{} at 1", easing.name());
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-2.0), 0.0);
        assert_eq!(Easing::Linear.apply(3.0), 1.0);
    }

    #[test]
    fn test_quadratic_out_decelerates() {
        let early = Easing::QuadraticOut.apply(0.1) - Easing::QuadraticOut.apply(0.0);
        let late = Easing::QuadraticOut.apply(1.0) - Easing::QuadraticOut.apply(0.9);
        assert!(early > late);
    }

    #[test]
    fn test_bounce_out_stays_bounded() {
        for i in 0..=100 {
            let v = Easing::BounceOut.apply(i as f32 / 100.0);
            assert!((0.0..=1.0 + 1e-5).contains(&v));
        }
    }

    #[test]
    fn test_custom_easing() {
        fn half(t: f32) -> f32 {
            t * 0.5
        }
        let mut engine = TweenEngine::new();
        engine.start(0.0_f32, 10.0, 100.0, Easing::Custom(half));
        let events = engine.update(100.0);
        // Completion always lands on the target, whatever the curve says.
        assert_eq!(events.last().map(|e| e.value()), Some(10.0));
    }

    #[test]
    fn test_vec3_interpolates_per_axis() {
        let v = Vec3::ZERO.interpolate(Vec3::new(2.0, -4.0, 8.0), 0.5);
        assert_eq!(v, Vec3::new(1.0, -2.0, 4.0));
    }

    #[test]
    fn test_cancel_unknown_handle() {
        let mut engine = TweenEngine::<f32>::new();
        let h = engine.start(0.0, 1.0, 10.0, Easing::Linear);
        assert!(engine.cancel(h));
        assert!(!engine.cancel(h));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut engine = TweenEngine::<f32>::new();
        engine.update(500.0);
        engine.update(200.0);
        assert_eq!(engine.clock_ms(), 500.0);
    }
}

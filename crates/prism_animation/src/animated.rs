//! Animated value container
//!
//! [`Animated<T>`] holds a single mutable value plus the parameters of an
//! optional in-flight transition (start value, target, start instant,
//! duration, easing). Reads interpolate against the monotonic clock, so the
//! render path always sees the exact intermediate value without any ticking.
//!
//! Retargeting mid-flight starts the new transition from the currently
//! interpolated value, never from the original start or the previous target,
//! so superseded transitions never cause a visual jump.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use prism_core::Color;

use crate::easing::Easing;

/// Values that can be interpolated by an [`Animated`] container
pub trait Animatable: Copy + Send + 'static {
    fn lerp(from: Self, to: Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t.clamp(0.0, 1.0)
    }
}

impl Animatable for Color {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Color::lerp(&from, &to, t)
    }
}

/// Parameters of an in-flight transition
#[derive(Clone, Copy, Debug)]
struct ActiveTransition<T> {
    from: T,
    to: T,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl<T: Animatable> ActiveTransition<T> {
    fn progress_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        if now <= self.started {
            return 0.0;
        }
        let elapsed = now.duration_since(self.started).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn sample(&self, now: Instant) -> T {
        let t = self.progress_at(now);
        T::lerp(self.from, self.to, self.easing.apply(t))
    }

    fn finished_at(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}

#[derive(Debug)]
struct AnimatedState<T> {
    current: T,
    active: Option<ActiveTransition<T>>,
}

impl<T: Animatable> AnimatedState<T> {
    fn sample(&self, now: Instant) -> T {
        match &self.active {
            // Completed transitions read as the exact target, even through
            // read-only handles that never settle the state.
            Some(transition) if transition.finished_at(now) => transition.to,
            Some(transition) => transition.sample(now),
            None => self.current,
        }
    }
}

/// A single interpolatable value with synchronous read access
pub struct Animated<T: Animatable> {
    inner: Arc<Mutex<AnimatedState<T>>>,
}

/// The animated background color owned by the theme engine
pub type AnimatedColor = Animated<Color>;

impl<T: Animatable> Animated<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AnimatedState {
                current: initial,
                active: None,
            })),
        }
    }

    /// Jump to `value` instantly, cancelling any in-flight transition
    pub fn set(&self, value: T) {
        let mut state = self.inner.lock().unwrap();
        state.current = value;
        state.active = None;
    }

    /// Begin a non-blocking transition to `target`
    ///
    /// If a previous transition is still running, the new one starts from the
    /// value currently being displayed.
    pub fn animate_to(&self, target: T, duration: Duration, easing: Easing) {
        self.animate_to_at(target, duration, easing, Instant::now());
    }

    fn animate_to_at(&self, target: T, duration: Duration, easing: Easing, now: Instant) {
        let mut state = self.inner.lock().unwrap();
        let from = state.sample(now);
        state.current = from;
        state.active = Some(ActiveTransition {
            from,
            to: target,
            started: now,
            duration,
            easing,
        });
    }

    /// Read the current value, settling the transition if it has completed
    pub fn get(&self) -> T {
        let now = Instant::now();
        let mut state = self.inner.lock().unwrap();
        if let Some(transition) = state.active {
            if transition.finished_at(now) {
                state.current = transition.to;
                state.active = None;
                return state.current;
            }
            return transition.sample(now);
        }
        state.current
    }

    /// Sample the value at a specific instant without settling
    ///
    /// Useful for externally-timed reads (frame capture, tests).
    pub fn sample_at(&self, now: Instant) -> T {
        self.inner.lock().unwrap().sample(now)
    }

    /// Whether a transition is still running
    pub fn is_animating(&self) -> bool {
        let now = Instant::now();
        let state = self.inner.lock().unwrap();
        state
            .active
            .map(|transition| !transition.finished_at(now))
            .unwrap_or(false)
    }

    /// The value the container is heading towards (or resting at)
    pub fn target(&self) -> T {
        let state = self.inner.lock().unwrap();
        state
            .active
            .map(|transition| transition.to)
            .unwrap_or(state.current)
    }

    /// A read-only handle for consumers
    pub fn reader(&self) -> AnimatedReader<T> {
        AnimatedReader {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only view of an [`Animated`] value
///
/// Consumers interpolate against this during transitions; only the owning
/// engine can write.
pub struct AnimatedReader<T: Animatable> {
    inner: Arc<Mutex<AnimatedState<T>>>,
}

/// Read-only view of the animated background color
pub type AnimatedColorReader = AnimatedReader<Color>;

impl<T: Animatable> AnimatedReader<T> {
    pub fn get(&self) -> T {
        let now = Instant::now();
        self.inner.lock().unwrap().sample(now)
    }

    pub fn sample_at(&self, now: Instant) -> T {
        self.inner.lock().unwrap().sample(now)
    }

    pub fn is_animating(&self) -> bool {
        let now = Instant::now();
        self.inner
            .lock()
            .unwrap()
            .active
            .map(|transition| !transition.finished_at(now))
            .unwrap_or(false)
    }
}

impl<T: Animatable> Clone for AnimatedReader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn set_jumps_instantly() {
        let value = Animated::new(0.0f32);
        value.set(5.0);
        assert_eq!(value.get(), 5.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn linear_transition_interpolates_over_time() {
        let value = Animated::new(0.0f32);
        let t0 = Instant::now();
        value.animate_to_at(10.0, ms(100), Easing::Linear, t0);

        assert_eq!(value.sample_at(t0), 0.0);
        let mid = value.sample_at(t0 + ms(50));
        assert!((mid - 5.0).abs() < 1e-3, "mid was {mid}");
        assert_eq!(value.sample_at(t0 + ms(100)), 10.0);
        assert_eq!(value.sample_at(t0 + ms(500)), 10.0);
    }

    #[test]
    fn read_at_start_instant_yields_start_value() {
        let value = Animated::new(0.0f32);
        let t0 = Instant::now();
        value.animate_to_at(10.0, ms(100), Easing::Linear, t0);

        // The invocation instant reads as the start of the trajectory,
        // not the target.
        assert_eq!(value.sample_at(t0), 0.0);

        // Same at the boundary of a retarget: no jump to the new target.
        let t1 = t0 + ms(50);
        let before = value.sample_at(t1);
        value.animate_to_at(0.0, ms(100), Easing::Linear, t1);
        assert_eq!(value.sample_at(t1), before);
    }

    #[test]
    fn reader_sees_exact_target_after_completion() {
        let value = Animated::new(Color::BLACK);
        let reader = value.reader();
        let t0 = Instant::now();
        let target = Color::rgba(0.1, 0.2, 0.3, 0.55);
        value.animate_to_at(target, ms(100), Easing::EaseOutQuad, t0);

        // Read-only handles never settle the state, but a finished
        // transition still reads as exactly the target.
        assert_eq!(reader.sample_at(t0 + ms(150)), target);
        assert_eq!(value.sample_at(t0 + ms(150)), target);
    }

    #[test]
    fn eased_transition_respects_curve() {
        let value = Animated::new(0.0f32);
        let t0 = Instant::now();
        value.animate_to_at(1.0, ms(100), Easing::EaseOutQuad, t0);

        let mid = value.sample_at(t0 + ms(50));
        let expected = Easing::EaseOutQuad.apply(0.5);
        assert!((mid - expected).abs() < 1e-3, "mid was {mid}");
    }

    #[test]
    fn retarget_starts_from_interpolated_value() {
        let value = Animated::new(0.0f32);
        let t0 = Instant::now();
        value.animate_to_at(10.0, ms(100), Easing::Linear, t0);

        // Halfway through, head back to 0.
        let t1 = t0 + ms(50);
        let before_retarget = value.sample_at(t1);
        value.animate_to_at(0.0, ms(100), Easing::Linear, t1);

        // No jump: the new trajectory starts exactly where the old one was.
        let after_retarget = value.sample_at(t1);
        assert!((after_retarget - before_retarget).abs() < 1e-6);

        // And it lands exactly on the new target, not the superseded one.
        assert_eq!(value.sample_at(t1 + ms(100)), 0.0);
        assert_eq!(value.target(), 0.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let value = Animated::new(0.0f32);
        let t0 = Instant::now();
        value.animate_to_at(3.0, ms(0), Easing::Linear, t0);
        assert_eq!(value.sample_at(t0), 3.0);
    }

    #[test]
    fn get_settles_completed_transition() {
        let value = Animated::new(0.0f32);
        let t0 = Instant::now() - ms(500);
        value.animate_to_at(7.0, ms(100), Easing::Linear, t0);

        assert_eq!(value.get(), 7.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn reader_sees_owner_writes() {
        let value = Animated::new(Color::BLACK);
        let reader = value.reader();
        value.set(Color::WHITE);
        assert_eq!(reader.get(), Color::WHITE);
    }

    #[test]
    fn color_transition_lands_on_target() {
        let value = Animated::new(Color::BLACK);
        let t0 = Instant::now();
        value.animate_to_at(Color::WHITE, ms(100), Easing::EaseOutQuad, t0);
        assert_eq!(value.sample_at(t0 + ms(200)), Color::WHITE);
    }
}

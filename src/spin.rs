//! Spin state machine: picks a random stopping rotation, drives the timed
//! deceleration toward it, and resolves the winner from the final angle.
//!
//! The engine never reads the clock itself. `Instant`s are injected by the
//! event loop, so spins are fully deterministic under test and the
//! completion timer stays a cancellable concern of the caller.

use crate::geometry;
use crate::wheel::MIN_ITEMS;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use thiserror::Error;

/// A spin always runs this long; there is no early stop.
pub const SPIN_DURATION: Duration = Duration::from_secs(8);
pub const MIN_SPINS: f64 = 5.0;
pub const MAX_SPINS: f64 = 8.0;
/// Deceleration curve: travel front-loads into the middle of the spin and
/// brakes over a long tail.
pub const SPIN_EASING: CubicBezier = CubicBezier::new(0.32, 0.06, 0.32, 0.95);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpinError {
    #[error("the wheel is already spinning")]
    AlreadySpinning,
    #[error("a spin needs at least {MIN_ITEMS} options")]
    NotEnoughItems,
}

/// Cubic bezier easing through (0,0), (x1,y1), (x2,y2), (1,1), matching the
/// CSS timing-function parameterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        CubicBezier { x1, y1, x2, y2 }
    }

    // Bernstein form along one axis with endpoints pinned to 0 and 1.
    fn axis(a: f64, b: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * a * t * u * u + 3.0 * b * t * t * u + t * t * t
    }

    fn axis_derivative(a: f64, b: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * a * u * (1.0 - 3.0 * t) + 3.0 * b * t * (2.0 - 3.0 * t) + 3.0 * t * t
    }

    /// Eased progress at time fraction `u` in [0, 1].
    ///
    /// Solves x(t) = u with a few Newton steps, falling back to bisection
    /// where the slope flattens, then evaluates y(t).
    pub fn eval(&self, u: f64) -> f64 {
        if u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 {
            return 1.0;
        }
        let mut t = u;
        for _ in 0..8 {
            let err = Self::axis(self.x1, self.x2, t) - u;
            if err.abs() < 1e-7 {
                return Self::axis(self.y1, self.y2, t);
            }
            let slope = Self::axis_derivative(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t = (t - err / slope).clamp(0.0, 1.0);
        }
        let mut lo = 0.0;
        let mut hi = 1.0;
        for _ in 0..32 {
            let mid = (lo + hi) / 2.0;
            if Self::axis(self.x1, self.x2, mid) < u {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Self::axis(self.y1, self.y2, (lo + hi) / 2.0)
    }
}

/// One in-flight spin: where it started, where it will stop, and the option
/// count snapshotted at launch. Winner resolution uses the snapshot, never a
/// live read of the store.
#[derive(Clone, Copy, Debug)]
pub struct SpinTransition {
    started_at: Instant,
    start_rotation: f64,
    target_rotation: f64,
    item_count: usize,
}

impl SpinTransition {
    pub fn start_rotation(&self) -> f64 {
        self.start_rotation
    }

    pub fn target_rotation(&self) -> f64 {
        self.target_rotation
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / SPIN_DURATION.as_secs_f64()).min(1.0)
    }

    /// Visual rotation at `now`, eased along [`SPIN_EASING`].
    pub fn angle_at(&self, now: Instant) -> f64 {
        let eased = SPIN_EASING.eval(self.progress(now));
        self.start_rotation + (self.target_rotation - self.start_rotation) * eased
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= SPIN_DURATION
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinOutcome {
    pub winning_index: usize,
    pub final_rotation: f64,
}

#[derive(Clone, Copy, Debug, Default)]
enum SpinPhase {
    #[default]
    Idle,
    Spinning(SpinTransition),
}

/// `Idle -> Spinning -> Idle` machine owning the accumulated rotation.
///
/// Rotation accumulates across spins instead of resetting, so the wheel
/// never visibly snaps back; the baseline is re-normalized into [0, 360) at
/// each launch to keep the number bounded.
#[derive(Debug)]
pub struct SpinEngine {
    rng: StdRng,
    rotation: f64,
    phase: SpinPhase,
}

impl SpinEngine {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Deterministic engine for tests and the `--seed` flag.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        SpinEngine {
            rng,
            rotation: 0.0,
            phase: SpinPhase::Idle,
        }
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning(_))
    }

    /// The wheel's on-screen rotation at `now`: the resting angle while
    /// idle, the eased in-flight angle while spinning.
    pub fn rotation_at(&self, now: Instant) -> f64 {
        match self.phase {
            SpinPhase::Idle => self.rotation,
            SpinPhase::Spinning(transition) => transition.angle_at(now),
        }
    }

    /// Launch a spin over a wheel of `item_count` options.
    ///
    /// Draws a fractional turn count in [5, 8) plus a whole-degree offset in
    /// [0, 360) and targets `rotation + spins * 360 + extra`.
    pub fn start(
        &mut self,
        item_count: usize,
        now: Instant,
    ) -> Result<SpinTransition, SpinError> {
        if self.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        if item_count < MIN_ITEMS {
            return Err(SpinError::NotEnoughItems);
        }
        self.rotation = geometry::normalize_degrees(self.rotation);
        let spins: f64 = self.rng.random_range(MIN_SPINS..MAX_SPINS);
        let extra = self.rng.random_range(0..360) as f64;
        let transition = SpinTransition {
            started_at: now,
            start_rotation: self.rotation,
            target_rotation: self.rotation + spins * 360.0 + extra,
            item_count,
        };
        self.phase = SpinPhase::Spinning(transition);
        Ok(transition)
    }

    /// Settle a finished transition. Returns the outcome exactly once, when
    /// the fixed duration has elapsed; `None` while idle or still turning.
    pub fn tick(&mut self, now: Instant) -> Option<SpinOutcome> {
        let SpinPhase::Spinning(transition) = self.phase else {
            return None;
        };
        if !transition.is_complete(now) {
            return None;
        }
        self.rotation = transition.target_rotation;
        self.phase = SpinPhase::Idle;
        Some(SpinOutcome {
            winning_index: geometry::resolve_winner(
                transition.target_rotation,
                transition.item_count,
            ),
            final_rotation: transition.target_rotation,
        })
    }
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_pins_its_endpoints() {
        assert_eq!(SPIN_EASING.eval(0.0), 0.0);
        assert_eq!(SPIN_EASING.eval(1.0), 1.0);
        assert_eq!(SPIN_EASING.eval(-0.5), 0.0);
        assert_eq!(SPIN_EASING.eval(1.5), 1.0);
    }

    #[test]
    fn easing_is_monotonic() {
        let mut prev = 0.0;
        for step in 1..=100 {
            let value = SPIN_EASING.eval(step as f64 / 100.0);
            assert!(value >= prev, "dip at step {step}");
            prev = value;
        }
    }

    #[test]
    fn easing_decelerates_late() {
        // Most of the travel happens in the first half of the duration.
        assert!(SPIN_EASING.eval(0.5) > 0.6);
        assert!(SPIN_EASING.eval(0.9) < 1.0);
    }

    #[test]
    fn start_rejects_while_spinning() {
        let now = Instant::now();
        let mut engine = SpinEngine::with_seed(7);
        engine.start(4, now).unwrap();
        let err = engine.start(4, now).unwrap_err();
        assert_eq!(err, SpinError::AlreadySpinning);
        assert!(engine.is_spinning());
    }

    #[test]
    fn start_rejects_undersized_wheels() {
        let mut engine = SpinEngine::with_seed(7);
        let err = engine.start(1, Instant::now()).unwrap_err();
        assert_eq!(err, SpinError::NotEnoughItems);
        assert!(!engine.is_spinning());
    }

    #[test]
    fn target_lies_in_the_drawn_range() {
        for seed in 0..50 {
            let mut engine = SpinEngine::with_seed(seed);
            let transition = engine.start(6, Instant::now()).unwrap();
            let travel = transition.target_rotation() - transition.start_rotation();
            assert!(travel >= MIN_SPINS * 360.0, "seed {seed}: {travel}");
            assert!(travel < MAX_SPINS * 360.0 + 360.0, "seed {seed}: {travel}");
        }
    }

    #[test]
    fn angle_interpolates_start_to_target() {
        let start = Instant::now();
        let mut engine = SpinEngine::with_seed(3);
        let transition = engine.start(4, start).unwrap();
        assert_eq!(transition.angle_at(start), transition.start_rotation());
        let done = start + SPIN_DURATION;
        assert_eq!(transition.angle_at(done), transition.target_rotation());
        let mid = transition.angle_at(start + SPIN_DURATION / 2);
        assert!(mid > transition.start_rotation());
        assert!(mid < transition.target_rotation());
    }

    #[test]
    fn tick_settles_exactly_once() {
        let start = Instant::now();
        let mut engine = SpinEngine::with_seed(11);
        let transition = engine.start(5, start).unwrap();
        assert_eq!(engine.tick(start + Duration::from_secs(7)), None);
        let outcome = engine.tick(start + SPIN_DURATION).unwrap();
        assert_eq!(
            outcome.winning_index,
            geometry::resolve_winner(transition.target_rotation(), 5)
        );
        assert!(!engine.is_spinning());
        assert_eq!(engine.rotation_at(start + SPIN_DURATION), transition.target_rotation());
        assert_eq!(engine.tick(start + SPIN_DURATION), None);
    }

    #[test]
    fn rotation_accumulates_without_snapping_back() {
        let mut now = Instant::now();
        let mut engine = SpinEngine::with_seed(42);
        let first = engine.start(4, now).unwrap();
        now += SPIN_DURATION;
        engine.tick(now).unwrap();
        let resting = engine.rotation_at(now);
        assert_eq!(resting, first.target_rotation());

        // The next spin starts from the same on-screen angle, renormalized.
        let second = engine.start(4, now).unwrap();
        assert!(second.start_rotation() < 360.0);
        let gap = geometry::normalize_degrees(resting) - second.start_rotation();
        assert!(gap.abs() < 1e-9);
    }

    #[test]
    fn seeded_engines_replay_the_same_spin() {
        let now = Instant::now();
        let a = SpinEngine::with_seed(9).start(4, now).unwrap();
        let b = SpinEngine::with_seed(9).start(4, now).unwrap();
        assert_eq!(a.target_rotation(), b.target_rotation());
    }
}

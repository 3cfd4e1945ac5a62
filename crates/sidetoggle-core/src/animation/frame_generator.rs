//! Frame-rate normalised position counter.
//!
//! A `FrameGenerator` turns wall-clock deltas into a position measured in
//! 60fps-equivalent frames, so an animation of `n` frames always lasts
//! `n / 60` seconds no matter how often [`FrameGenerator::next`] is called.
//!
//! The position is advanced by one step of 4th-order Runge-Kutta integration
//! with constant velocity [`FRAMES_PER_MS`] and zero acceleration. For that
//! motion RK4 is exact and equals `position + velocity * dt`; the integrator
//! stays so a non-constant rate can be plugged in without touching callers.
//!
//! All methods that need time take it as an argument (milliseconds from any
//! fixed origin); the generator never reads a clock itself.

use std::fmt;

use super::types::{AnimationError, Direction};

/// 60 frames per second, expressed per millisecond.
pub const FRAMES_PER_MS: f64 = 3.0 / 50.0;

/// Position generator for a single animation.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGenerator {
    frame_count: f64,
    position: f64,
    started: bool,
    paused: bool,
    /// Time of the last sample taken by `next` (or of `start`).
    last_sample_ms: f64,
    /// Time at which the current pause began.
    paused_at_ms: f64,
    /// Paused time not yet discounted by `next`.
    pause_accumulator_ms: f64,
}

impl FrameGenerator {
    /// Create a stopped, unpaused generator at position 0.
    ///
    /// `frame_count` must be finite and strictly positive.
    pub fn new(frame_count: f64) -> Result<Self, AnimationError> {
        if !frame_count.is_finite() || frame_count <= 0.0 {
            return Err(AnimationError::invalid(
                "<frame generator>",
                format!("frame count must be finite and positive, got {frame_count}"),
            ));
        }

        Ok(Self {
            frame_count,
            position: 0.0,
            started: false,
            paused: false,
            last_sample_ms: 0.0,
            paused_at_ms: 0.0,
            pause_accumulator_ms: 0.0,
        })
    }

    /// Start the internal clock. Only the first call has an effect.
    pub fn start(&mut self, now_ms: f64) -> &mut Self {
        if !self.started {
            self.started = true;
            self.last_sample_ms = now_ms;
            self.pause_accumulator_ms = 0.0;
            if self.paused {
                // Time before the start never counts, paused or not.
                self.paused_at_ms = now_ms;
            }
        }
        self
    }

    /// Advance the position by the time elapsed since the last sample.
    ///
    /// Does nothing while paused or before `start`.
    pub fn next(&mut self, now_ms: f64, direction: Direction) -> &mut Self {
        if self.paused || !self.started {
            return self;
        }

        let elapsed = (now_ms - self.last_sample_ms - self.pause_accumulator_ms).max(0.0);
        let dt = elapsed * direction.sign();
        let (position, _) = rk4(self.position, FRAMES_PER_MS, dt, |_, _, _| 0.0);

        self.position = position.clamp(0.0, self.frame_count);
        self.last_sample_ms = now_ms;
        self.pause_accumulator_ms = 0.0;
        self
    }

    /// Freeze the position; `next` becomes a no-op.
    pub fn pause(&mut self, now_ms: f64) -> &mut Self {
        if !self.paused {
            self.paused = true;
            self.paused_at_ms = now_ms;
        }
        self
    }

    /// Resume after `pause`. The paused interval is excluded from the next
    /// elapsed-time computation.
    pub fn unpause(&mut self, now_ms: f64) -> &mut Self {
        if self.paused {
            if self.started {
                self.pause_accumulator_ms += (now_ms - self.paused_at_ms).max(0.0);
            }
            self.paused = false;
        }
        self
    }

    /// Jump to position 0.
    pub fn reset(&mut self) -> &mut Self {
        self.position = 0.0;
        self
    }

    /// Jump to the last frame.
    pub fn end(&mut self) -> &mut Self {
        self.position = self.frame_count;
        self
    }

    /// Remaining fraction of the animation: 1.0 at position 0, 0.0 at the
    /// last frame.
    ///
    /// Note the inversion: interpolators receive 1.0 at the start of a
    /// forward run.
    pub fn percent(&self) -> f64 {
        1.0 - self.position / self.frame_count
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn frame_count(&self) -> f64 {
        self.frame_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl fmt::Display for FrameGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.started {
            return write!(f, "FG: <>");
        }
        write!(
            f,
            "FG: <frame {}/{}> <is {}paused> <{}fps>",
            self.position,
            self.frame_count,
            if self.paused { "" } else { "not " },
            (FRAMES_PER_MS * 1000.0).round()
        )
    }
}

/// One Runge-Kutta 4 step for position `x`, velocity `v` over `dt`, with
/// acceleration `a(x, v, t)`. Returns the new `(x, v)`.
fn rk4<A>(x: f64, v: f64, dt: f64, a: A) -> (f64, f64)
where
    A: Fn(f64, f64, f64) -> f64,
{
    let c = 0.5 * dt;
    let k = dt / 6.0;

    let x1 = x;
    let v1 = v;
    let a1 = a(x1, v1, 0.0);

    let x2 = x + c * v1;
    let v2 = v + c * a1;
    let a2 = a(x2, v2, c);

    let x3 = x + c * v2;
    let v3 = v + c * a2;
    let a3 = a(x3, v3, c);

    let x4 = x + v3 * dt;
    let v4 = v + a3 * dt;
    let a4 = a(x4, v4, dt);

    let xf = x + k * (v1 + 2.0 * v2 + 2.0 * v3 + v4);
    let vf = v + k * (a1 + 2.0 * a2 + 2.0 * a3 + a4);
    (xf, vf)
}

static_assertions::assert_impl_all!(FrameGenerator: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn started(frames: f64) -> FrameGenerator {
        let mut fg = FrameGenerator::new(frames).unwrap();
        fg.start(0.0);
        fg
    }

    #[test]
    fn test_rejects_bad_frame_counts() {
        assert!(FrameGenerator::new(0.0).is_err());
        assert!(FrameGenerator::new(-3.0).is_err());
        assert!(FrameGenerator::new(f64::NAN).is_err());
        assert!(FrameGenerator::new(f64::INFINITY).is_err());
        assert!(FrameGenerator::new(0.5).is_ok());
    }

    #[test]
    fn test_rk4_constant_velocity_is_linear() {
        let (x, v) = rk4(2.0, FRAMES_PER_MS, 100.0, |_, _, _| 0.0);
        assert!(approx_eq(x, 8.0));
        assert!(approx_eq(v, FRAMES_PER_MS));
    }

    #[test]
    fn test_next_is_noop_before_start() {
        let mut fg = FrameGenerator::new(15.0).unwrap();
        fg.next(1000.0, Direction::Forward);
        assert_eq!(fg.position(), 0.0);
        assert!(!fg.is_started());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut fg = FrameGenerator::new(100.0).unwrap();
        fg.start(0.0);
        fg.start(500.0);
        fg.next(100.0, Direction::Forward);
        // 100ms since the first start: 6 frames at 60fps.
        assert!(approx_eq(fg.position(), 6.0));
    }

    #[test]
    fn test_forward_never_exceeds_frame_count() {
        let mut fg = started(15.0);
        let mut now = 0.0_f64;
        for step in [1.0, 40.0, 3.0, 1000.0, 16.0, 7.5, 20_000.0] {
            now += step;
            fg.next(now, Direction::Forward);
            assert!(fg.position() <= fg.frame_count());
        }
        assert_eq!(fg.position(), 15.0);
        assert_eq!(fg.percent(), 0.0);
    }

    #[test]
    fn test_backward_never_drops_below_zero() {
        let mut fg = started(15.0);
        fg.end();
        let mut now = 0.0_f64;
        for step in [2.0, 80.0, 16.7, 5000.0, 1.0] {
            now += step;
            fg.next(now, Direction::Backward);
            assert!(fg.position() >= 0.0);
        }
        assert_eq!(fg.position(), 0.0);
        assert_eq!(fg.percent(), 1.0);
    }

    #[test]
    fn test_frame_rate_independence() {
        // 15 frames at 60fps is 250ms, whatever the callback rate.
        let mut slow = started(15.0);
        let mut fast = started(15.0);

        let mut now = 0.0_f64;
        while now < 125.0 {
            now += 1000.0 / 30.0;
            slow.next(now.min(125.0), Direction::Forward);
        }
        let mut now = 0.0_f64;
        while now < 125.0 {
            now += 1000.0 / 144.0;
            fast.next(now.min(125.0), Direction::Forward);
        }

        assert!((slow.position() - 7.5).abs() < 1e-6);
        assert!((fast.position() - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_pause_neutrality() {
        let mut fg = started(60.0);
        fg.next(100.0, Direction::Forward);
        let before = fg.percent();

        fg.pause(100.0);
        for t in [150.0, 400.0, 900.0] {
            fg.next(t, Direction::Forward);
            assert_eq!(fg.percent(), before);
        }

        // 900ms paused must not count.
        fg.unpause(1000.0);
        fg.next(1050.0, Direction::Forward);
        assert!(approx_eq(fg.position(), 6.0 + 3.0));
    }

    #[test]
    fn test_pause_and_unpause_are_idempotent() {
        let mut fg = started(60.0);
        fg.pause(10.0);
        fg.pause(500.0);
        assert!(fg.is_paused());

        fg.unpause(510.0);
        fg.unpause(2000.0);
        assert!(!fg.is_paused());

        // Only 10..510 was paused; 10ms of running time before the pause.
        fg.next(520.0, Direction::Forward);
        assert!(approx_eq(fg.position(), 20.0 * FRAMES_PER_MS));
    }

    #[test]
    fn test_paused_before_start_ignores_pre_start_time() {
        let mut fg = FrameGenerator::new(60.0).unwrap();
        fg.pause(0.0);
        fg.start(1000.0);
        fg.unpause(1200.0);
        fg.next(1300.0, Direction::Forward);
        assert!(approx_eq(fg.position(), 100.0 * FRAMES_PER_MS));
    }

    #[test]
    fn test_reset_and_end_preserve_state() {
        let mut fg = started(10.0);
        fg.pause(0.0);
        fg.end();
        assert_eq!(fg.position(), 10.0);
        assert!(fg.is_paused());
        assert!(fg.is_started());

        fg.reset();
        assert_eq!(fg.position(), 0.0);
        assert!(fg.is_paused());
    }

    #[test]
    fn test_percent_bounds() {
        let mut fg = started(10.0);
        assert_eq!(fg.percent(), 1.0);

        let mut now = 0.0_f64;
        for _ in 0..20 {
            now += 16.0;
            fg.next(now, Direction::Forward);
            let p = fg.percent();
            assert!((0.0..=1.0).contains(&p));
        }
        assert_eq!(fg.percent(), 0.0);
    }

    #[test]
    fn test_display() {
        let mut fg = FrameGenerator::new(15.0).unwrap();
        assert_eq!(fg.to_string(), "FG: <>");

        fg.start(0.0);
        assert_eq!(fg.to_string(), "FG: <frame 0/15> <is not paused> <60fps>");

        fg.pause(0.0);
        assert_eq!(fg.to_string(), "FG: <frame 0/15> <is paused> <60fps>");
    }
}

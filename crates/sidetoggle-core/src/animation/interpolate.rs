//! Interpolation for animatable values.
//!
//! The `Interpolate` trait is the usual "0.0 = self, 1.0 = to" blend. The
//! animator, however, feeds interpolators the frame generator's
//! [`percent`](super::FrameGenerator::percent), which counts *down* from 1.0
//! to 0.0 during a forward run. [`toward_end`] and [`lab_rgba`] take that
//! remaining fraction directly, so a forward run goes from `start` to `end`.
//!
//! # Colour Space Handling
//!
//! RGBA values are `[r, g, b, a]` with 0-255 colour channels and a 0-1 alpha,
//! the way the overlay writes CSS colours. [`lab_rgba`] blends the colour
//! channels in CIE L*a*b* (D65) for perceptually even fades, blends alpha
//! linearly and rounds the channels to integers.

use palette::{FromColor, Lab, LinSrgb, Srgb};

/// Trait for types that can be interpolated between two values.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    ///
    /// When t = 0.0, returns self.
    /// When t = 1.0, returns to.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self as f64, *to as f64, t) as f32
    }
}

impl Interpolate for [f64; 4] {
    /// Per-component interpolation.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        [
            lerp(self[0], to[0], t),
            lerp(self[1], to[1], t),
            lerp(self[2], to[2], t),
            lerp(self[3], to[3], t),
        ]
    }
}

/// Blend for the animator's inverted progress: `remaining = 1.0` gives
/// `start`, `remaining = 0.0` gives `end`.
pub fn toward_end<T: Interpolate>(start: &T, end: &T, remaining: f64) -> T {
    end.interpolate(start, remaining.clamp(0.0, 1.0))
}

/// RGBA blend through CIE L*a*b*, using the animator's inverted progress.
pub fn lab_rgba(start: &[f64; 4], end: &[f64; 4], remaining: f64) -> [f64; 4] {
    let q = 1.0 - remaining.clamp(0.0, 1.0);

    let from = to_lab(start);
    let to = to_lab(end);
    let mixed = Lab::new(
        lerp(from.l as f64, to.l as f64, q) as f32,
        lerp(from.a as f64, to.a as f64, q) as f32,
        lerp(from.b as f64, to.b as f64, q) as f32,
    );

    let rgb = Srgb::from_linear(LinSrgb::from_color(mixed));
    [
        channel_to_u8_range(rgb.red),
        channel_to_u8_range(rgb.green),
        channel_to_u8_range(rgb.blue),
        lerp(start[3], end[3], q),
    ]
}

fn to_lab(rgba: &[f64; 4]) -> Lab {
    let srgb = Srgb::new(
        (rgba[0] / 255.0) as f32,
        (rgba[1] / 255.0) as f32,
        (rgba[2] / 255.0) as f32,
    );
    Lab::from_color(srgb.into_linear())
}

fn channel_to_u8_range(c: f32) -> f64 {
    (c as f64 * 255.0).round().clamp(0.0, 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.0001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_f64_interpolation() {
        let from = 0.0_f64;
        let to = 100.0_f64;

        assert!(approx_eq(from.interpolate(&to, 0.0), 0.0));
        assert!(approx_eq(from.interpolate(&to, 0.25), 25.0));
        assert!(approx_eq(from.interpolate(&to, 1.0), 100.0));
    }

    #[test]
    fn test_rgba_array_interpolation() {
        let from = [0.0, 0.0, 0.0, 0.25];
        let to = [255.0, 255.0, 255.0, 1.0];
        let mid = from.interpolate(&to, 0.5);
        assert!(approx_eq(mid[0], 127.5));
        assert!(approx_eq(mid[3], 0.625));
    }

    #[test]
    fn test_toward_end_uses_remaining_fraction() {
        assert!(approx_eq(toward_end(&2.0, &18.0, 1.0), 2.0));
        assert!(approx_eq(toward_end(&2.0, &18.0, 0.0), 18.0));
        assert!(approx_eq(toward_end(&2.0, &18.0, 0.25), 14.0));
        // Out-of-range progress is clamped.
        assert!(approx_eq(toward_end(&2.0, &18.0, 1.5), 2.0));
    }

    #[test]
    fn test_lab_rgba_endpoints() {
        let grey = [150.0, 150.0, 150.0, 1.0];
        let green = [70.0, 187.0, 70.0, 1.0];

        assert_eq!(lab_rgba(&grey, &green, 1.0), grey);
        assert_eq!(lab_rgba(&grey, &green, 0.0), green);
    }

    #[test]
    fn test_lab_rgba_alpha_is_linear() {
        let idle = [255.0, 255.0, 255.0, 0.25];
        let active = [255.0, 255.0, 255.0, 1.0];

        let mid = lab_rgba(&idle, &active, 0.5);
        assert!(approx_eq(mid[3], 0.625));
        assert_eq!(&mid[..3], &[255.0, 255.0, 255.0]);
    }

    #[test]
    fn test_lab_rgba_midpoint_stays_in_gamut() {
        let black = [0.0, 0.0, 0.0, 1.0];
        let white = [255.0, 255.0, 255.0, 1.0];

        let mid = lab_rgba(&black, &white, 0.5);
        for c in &mid[..3] {
            assert!((0.0..=255.0).contains(c));
            assert_eq!(*c, c.round());
        }
        // L* = 50 is darker than the sRGB midpoint but far from black.
        assert!(mid[0] > 100.0 && mid[0] < 130.0);
    }
}

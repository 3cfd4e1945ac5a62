//! Progress transforms.
//!
//! A progress transform remaps the linear progress reported by a frame
//! generator onto an eased progress before interpolation. Both ends stay
//! fixed: every curve here maps 0.0 to 0.0 and 1.0 to 1.0.
//!
//! # Usage
//!
//! ```
//! use sidetoggle_core::animation::easing::Easing;
//!
//! let eased = Easing::Cosine.evaluate(0.5);
//! assert!((eased - 0.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Progress transforms used by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No remapping.
    Identity,
    /// `0.5 * (1 - cos(pi * x))`: slow at both ends.
    Cosine,
    /// `(e^(-4x) - 1) / (e^(-4) - 1)`: fast start, long settle.
    Exponential,
}

impl Default for Easing {
    fn default() -> Self {
        Self::Identity
    }
}

impl Easing {
    /// Evaluate the transform at `x`, clamped to [0, 1].
    pub fn evaluate(self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Self::Identity => x,
            Self::Cosine => 0.5 * (1.0 - (std::f64::consts::PI * x).cos()),
            Self::Exponential => ((-4.0 * x).exp() - 1.0) / ((-4.0_f64).exp() - 1.0),
        }
    }

    /// Boxed closure form, as stored by the animator.
    pub fn into_transform(self) -> Box<dyn Fn(f64) -> f64> {
        Box::new(move |x| self.evaluate(x))
    }
}

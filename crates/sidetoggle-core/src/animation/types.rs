//! Core animation types.
//!
//! - `Direction`: which way a frame generator counts
//! - `UpdateArg`: fixed extra arguments handed to an updater
//! - `AnimationError`: failures surfaced by registration and explicit lookups

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Playback direction of an animation.
///
/// `Forward` moves the frame position toward the frame count, `Backward`
/// moves it toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Forward
    }
}

impl Direction {
    /// Sign applied to the elapsed frame delta.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Extra argument passed to an updater before the interpolated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UpdateArg {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl UpdateArg {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for UpdateArg {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<f64> for UpdateArg {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for UpdateArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for UpdateArg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Errors produced by the animation system.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnimationError {
    /// No animation is registered under this name.
    #[error("animation not found: {0}")]
    NotFound(String),

    /// The animation description is malformed.
    #[error("invalid animation configuration for '{name}': {reason}")]
    InvalidConfiguration { name: String, reason: String },
}

impl AnimationError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign_and_reverse() {
        assert_eq!(Direction::Forward.sign(), 1.0);
        assert_eq!(Direction::Backward.sign(), -1.0);
        assert_eq!(Direction::Forward.reversed(), Direction::Backward);
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    fn test_update_arg_accessors() {
        assert_eq!(UpdateArg::from(true).as_flag(), Some(true));
        assert_eq!(UpdateArg::from(2.5).as_number(), Some(2.5));
        assert_eq!(UpdateArg::from("nob").as_text(), Some("nob"));
        assert_eq!(UpdateArg::from("nob").as_number(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = AnimationError::invalid("fade", "frame count must be positive");
        assert_eq!(
            err.to_string(),
            "invalid animation configuration for 'fade': frame count must be positive"
        );
        assert_eq!(
            AnimationError::NotFound("x".into()).to_string(),
            "animation not found: x"
        );
    }
}

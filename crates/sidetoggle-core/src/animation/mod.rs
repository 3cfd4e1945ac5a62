//! Animation module for the overlay's hover and toggle effects.
//!
//! This module provides:
//! - **Frame generation**: a 60fps-normalised position counter that advances by
//!   wall-clock time, so the same animation takes the same time at 30fps or 144fps
//! - **Animator**: a registry of named animations advanced together once per frame
//! - **Scheduling**: the "request next tick" / "cancel tick" seam to the host
//! - **Interpolation**: scalar, RGBA and CIE L*a*b* colour interpolation
//! - **Progress transforms**: the easing curves used by the overlay
//!
//! # Architecture
//!
//! ```text
//! Animator
//!   ├── Clock            (time source, real or manual)
//!   ├── FrameScheduler   (host refresh callback)
//!   └── Animations (by name, registration order)
//!         ├── FrameGenerator (position in [0, frame_count])
//!         ├── progress transform
//!         └── typed track: start/end + interpolator + updater
//! ```

pub mod animator;
pub mod clock;
pub mod easing;
pub mod frame_generator;
pub mod interpolate;
pub mod scheduler;
pub mod types;

pub use animator::{AnimationSpec, Animator, Interpolator, ProgressTransform, Updater};
pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::Easing;
pub use frame_generator::{FRAMES_PER_MS, FrameGenerator};
pub use interpolate::{Interpolate, lab_rgba, toward_end};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use types::{AnimationError, Direction, UpdateArg};

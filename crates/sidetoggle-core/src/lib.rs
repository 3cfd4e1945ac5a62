//! Core state engine for the sidebar toggle overlay.
//!
//! Two independent pieces live here:
//! - [`animation`]: a frame-rate-independent interpolation scheduler
//!   ([`FrameGenerator`] + [`Animator`]) driven by a host refresh callback.
//! - [`flags`]: a dependency-aware boolean flag graph ([`FlagTree`]) whose
//!   effective values are the AND of a flag and all of its ancestors.
//!
//! Neither piece touches the page; presentation happens through the callbacks
//! handed to the animator and the queries made against the flag tree.

pub mod animation;
pub mod flags;

pub use animation::{
    AnimationError, AnimationSpec, Animator, Clock, Direction, Easing, FrameGenerator, FrameScheduler,
    ManualClock, ManualScheduler, SystemClock, UpdateArg,
};
pub use flags::{FlagDecl, FlagError, FlagStructure, FlagTree};

//! Animator: a registry of named animations sharing one frame loop.
//!
//! Each animation pairs a [`FrameGenerator`] with an interpolator, an optional
//! progress transform and an updater callback. Once per host frame,
//! [`Animator::on_frame`] advances every unpaused animation, interpolates its
//! value and hands it to the updater.
//!
//! The API is permissive: every per-animation method silently ignores names
//! that are not registered, so UI code can poke animations for elements that
//! do not exist yet. Only registration can fail.
//!
//! # Usage
//!
//! ```
//! use sidetoggle_core::animation::{AnimationSpec, Animator, ManualClock, ManualScheduler};
//!
//! let clock = ManualClock::new();
//! let scheduler = ManualScheduler::new();
//! let mut animator = Animator::new(clock.clone(), scheduler.clone());
//!
//! animator
//!     .add_animation(
//!         AnimationSpec::new("knob", 2.0_f64, 18.0, 15.0)
//!             .linear()
//!             .updater(|_args, x| {
//!                 println!("knob at {x}px");
//!                 Ok(())
//!             }),
//!     )?
//!     .start();
//!
//! // Host frame callback:
//! clock.advance(16.0);
//! if scheduler.take_pending() {
//!     animator.on_frame();
//! }
//! # Ok::<(), sidetoggle_core::AnimationError>(())
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::clock::Clock;
use super::easing::Easing;
use super::frame_generator::FrameGenerator;
use super::interpolate::{Interpolate, toward_end};
use super::scheduler::FrameScheduler;
use super::types::{AnimationError, Direction, UpdateArg};

/// `(start, end, progress) -> value`.
pub type Interpolator<T> = Box<dyn Fn(&T, &T, f64) -> T>;

/// `(extra args, value)`, called once per active frame.
pub type Updater<T> = Box<dyn FnMut(&[UpdateArg], T) -> anyhow::Result<()>>;

/// Remaps linear progress onto eased progress.
pub type ProgressTransform = Box<dyn Fn(f64) -> f64>;

/// Description of an animation to register.
///
/// Required: name, endpoints, frame count (in 60fps frames), interpolator and
/// updater. Everything else has a default: identity transform, no extra
/// arguments, active, forward.
pub struct AnimationSpec<T> {
    name: String,
    start: T,
    end: T,
    num_frames: f64,
    interpolator: Option<Interpolator<T>>,
    updater: Option<Updater<T>>,
    progress_transform: Option<ProgressTransform>,
    update_args: Vec<UpdateArg>,
    active: bool,
    animate_negatively: bool,
}

impl<T: 'static> AnimationSpec<T> {
    pub fn new(name: impl Into<String>, start: T, end: T, num_frames: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            num_frames,
            interpolator: None,
            updater: None,
            progress_transform: None,
            update_args: Vec::new(),
            active: true,
            animate_negatively: false,
        }
    }

    pub fn interpolator<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &T, f64) -> T + 'static,
    {
        self.interpolator = Some(Box::new(f));
        self
    }

    pub fn updater<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[UpdateArg], T) -> anyhow::Result<()> + 'static,
    {
        self.updater = Some(Box::new(f));
        self
    }

    pub fn progress_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        self.progress_transform = Some(Box::new(f));
        self
    }

    /// Use one of the built-in progress transforms.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.progress_transform = Some(easing.into_transform());
        self
    }

    pub fn update_args(mut self, args: Vec<UpdateArg>) -> Self {
        self.update_args = args;
        self
    }

    /// Inactive animations are registered with a paused frame generator.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Start out running backward.
    pub fn animate_negatively(mut self, negative: bool) -> Self {
        self.animate_negatively = negative;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Interpolate + 'static> AnimationSpec<T> {
    /// Linear interpolation from `start` (progress 1.0) to `end` (progress 0.0).
    pub fn linear(self) -> Self {
        self.interpolator(|start: &T, end: &T, p| toward_end(start, end, p))
    }
}

impl<T> fmt::Debug for AnimationSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSpec")
            .field("name", &self.name)
            .field("num_frames", &self.num_frames)
            .field("has_interpolator", &self.interpolator.is_some())
            .field("has_updater", &self.updater.is_some())
            .field("update_args", &self.update_args)
            .field("active", &self.active)
            .field("animate_negatively", &self.animate_negatively)
            .finish()
    }
}

/// Type-erased value side of an animation.
trait Track {
    fn apply(&mut self, args: &[UpdateArg], progress: f64) -> anyhow::Result<()>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedTrack<T> {
    start: T,
    end: T,
    interpolator: Interpolator<T>,
    updater: Updater<T>,
}

impl<T: 'static> Track for TypedTrack<T> {
    fn apply(&mut self, args: &[UpdateArg], progress: f64) -> anyhow::Result<()> {
        let value = (self.interpolator)(&self.start, &self.end, progress);
        (self.updater)(args, value)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A registered animation.
struct Animation {
    direction: Direction,
    frames: FrameGenerator,
    progress_transform: ProgressTransform,
    update_args: Vec<UpdateArg>,
    track: Box<dyn Track>,
}

impl Animation {
    /// Advance one frame. Returns `Ok(true)` if the updater ran.
    fn step(&mut self, now_ms: f64) -> anyhow::Result<bool> {
        if !self.frames.is_started() {
            self.frames.start(now_ms);
        }
        if self.frames.is_paused() {
            return Ok(false);
        }

        self.frames.next(now_ms, self.direction);
        let progress = (self.progress_transform)(self.frames.percent());
        self.track.apply(&self.update_args, progress)?;
        Ok(true)
    }
}

/// Registry of named animations driven by one cooperative frame loop.
pub struct Animator {
    animations: HashMap<String, Animation>,
    /// Registration order, used as the per-frame application order.
    order: Vec<String>,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn FrameScheduler>,
    running: bool,
}

impl Animator {
    pub fn new<C, S>(clock: C, scheduler: S) -> Self
    where
        C: Clock + 'static,
        S: FrameScheduler + 'static,
    {
        Self {
            animations: HashMap::new(),
            order: Vec::new(),
            clock: Box::new(clock),
            scheduler: Box::new(scheduler),
            running: false,
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register an animation, replacing any animation with the same name.
    pub fn add_animation<T: 'static>(
        &mut self,
        spec: AnimationSpec<T>,
    ) -> Result<&mut Self, AnimationError> {
        let AnimationSpec {
            name,
            start,
            end,
            num_frames,
            interpolator,
            updater,
            progress_transform,
            update_args,
            active,
            animate_negatively,
        } = spec;

        if name.trim().is_empty() {
            return Err(AnimationError::invalid(&name, "animation name must not be empty"));
        }
        let interpolator =
            interpolator.ok_or_else(|| AnimationError::invalid(&name, "missing interpolator"))?;
        let updater = updater.ok_or_else(|| AnimationError::invalid(&name, "missing updater"))?;
        let mut frames = FrameGenerator::new(num_frames).map_err(|_| {
            AnimationError::invalid(
                &name,
                format!("frame count must be finite and positive, got {num_frames}"),
            )
        })?;

        if !active {
            frames.pause(self.clock.now_ms());
        }

        let animation = Animation {
            direction: if animate_negatively {
                Direction::Backward
            } else {
                Direction::Forward
            },
            frames,
            progress_transform: progress_transform.unwrap_or_else(|| Easing::Identity.into_transform()),
            update_args,
            track: Box::new(TypedTrack {
                start,
                end,
                interpolator,
                updater,
            }),
        };

        debug!(animation = %name, num_frames, active, "registered animation");
        if self.animations.insert(name.clone(), animation).is_none() {
            self.order.push(name);
        }
        Ok(self)
    }

    /// Remove an animation and its frame generator. Unknown names are ignored.
    pub fn remove_animation(&mut self, name: &str) -> &mut Self {
        if self.animations.remove(name).is_some() {
            self.order.retain(|n| n != name);
        }
        self
    }

    // ========================================================================
    // Loop control
    // ========================================================================

    /// Start the frame loop if it is not running.
    pub fn start(&mut self) -> &mut Self {
        if !self.running {
            self.running = true;
            self.scheduler.request_tick();
        }
        self
    }

    /// Unpause the named animations and (re)start the frame loop.
    pub fn play(&mut self, resume: &[&str]) -> &mut Self {
        let now = self.clock.now_ms();
        for name in resume {
            match self.animations.get_mut(*name) {
                Some(animation) => {
                    animation.frames.unpause(now);
                }
                None => debug!(animation = %name, "play: unknown animation"),
            }
        }
        self.start()
    }

    /// Pause every animation and stop the frame loop.
    pub fn pause(&mut self) -> &mut Self {
        let now = self.clock.now_ms();
        for animation in self.animations.values_mut() {
            animation.frames.pause(now);
        }
        if self.running {
            self.running = false;
            self.scheduler.cancel_tick();
        }
        self
    }

    /// One iteration of the frame loop. Call from the host's refresh callback.
    ///
    /// Returns the number of updaters that ran. A failing updater is logged
    /// and skipped; the other animations still advance.
    pub fn on_frame(&mut self) -> usize {
        if !self.running {
            return 0;
        }

        let now = self.clock.now_ms();
        let mut applied = 0;
        for name in &self.order {
            let Some(animation) = self.animations.get_mut(name) else {
                continue;
            };
            match animation.step(now) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(error) => warn!(animation = %name, ?error, "animation updater failed"),
            }
        }

        if self.running {
            self.scheduler.request_tick();
        }
        applied
    }

    // ========================================================================
    // Per-animation control
    // ========================================================================

    pub fn play_animation(&mut self, name: &str) -> &mut Self {
        let now = self.clock.now_ms();
        if let Some(animation) = self.lookup_mut(name) {
            animation.frames.unpause(now);
        }
        self
    }

    pub fn pause_animation(&mut self, name: &str) -> &mut Self {
        let now = self.clock.now_ms();
        if let Some(animation) = self.lookup_mut(name) {
            animation.frames.pause(now);
        }
        self
    }

    pub fn set_animation_forward(&mut self, name: &str) -> &mut Self {
        if let Some(animation) = self.lookup_mut(name) {
            animation.direction = Direction::Forward;
        }
        self
    }

    pub fn set_animation_backward(&mut self, name: &str) -> &mut Self {
        if let Some(animation) = self.lookup_mut(name) {
            animation.direction = Direction::Backward;
        }
        self
    }

    /// Jump the named animation back to its first frame.
    pub fn reset_animation(&mut self, name: &str) -> &mut Self {
        if let Some(animation) = self.lookup_mut(name) {
            animation.frames.reset();
        }
        self
    }

    /// Jump the named animation to its last frame.
    pub fn end_animation(&mut self, name: &str) -> &mut Self {
        if let Some(animation) = self.lookup_mut(name) {
            animation.frames.end();
        }
        self
    }

    pub fn update_animation_update_args(&mut self, name: &str, args: Vec<UpdateArg>) -> &mut Self {
        if let Some(animation) = self.lookup_mut(name) {
            animation.update_args = args;
        }
        self
    }

    /// Replace the updater of the named animation.
    ///
    /// `T` must be the value type the animation was registered with; a
    /// mismatch is logged and ignored.
    pub fn update_animation_update_function<T, F>(&mut self, name: &str, f: F) -> &mut Self
    where
        T: 'static,
        F: FnMut(&[UpdateArg], T) -> anyhow::Result<()> + 'static,
    {
        if let Some(animation) = self.lookup_mut(name) {
            match animation.track.as_any_mut().downcast_mut::<TypedTrack<T>>() {
                Some(track) => track.updater = Box::new(f),
                None => warn!(
                    animation = %name,
                    value_type = std::any::type_name::<T>(),
                    "updater value type does not match animation"
                ),
            }
        }
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn contains(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Frame generator of the named animation.
    pub fn frame_generator(&self, name: &str) -> Result<&FrameGenerator, AnimationError> {
        self.animations
            .get(name)
            .map(|a| &a.frames)
            .ok_or_else(|| AnimationError::NotFound(name.to_string()))
    }

    pub fn is_animation_paused(&self, name: &str) -> Option<bool> {
        self.animations.get(name).map(|a| a.frames.is_paused())
    }

    pub fn animation_percent(&self, name: &str) -> Option<f64> {
        self.animations.get(name).map(|a| a.frames.percent())
    }

    pub fn direction_of(&self, name: &str) -> Option<Direction> {
        self.animations.get(name).map(|a| a.direction)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Animation> {
        let found = self.animations.get_mut(name);
        if found.is_none() {
            debug!(animation = %name, "unknown animation");
        }
        found
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in &self.order {
            if let Some(animation) = self.animations.get(name) {
                map.entry(name, &format_args!("{} {:?}", animation.frames, animation.direction));
            }
        }
        map.finish()?;
        write!(f, " running={}", self.running)
    }
}

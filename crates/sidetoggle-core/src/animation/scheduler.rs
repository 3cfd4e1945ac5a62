//! Host refresh scheduling.
//!
//! The animator never loops on its own. After every frame it asks its
//! scheduler for one more tick; pausing simply stops asking. The host decides
//! what a tick is (a display refresh callback, a timer, a test step) and calls
//! [`Animator::on_frame`](super::Animator::on_frame) when one fires.
//!
//! # Usage
//!
//! ```
//! use sidetoggle_core::animation::{FrameScheduler, ManualScheduler};
//!
//! let scheduler = ManualScheduler::new();
//! let mut handle = scheduler.clone();
//! handle.request_tick();
//!
//! // Once per rendered frame:
//! if scheduler.take_pending() {
//!     // animator.on_frame();
//! }
//! assert!(!scheduler.is_pending());
//! ```

use std::cell::Cell;
use std::rc::Rc;

/// The "request next tick" / "cancel pending tick" seam.
pub trait FrameScheduler {
    /// Ask for exactly one more tick. Repeated requests before the tick fires
    /// collapse into one.
    fn request_tick(&mut self);

    /// Drop a pending tick, if any.
    fn cancel_tick(&mut self);

    fn is_pending(&self) -> bool;
}

/// Scheduler backed by a shared pending flag.
///
/// The host owns one clone and polls [`take_pending`](Self::take_pending)
/// from its frame callback; the animator owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: Rc<Cell<bool>>,
    requests: Rc<Cell<u64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending tick. Returns whether one was pending.
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    /// Total number of tick requests seen, including collapsed ones.
    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_tick(&mut self) {
        self.requests.set(self.requests.get() + 1);
        self.pending.set(true);
    }

    fn cancel_tick(&mut self) {
        self.pending.set(false);
    }

    fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

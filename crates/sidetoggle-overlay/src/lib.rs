//! Sidebar toggle overlay.
//!
//! A small floating button that hides and shows a page's sidebar, with a
//! hover fade, an options menu and an "always show the button" switch. This
//! crate holds the behaviour; the page itself sits behind the
//! [`OverlayView`], [`PreferenceStore`] and [`ResProbe`] traits.
//!
//! - `app`: [`OverlayApp`], the root object every page event goes through
//! - `animations`: the hover and switch animations and their updaters
//! - `state`: names and initial values of the overlay's flags
//! - `detection`: bounded polling for the enhancement suite, night-mode URLs
//! - `store`: JSON and in-memory preference stores
//! - `layout`: page geometry snapshots and menu placement
//! - `view`: the presentation trait and a recording implementation

pub mod animations;
pub mod app;
pub mod detection;
pub mod layout;
pub mod state;
pub mod store;
pub mod view;

pub use animations::SharedView;
pub use app::{Host, OverlayApp};
pub use detection::{PollOutcome, ResPoller, ResProbe, ResState, StaticProbe, is_night_mode_url};
pub use layout::{HeaderMetrics, MenuPlacement, MenuShape, PageLayout, PointerButton, SidebarBox};
pub use store::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences, StoreError};
pub use view::{OverlayView, RecordingView, ViewState, css_border, css_rgba};

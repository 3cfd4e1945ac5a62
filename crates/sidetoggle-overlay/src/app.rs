//! Application root.
//!
//! `OverlayApp` owns the flag tree, both animators and the collaborators
//! (view, preference store, enhancement-suite probe). Page events are plain
//! method calls; the host forwards them and calls [`OverlayApp::on_frame`]
//! from its refresh callback.
//!
//! # Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use sidetoggle_config::OverlayConfig;
//! use sidetoggle_core::ManualClock;
//! use sidetoggle_overlay::{
//!     Host, MemoryPreferenceStore, OverlayApp, PageLayout, RecordingView, SidebarBox, StaticProbe,
//! };
//!
//! let view = Rc::new(RefCell::new(RecordingView::new()));
//! let mut app = OverlayApp::new(
//!     OverlayConfig::default(),
//!     Host {
//!         view: view.clone(),
//!         store: Box::new(MemoryPreferenceStore::new()),
//!         probe: Box::new(StaticProbe::absent()),
//!         clock: ManualClock::new(),
//!         page_url: "https://www.reddit.com/".into(),
//!     },
//! )?;
//! app.start(PageLayout::new(1280.0, vec![SidebarBox::visible(300.0)]))?;
//! app.pointer_enter();
//! app.on_frame();
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use tracing::{debug, warn};

use sidetoggle_config::{OverlayConfig, Rgba};
use sidetoggle_core::{Animator, Clock, FlagTree, FrameScheduler, ManualScheduler};

use crate::animations::{
    self, BACKGROUND_COLOR, HOVER_ANIMATIONS, KNOB_POSITION, SharedView, TEXT_COLOR,
    TOGGLE_BACKGROUND,
};
use crate::detection::{PollOutcome, ResPoller, ResProbe};
use crate::layout::{HeaderMetrics, MenuPlacement, MenuShape, PageLayout, PointerButton};
use crate::state::*;
use crate::store::{PreferenceStore, Preferences};

/// External collaborators handed to [`OverlayApp::new`].
pub struct Host<C> {
    pub view: SharedView,
    pub store: Box<dyn PreferenceStore>,
    pub probe: Box<dyn ResProbe>,
    pub clock: C,
    /// URL of the page, used for the night-mode fallback.
    pub page_url: String,
}

pub struct OverlayApp {
    config: OverlayConfig,
    flags: FlagTree,
    hover: Animator,
    display: Animator,
    hover_ticks: ManualScheduler,
    display_ticks: ManualScheduler,
    view: SharedView,
    store: Box<dyn PreferenceStore>,
    probe: Box<dyn ResProbe>,
    clock: Box<dyn Clock>,
    poller: ResPoller,
    page_url: String,
    layout: PageLayout,
    preferences: Preferences,
    menu_open: bool,
}

impl OverlayApp {
    /// Build the overlay and paint the idle button.
    ///
    /// Nothing is read from the store yet; call [`start`](Self::start) once
    /// the page layout is known.
    pub fn new<C>(config: OverlayConfig, host: Host<C>) -> Result<Self>
    where
        C: Clock + Clone + 'static,
    {
        config.validate()?;
        let flags = build_flag_tree(&config.flags).context("invalid flag declarations")?;

        let hover_ticks = ManualScheduler::new();
        let mut hover = Animator::new(host.clock.clone(), hover_ticks.clone());
        animations::register_hover(&mut hover, &config, &host.view)?;
        hover.start();

        let display_ticks = ManualScheduler::new();
        let mut display = Animator::new(host.clock.clone(), display_ticks.clone());
        animations::register_display(&mut display, &config, &host.view)?;
        display.start();

        let poller = ResPoller::new(
            host.clock.now_ms(),
            config.detection.max_poll_ms,
            config.detection.night_mode_host_prefix.clone(),
        );

        let app = Self {
            config,
            flags,
            hover,
            display,
            hover_ticks,
            display_ticks,
            view: host.view,
            store: host.store,
            probe: host.probe,
            clock: Box::new(host.clock),
            poller,
            page_url: host.page_url,
            layout: PageLayout::default(),
            preferences: Preferences::default(),
            menu_open: false,
        };
        app.paint_idle()?;
        Ok(app)
    }

    /// Restore the saved preferences against the initial page layout.
    ///
    /// Preferences are read before anything is persisted, so the first
    /// displayability pass cannot overwrite them.
    pub fn start(&mut self, layout: PageLayout) -> Result<()> {
        self.poll_res();
        self.layout = layout;
        self.restore_preferences()
    }

    // ========================================================================
    // Button
    // ========================================================================

    pub fn pointer_enter(&mut self) {
        self.flags.make_true(MOUSE_ON_BUTTON);

        if self.holds(HOVER_ANIMATION_NOT_INITIALIZED) {
            self.hover
                .play_animation(TEXT_COLOR)
                .play_animation(BACKGROUND_COLOR);
            self.flags.make_false(HOVER_ANIMATION_NOT_INITIALIZED);
        }

        self.hover
            .set_animation_forward(TEXT_COLOR)
            .set_animation_forward(BACKGROUND_COLOR)
            .play(&HOVER_ANIMATIONS);
    }

    pub fn pointer_leave(&mut self) {
        self.flags.make_false(MOUSE_ON_BUTTON);

        self.hover
            .set_animation_backward(TEXT_COLOR)
            .set_animation_backward(BACKGROUND_COLOR)
            .play(&HOVER_ANIMATIONS);
    }

    /// Freeze the hover fade and show the pressed (inverted) colours.
    pub fn pointer_down(&mut self) -> Result<()> {
        self.hover
            .pause()
            .end_animation(TEXT_COLOR)
            .end_animation(BACKGROUND_COLOR);

        let button = &self.config.button;
        self.paint_button(
            button.background_rgba(button.active_alpha),
            button.text_rgba(button.active_alpha),
        )
    }

    /// Primary release over the button toggles the sidebar.
    pub fn pointer_up(&mut self, button: PointerButton) -> Result<()> {
        if !(self.holds(MOUSE_ON_BUTTON) && button == PointerButton::Primary) {
            return Ok(());
        }

        self.flags.toggle(HIDE_SIDEBAR);
        self.apply_sidebar()?;

        let button = &self.config.button;
        self.paint_button(
            button.text_rgba(button.active_alpha),
            button.background_rgba(button.active_alpha),
        )?;

        self.refresh_displayability()
    }

    // ========================================================================
    // Displayability
    // ========================================================================

    /// Flip the "always show" preference (unless restoring it) and animate
    /// the switch to match.
    pub fn toggle_button_displayability(&mut self, from_restore: bool) -> Result<()> {
        if self.holds(DISPLAY_OPTION_ANIMATION_NOT_INITIALIZED) {
            self.display
                .play_animation(TOGGLE_BACKGROUND)
                .play_animation(KNOB_POSITION);
            self.flags.make_false(DISPLAY_OPTION_ANIMATION_NOT_INITIALIZED);
        }

        if !from_restore {
            self.flags.toggle(BUTTON_ALWAYS_DISPLAYED);
        }

        if self.holds(BUTTON_ALWAYS_DISPLAYED) {
            self.display
                .set_animation_forward(TOGGLE_BACKGROUND)
                .set_animation_forward(KNOB_POSITION);
        } else {
            self.display
                .set_animation_backward(TOGGLE_BACKGROUND)
                .set_animation_backward(KNOB_POSITION);
        }

        self.refresh_displayability()
    }

    /// Show the button when the sidebar is in the way (or hidden by us), or
    /// when the user wants it always.
    pub fn evaluate_displayability(&mut self, layout: &PageLayout) -> Result<()> {
        self.layout = layout.clone();
        self.refresh_displayability()
    }

    fn refresh_displayability(&mut self) -> Result<()> {
        let required = self.holds(HIDE_SIDEBAR)
            || self
                .layout
                .sidebar_in_the_way(self.config.layout.side_to_body_ratio);
        let show = required || self.holds(BUTTON_ALWAYS_DISPLAYED);

        self.view.try_borrow_mut()?.set_button_visible(show)?;
        if show {
            self.flags.make_true(BUTTON_IS_DISPLAYED_NOW);
        } else {
            self.hover.pause();
            self.flags.make_false(BUTTON_IS_DISPLAYED_NOW);
        }

        self.preferences.button_always_displayed = self.is_set(BUTTON_ALWAYS_DISPLAYED);
        self.persist();
        Ok(())
    }

    // ========================================================================
    // Sidebar and preferences
    // ========================================================================

    /// Re-apply the saved sidebar state and "always show" preference.
    pub fn restore_preferences(&mut self) -> Result<()> {
        let preferences = match self.store.load() {
            Ok(preferences) => preferences,
            Err(error) => {
                warn!(?error, "failed to load preferences; using defaults");
                Preferences::default()
            }
        };
        debug!(?preferences, "restoring preferences");

        self.flags
            .set(HIDE_SIDEBAR, preferences.is_hidden)
            .set(BUTTON_ALWAYS_DISPLAYED, preferences.button_always_displayed);
        self.preferences = preferences;

        self.apply_sidebar()?;
        self.toggle_button_displayability(true)
    }

    fn apply_sidebar(&mut self) -> Result<()> {
        let hidden = self.holds(HIDE_SIDEBAR);
        let button = &self.config.button;
        let label = if hidden {
            &button.show_label
        } else {
            &button.hide_label
        };

        {
            let mut view = self.view.try_borrow_mut()?;
            view.set_button_label(label)?;
            view.set_sidebar_visible(!hidden)?;
        }

        self.preferences.is_hidden = self.is_set(HIDE_SIDEBAR);
        self.persist();
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(error) = self.store.store(&self.preferences) {
            warn!(?error, "failed to persist preferences");
        }
    }

    // ========================================================================
    // Menu
    // ========================================================================

    /// Open the options menu under the pointer.
    pub fn open_menu(&mut self, pointer_x: f64, header: &HeaderMetrics) -> Result<()> {
        if self.holds(RES_IS_INSTALLED) {
            self.refresh_night_mode();
        }

        self.menu_open = true;
        let placement = MenuPlacement::below_header(pointer_x, header, self.config.menu.width_px);
        let (fill, stroke) = self.menu_palette();

        let mut view = self.view.try_borrow_mut()?;
        view.place_menu(placement)?;
        view.set_menu_palette(fill, stroke)
    }

    pub fn close_menu(&mut self) -> Result<()> {
        self.menu_open = false;
        let (fill, stroke) = self.menu_palette();

        let mut view = self.view.try_borrow_mut()?;
        view.hide_menu()?;
        view.set_menu_palette(fill, stroke)
    }

    /// The enhancement suite's night switch was clicked.
    pub fn on_night_switch_changed(&mut self) -> Result<()> {
        self.refresh_night_mode();
        let (fill, stroke) = self.menu_palette();
        self.view.try_borrow_mut()?.set_menu_palette(fill, stroke)
    }

    fn refresh_night_mode(&mut self) {
        if let Some(state) = self.probe.detect() {
            self.flags.set(IS_NIGHT_MODE, state.night_mode);
        }
    }

    fn menu_palette(&self) -> (Rgba, Rgba) {
        let menu = &self.config.menu;
        let alpha = if self.menu_open {
            menu.active_alpha
        } else {
            menu.idle_alpha
        };
        menu.palette(self.holds(IS_NIGHT_MODE), alpha)
    }

    // ========================================================================
    // Page events
    // ========================================================================

    pub fn on_scroll(&mut self) -> Result<()> {
        self.close_menu()
    }

    pub fn on_resize(&mut self, layout: &PageLayout) -> Result<()> {
        self.close_menu()?;
        self.evaluate_displayability(layout)
    }

    /// Clicks on page content dismiss the menu.
    pub fn on_content_pointer_down(&mut self) -> Result<()> {
        self.close_menu()
    }

    /// One host refresh. Returns the number of animation updates applied.
    pub fn on_frame(&mut self) -> usize {
        self.poll_res();

        let mut applied = 0;
        if self.hover_ticks.take_pending() {
            applied += self.hover.on_frame();
        }
        if self.display_ticks.take_pending() {
            applied += self.display.on_frame();
        }
        applied
    }

    /// Whether the host should schedule another refresh.
    pub fn wants_frame(&self) -> bool {
        self.hover_ticks.is_pending() || self.display_ticks.is_pending() || !self.poller.is_finished()
    }

    fn poll_res(&mut self) {
        let now = self.clock.now_ms();
        match self.poller.poll(now, self.probe.as_ref(), &self.page_url) {
            PollOutcome::Detected(state) => {
                self.flags
                    .make_true(RES_IS_INSTALLED)
                    .set(IS_NIGHT_MODE, state.night_mode);
            }
            PollOutcome::TimedOut { night_mode } => {
                self.flags.set(IS_NIGHT_MODE, night_mode);
            }
            PollOutcome::Pending | PollOutcome::Finished => {}
        }
    }

    // ========================================================================
    // Painting
    // ========================================================================

    fn paint_idle(&self) -> Result<()> {
        let button = &self.config.button;
        let anim = &self.config.animation;
        self.paint_button(
            button.text_rgba(button.idle_alpha),
            button.background_rgba(button.idle_alpha),
        )?;

        let menu = &self.config.menu;
        let shape = MenuShape::new(
            menu.width_px,
            menu.height_px,
            menu.arrow_height_px,
            menu.arrow_half_len_px,
            menu.stroke_width_px,
        );
        let (fill, stroke) = self.menu_palette();

        let mut view = self.view.try_borrow_mut()?;
        view.set_button_label(&button.hide_label)?;
        view.set_toggle_background(anim.toggle_background_off)?;
        view.set_knob_position(anim.knob_off_px)?;
        view.build_menu(&shape)?;
        view.set_menu_palette(fill, stroke)
    }

    fn paint_button(&self, foreground: Rgba, background: Rgba) -> Result<()> {
        let mut view = self.view.try_borrow_mut()?;
        view.set_button_foreground(foreground)?;
        view.set_button_background(background)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn flags(&self) -> &FlagTree {
        &self.flags
    }

    pub fn hover_animator(&self) -> &Animator {
        &self.hover
    }

    pub fn display_animator(&self) -> &Animator {
        &self.display
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    fn holds(&self, flag: &str) -> bool {
        self.flags.holds_true(flag).unwrap_or(false)
    }

    fn is_set(&self, flag: &str) -> bool {
        self.flags.is_true(flag).unwrap_or(false)
    }
}

//! Scripted sidebar-toggle session.
//!
//! Runs the overlay against a logging view and a manual clock: hover, click,
//! flip the "always show" switch, open and dismiss the menu. Preferences are
//! written to the configured JSON file.
//!
//! ```text
//! RUST_LOG=info cargo run -- https://nm.reddit.com/
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use log::info;
use sidetoggle_config::{OverlayConfig, Rgba};
use sidetoggle_core::ManualClock;
use sidetoggle_overlay::{
    HeaderMetrics, Host, JsonPreferenceStore, MenuPlacement, MenuShape, OverlayApp, OverlayView,
    PageLayout, PointerButton, SidebarBox, StaticProbe, css_border, css_rgba,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Prints every style change instead of applying it.
struct LogView {
    border_thickness_px: f64,
}

impl OverlayView for LogView {
    fn set_button_foreground(&mut self, rgba: Rgba) -> Result<()> {
        info!(
            "button color: {}; border: {}",
            css_rgba(&rgba),
            css_border(self.border_thickness_px, &rgba)
        );
        Ok(())
    }

    fn set_button_background(&mut self, rgba: Rgba) -> Result<()> {
        info!("button background: {}", css_rgba(&rgba));
        Ok(())
    }

    fn set_button_label(&mut self, label: &str) -> Result<()> {
        info!("button label: {label}");
        Ok(())
    }

    fn set_button_visible(&mut self, visible: bool) -> Result<()> {
        info!("button visible: {visible}");
        Ok(())
    }

    fn set_sidebar_visible(&mut self, visible: bool) -> Result<()> {
        info!("sidebar visible: {visible}");
        Ok(())
    }

    fn set_toggle_background(&mut self, rgba: Rgba) -> Result<()> {
        info!("switch track: {}", css_rgba(&rgba));
        Ok(())
    }

    fn set_knob_position(&mut self, px: f64) -> Result<()> {
        info!("switch knob: {px:.1}px");
        Ok(())
    }

    fn build_menu(&mut self, shape: &MenuShape) -> Result<()> {
        info!(
            "menu outline {}x{}, stroke {}px: {}",
            shape.width,
            shape.height,
            shape.stroke_width,
            shape.svg_points()
        );
        Ok(())
    }

    fn place_menu(&mut self, placement: MenuPlacement) -> Result<()> {
        info!("menu at top {}px, left {}px", placement.top, placement.left);
        Ok(())
    }

    fn hide_menu(&mut self) -> Result<()> {
        info!("menu hidden");
        Ok(())
    }

    fn set_menu_palette(&mut self, fill: Rgba, stroke: Rgba) -> Result<()> {
        info!("menu fill {} stroke {}", css_rgba(&fill), css_rgba(&stroke));
        Ok(())
    }
}

fn run_frames(app: &mut OverlayApp, clock: &ManualClock, count: usize) {
    for _ in 0..count {
        clock.advance(FRAME_MS);
        app.on_frame();
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let page_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.reddit.com/".to_string());

    let config = OverlayConfig::load();
    let store = JsonPreferenceStore::at_or_default(config.storage.preferences_path.as_deref())?;
    info!("preferences file: {}", store.path().display());

    let clock = ManualClock::new();
    let view = Rc::new(RefCell::new(LogView {
        border_thickness_px: config.button.border_thickness_px,
    }));
    let mut app = OverlayApp::new(
        config,
        Host {
            view,
            store: Box::new(store),
            probe: Box::new(StaticProbe::absent()),
            clock: clock.clone(),
            page_url,
        },
    )?;

    app.start(PageLayout::new(1280.0, vec![SidebarBox::visible(312.0)]))?;

    info!("-- hover");
    app.pointer_enter();
    run_frames(&mut app, &clock, 20);

    info!("-- click");
    app.pointer_down()?;
    app.pointer_up(PointerButton::Primary)?;
    app.pointer_leave();
    run_frames(&mut app, &clock, 20);

    info!("-- always show");
    app.toggle_button_displayability(false)?;
    run_frames(&mut app, &clock, 20);

    info!("-- menu");
    let header = HeaderMetrics {
        header_height: 49.0,
        tab_menu_bottom: 0.0,
        scroll_y: 0.0,
    };
    app.open_menu(640.0, &header)?;
    app.on_scroll()?;

    // Let the enhancement-suite probe give up and fall back to the URL.
    let wait = (app.config().detection.max_poll_ms / FRAME_MS).ceil() as usize + 1;
    run_frames(&mut app, &clock, wait);
    info!("final flags: {}", app.flags());
    info!("final preferences: {:?}", app.preferences());

    Ok(())
}

//! Presentation seam.
//!
//! The overlay never touches a document directly. Everything it shows goes
//! through an [`OverlayView`]; a browser host maps each call onto element
//! styles, and [`RecordingView`] simply remembers the last value of each.

use std::fmt::Write as _;

use anyhow::Result;
use sidetoggle_config::Rgba;

use crate::layout::{MenuPlacement, MenuShape};

/// Everything the overlay can change on screen.
///
/// Colours are `[r, g, b, a]` with 0-255 channels and 0-1 alpha.
pub trait OverlayView {
    /// Label colour of the button. The border uses the same colour.
    fn set_button_foreground(&mut self, rgba: Rgba) -> Result<()>;

    fn set_button_background(&mut self, rgba: Rgba) -> Result<()>;

    fn set_button_label(&mut self, label: &str) -> Result<()>;

    fn set_button_visible(&mut self, visible: bool) -> Result<()>;

    /// Show or hide every sidebar element on the page.
    fn set_sidebar_visible(&mut self, visible: bool) -> Result<()>;

    /// Track colour of the "always show" switch.
    fn set_toggle_background(&mut self, rgba: Rgba) -> Result<()>;

    /// Horizontal offset of the switch knob, in pixels.
    fn set_knob_position(&mut self, px: f64) -> Result<()>;

    /// Build the menu outline. Called once, before the menu is first shown.
    fn build_menu(&mut self, shape: &MenuShape) -> Result<()>;

    fn place_menu(&mut self, placement: MenuPlacement) -> Result<()>;

    fn hide_menu(&mut self) -> Result<()>;

    fn set_menu_palette(&mut self, fill: Rgba, stroke: Rgba) -> Result<()>;
}

/// CSS `rgba(...)` for a colour; channels rounded, alpha kept as is.
pub fn css_rgba(rgba: &Rgba) -> String {
    let mut out = String::with_capacity(24);
    let _ = write!(
        out,
        "rgba({},{},{},{})",
        rgba[0].round(),
        rgba[1].round(),
        rgba[2].round(),
        rgba[3]
    );
    out
}

/// CSS `border` shorthand for a solid border.
pub fn css_border(thickness_px: f64, rgba: &Rgba) -> String {
    format!("{thickness_px}px solid {}", css_rgba(rgba))
}

/// Last state written through [`OverlayView`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub button_foreground: Option<Rgba>,
    pub button_background: Option<Rgba>,
    pub button_label: Option<String>,
    pub button_visible: Option<bool>,
    pub sidebar_visible: Option<bool>,
    pub toggle_background: Option<Rgba>,
    pub knob_position: Option<f64>,
    pub menu_shape: Option<MenuShape>,
    pub menu: Option<MenuPlacement>,
    pub menu_palette: Option<(Rgba, Rgba)>,
}

/// A view that records state instead of rendering it.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub state: ViewState,
    /// Number of calls made, of any kind.
    pub calls: usize,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }
}

impl OverlayView for RecordingView {
    fn set_button_foreground(&mut self, rgba: Rgba) -> Result<()> {
        self.calls += 1;
        self.state.button_foreground = Some(rgba);
        Ok(())
    }

    fn set_button_background(&mut self, rgba: Rgba) -> Result<()> {
        self.calls += 1;
        self.state.button_background = Some(rgba);
        Ok(())
    }

    fn set_button_label(&mut self, label: &str) -> Result<()> {
        self.calls += 1;
        self.state.button_label = Some(label.to_string());
        Ok(())
    }

    fn set_button_visible(&mut self, visible: bool) -> Result<()> {
        self.calls += 1;
        self.state.button_visible = Some(visible);
        Ok(())
    }

    fn set_sidebar_visible(&mut self, visible: bool) -> Result<()> {
        self.calls += 1;
        self.state.sidebar_visible = Some(visible);
        Ok(())
    }

    fn set_toggle_background(&mut self, rgba: Rgba) -> Result<()> {
        self.calls += 1;
        self.state.toggle_background = Some(rgba);
        Ok(())
    }

    fn set_knob_position(&mut self, px: f64) -> Result<()> {
        self.calls += 1;
        self.state.knob_position = Some(px);
        Ok(())
    }

    fn build_menu(&mut self, shape: &MenuShape) -> Result<()> {
        self.calls += 1;
        self.state.menu_shape = Some(shape.clone());
        Ok(())
    }

    fn place_menu(&mut self, placement: MenuPlacement) -> Result<()> {
        self.calls += 1;
        self.state.menu = Some(placement);
        Ok(())
    }

    fn hide_menu(&mut self) -> Result<()> {
        self.calls += 1;
        self.state.menu = None;
        Ok(())
    }

    fn set_menu_palette(&mut self, fill: Rgba, stroke: Rgba) -> Result<()> {
        self.calls += 1;
        self.state.menu_palette = Some((fill, stroke));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba(&[255.0, 255.0, 255.0, 0.25]), "rgba(255,255,255,0.25)");
        assert_eq!(css_rgba(&[69.6, 187.2, 70.0, 1.0]), "rgba(70,187,70,1)");
    }

    #[test]
    fn test_css_border() {
        assert_eq!(css_border(1.0, &[0.0, 0.0, 0.0, 1.0]), "1px solid rgba(0,0,0,1)");
    }

    #[test]
    fn test_recording_view_tracks_menu() {
        let mut view = RecordingView::new();
        view.place_menu(MenuPlacement { top: 1.0, left: 2.0 }).unwrap();
        assert!(view.state().menu.is_some());
        view.hide_menu().unwrap();
        assert!(view.state().menu.is_none());
        assert_eq!(view.calls, 2);
    }
}

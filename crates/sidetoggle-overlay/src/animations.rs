//! The overlay's animations and the updaters that paint them.

use std::cell::RefCell;
use std::rc::Rc;

use sidetoggle_config::{OverlayConfig, Rgba};
use sidetoggle_core::animation::lab_rgba;
use sidetoggle_core::{AnimationError, AnimationSpec, Animator};

use crate::view::OverlayView;

/// View handle shared between the app and animation updaters.
pub type SharedView = Rc<RefCell<dyn OverlayView>>;

pub const TEXT_COLOR: &str = "Text Color Animation";
pub const BACKGROUND_COLOR: &str = "Background Color Animation";
pub const TOGGLE_BACKGROUND: &str = "Displayability Background Animation";
pub const KNOB_POSITION: &str = "Displayability Button Nob Position Animation";

pub const HOVER_ANIMATIONS: [&str; 2] = [TEXT_COLOR, BACKGROUND_COLOR];
pub const DISPLAY_ANIMATIONS: [&str; 2] = [TOGGLE_BACKGROUND, KNOB_POSITION];

/// Button fade from idle to active alpha. Registered paused.
pub fn register_hover(
    animator: &mut Animator,
    config: &OverlayConfig,
    view: &SharedView,
) -> Result<(), AnimationError> {
    let button = &config.button;
    let anim = &config.animation;

    let target = Rc::clone(view);
    animator.add_animation(
        AnimationSpec::new(
            TEXT_COLOR,
            button.text_rgba(button.idle_alpha),
            button.text_rgba(button.active_alpha),
            anim.hover_frames,
        )
        .interpolator(lab_rgba)
        .easing(anim.hover_easing)
        .active(false)
        .updater(move |_, rgba: Rgba| target.try_borrow_mut()?.set_button_foreground(rgba)),
    )?;

    let target = Rc::clone(view);
    animator.add_animation(
        AnimationSpec::new(
            BACKGROUND_COLOR,
            button.background_rgba(button.idle_alpha),
            button.background_rgba(button.active_alpha),
            anim.hover_frames,
        )
        .interpolator(lab_rgba)
        .easing(anim.hover_easing)
        .active(false)
        .updater(move |_, rgba: Rgba| target.try_borrow_mut()?.set_button_background(rgba)),
    )?;

    Ok(())
}

/// "Always show" switch: track colour and knob slide. Registered paused.
pub fn register_display(
    animator: &mut Animator,
    config: &OverlayConfig,
    view: &SharedView,
) -> Result<(), AnimationError> {
    let anim = &config.animation;

    let target = Rc::clone(view);
    animator.add_animation(
        AnimationSpec::new(
            TOGGLE_BACKGROUND,
            anim.toggle_background_off,
            anim.toggle_background_on,
            anim.toggle_frames,
        )
        .interpolator(lab_rgba)
        .easing(anim.toggle_easing)
        .active(false)
        .updater(move |_, rgba: Rgba| target.try_borrow_mut()?.set_toggle_background(rgba)),
    )?;

    let target = Rc::clone(view);
    animator.add_animation(
        AnimationSpec::new(KNOB_POSITION, anim.knob_off_px, anim.knob_on_px, anim.toggle_frames)
            .linear()
            .easing(anim.toggle_easing)
            .active(false)
            .updater(move |_, px: f64| target.try_borrow_mut()?.set_knob_position(px)),
    )?;

    Ok(())
}

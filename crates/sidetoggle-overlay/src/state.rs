//! Flags the overlay keeps in its [`FlagTree`].

use sidetoggle_core::{FlagDecl, FlagError, FlagStructure, FlagTree};

/// The user hid the sidebar.
pub const HIDE_SIDEBAR: &str = "hideSidebar";
pub const MOUSE_ON_BUTTON: &str = "mouseOnButton";
/// Hover animations are still paused from registration.
pub const HOVER_ANIMATION_NOT_INITIALIZED: &str = "hoverAnimationNotInitialized";
/// Switch animations are still paused from registration.
pub const DISPLAY_OPTION_ANIMATION_NOT_INITIALIZED: &str = "displayOptionAnimationNotInitialized";
/// The enhancement suite was found on the page.
pub const RES_IS_INSTALLED: &str = "resIsInstalled";
pub const IS_NIGHT_MODE: &str = "isNightMode";
/// The "always show" preference.
pub const BUTTON_ALWAYS_DISPLAYED: &str = "buttonAlwaysDisplayed";
pub const BUTTON_IS_DISPLAYED_NOW: &str = "buttonIsDisplayedNow";

/// Built-in flags with their initial values. None of them depend on another.
pub fn builtin_structure() -> FlagStructure {
    [
        (HIDE_SIDEBAR, false),
        (MOUSE_ON_BUTTON, false),
        (HOVER_ANIMATION_NOT_INITIALIZED, true),
        (DISPLAY_OPTION_ANIMATION_NOT_INITIALIZED, true),
        (RES_IS_INSTALLED, false),
        (IS_NIGHT_MODE, false),
        (BUTTON_ALWAYS_DISPLAYED, false),
        (BUTTON_IS_DISPLAYED_NOW, false),
    ]
    .into_iter()
    .fold(FlagStructure::new(), |structure, (name, value)| {
        structure.with(name, FlagDecl::new(value))
    })
}

/// Build the overlay's flag tree: built-ins plus `extra`.
///
/// A flag declared in `extra` replaces the built-in of the same name.
pub fn build_flag_tree(extra: &FlagStructure) -> Result<FlagTree, FlagError> {
    let mut structure = builtin_structure();
    for (name, decl) in &extra.flags {
        structure.flags.insert(name.clone(), decl.clone());
    }
    FlagTree::from_structure(&structure)
}

//! Sidebar toggle configuration system
//!
//! This crate provides centralized configuration for the overlay, loading
//! settings from `sidetoggle.toml` with `SIDETOGGLE_*` environment variable
//! overrides. Every section is optional; missing values fall back to the
//! built-in look and timing of the button.

use serde::{Deserialize, Serialize};
use sidetoggle_core::FlagStructure;
use sidetoggle_core::Easing;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "sidetoggle.toml";

/// RGB triple with 0-255 channels.
pub type Rgb = [f64; 3];

/// RGBA with 0-255 channels and 0-1 alpha.
pub type Rgba = [f64; 4];

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Toggle button look
    pub button: ButtonConfig,
    /// Options menu geometry and palettes
    pub menu: MenuConfig,
    /// Animation timing and endpoints
    pub animation: AnimationConfig,
    /// When the button is needed at all
    pub layout: LayoutConfig,
    /// Enhancement-suite and night-mode detection
    pub detection: DetectionConfig,
    /// Preference persistence
    pub storage: StorageConfig,
    /// Extra flags declared on top of the built-in ones
    pub flags: FlagStructure,
}

/// Toggle button configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ButtonConfig {
    /// Label and border colour
    pub text_rgb: Rgb,
    pub background_rgb: Rgb,
    /// Alpha while the pointer is away
    pub idle_alpha: f64,
    /// Alpha while hovered or pressed
    pub active_alpha: f64,
    pub border_thickness_px: f64,
    /// Label shown while the sidebar is visible
    pub hide_label: String,
    /// Label shown while the sidebar is hidden
    pub show_label: String,
}

/// Options menu configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MenuConfig {
    pub width_px: f64,
    pub height_px: f64,
    pub arrow_height_px: f64,
    pub arrow_half_len_px: f64,
    pub stroke_width_px: f64,
    pub background_day: Rgb,
    pub stroke_day: Rgb,
    pub background_night: Rgb,
    pub stroke_night: Rgb,
    /// Alpha of the menu palette after closing
    pub idle_alpha: f64,
    /// Alpha of the menu palette while open
    pub active_alpha: f64,
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Length of the hover fades, in 60fps frames
    pub hover_frames: f64,
    pub hover_easing: Easing,
    /// Length of the "always show" switch animation, in 60fps frames
    pub toggle_frames: f64,
    pub toggle_easing: Easing,
    /// Switch track colour when off
    pub toggle_background_off: Rgba,
    /// Switch track colour when on
    pub toggle_background_on: Rgba,
    /// Knob offset when off
    pub knob_off_px: f64,
    /// Knob offset when on
    pub knob_on_px: f64,
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Sidebar-to-page width ratio at which the button becomes necessary
    pub side_to_body_ratio: f64,
}

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// How long to keep polling for the enhancement suite
    pub max_poll_ms: f64,
    /// Host prefix that marks a night-mode page when the suite is absent
    pub night_mode_host_prefix: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Preference file; defaults to a file under the user's config directory
    pub preferences_path: Option<PathBuf>,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            text_rgb: [0.0, 0.0, 0.0],
            background_rgb: [255.0, 255.0, 255.0],
            idle_alpha: 0.25,
            active_alpha: 1.0,
            border_thickness_px: 1.0,
            hide_label: "Hide".to_string(),
            show_label: "Show".to_string(),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            width_px: 180.0,
            height_px: 45.0,
            arrow_height_px: 10.0,
            arrow_half_len_px: 7.5,
            stroke_width_px: 1.0,
            background_day: [243.0, 243.0, 243.0],
            stroke_day: [22.0, 22.0, 22.0],
            background_night: [52.0, 52.0, 52.0],
            stroke_night: [243.0, 243.0, 243.0],
            idle_alpha: 0.25,
            active_alpha: 1.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            hover_frames: 15.0,
            hover_easing: Easing::Cosine,
            toggle_frames: 15.0,
            toggle_easing: Easing::Exponential,
            toggle_background_off: [150.0, 150.0, 150.0, 1.0],
            toggle_background_on: [70.0, 187.0, 70.0, 1.0],
            knob_off_px: 2.0,
            knob_on_px: 18.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            side_to_body_ratio: 0.342,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_poll_ms: 5000.0,
            night_mode_host_prefix: "nm.".to_string(),
        }
    }
}

impl ButtonConfig {
    pub fn text_rgba(&self, alpha: f64) -> Rgba {
        with_alpha(self.text_rgb, alpha)
    }

    pub fn background_rgba(&self, alpha: f64) -> Rgba {
        with_alpha(self.background_rgb, alpha)
    }
}

impl MenuConfig {
    /// `(background, stroke)` for the given mode and alpha.
    pub fn palette(&self, night: bool, alpha: f64) -> (Rgba, Rgba) {
        if night {
            (
                with_alpha(self.background_night, alpha),
                with_alpha(self.stroke_night, alpha),
            )
        } else {
            (
                with_alpha(self.background_day, alpha),
                with_alpha(self.stroke_day, alpha),
            )
        }
    }
}

fn with_alpha(rgb: Rgb, alpha: f64) -> Rgba {
    [rgb[0], rgb[1], rgb[2], alpha]
}

impl OverlayConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the sidetoggle.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location (sidetoggle.toml in the
    /// current directory) or return default configuration if that fails
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring unusable config file");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|key| std::env::var(key).ok());
    }

    /// Apply `SIDETOGGLE_*` overrides from an arbitrary lookup.
    ///
    /// Values that do not parse are skipped with a warning.
    pub fn merge_with_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Layout settings
        if let Some(val) = parse_var(&lookup, "SIDETOGGLE_SIDE_TO_BODY_RATIO") {
            self.layout.side_to_body_ratio = val;
        }

        // Animation settings
        if let Some(val) = parse_var(&lookup, "SIDETOGGLE_HOVER_FRAMES") {
            self.animation.hover_frames = val;
        }
        if let Some(val) = parse_var(&lookup, "SIDETOGGLE_TOGGLE_FRAMES") {
            self.animation.toggle_frames = val;
        }

        // Button settings
        if let Some(val) = parse_var(&lookup, "SIDETOGGLE_IDLE_ALPHA") {
            self.button.idle_alpha = val;
        }

        // Detection settings
        if let Some(val) = parse_var(&lookup, "SIDETOGGLE_MAX_POLL_MS") {
            self.detection.max_poll_ms = val;
        }
        if let Some(prefix) = lookup("SIDETOGGLE_NIGHT_MODE_PREFIX") {
            self.detection.night_mode_host_prefix = prefix;
        }

        // Storage settings
        if let Some(path) = lookup("SIDETOGGLE_PREFERENCES_PATH") {
            self.storage.preferences_path = Some(PathBuf::from(path));
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from sidetoggle.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Reject values the overlay cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_frames("animation.hover_frames", self.animation.hover_frames)?;
        check_frames("animation.toggle_frames", self.animation.toggle_frames)?;
        check_alpha("button.idle_alpha", self.button.idle_alpha)?;
        check_alpha("button.active_alpha", self.button.active_alpha)?;
        check_alpha("menu.idle_alpha", self.menu.idle_alpha)?;
        check_alpha("menu.active_alpha", self.menu.active_alpha)?;

        let ratio = self.layout.side_to_body_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "layout.side_to_body_ratio",
                reason: format!("must be in (0, 1], got {ratio}"),
            });
        }
        let menu = &self.menu;
        if !(menu.arrow_height_px >= 0.0 && menu.arrow_height_px < menu.height_px) {
            return Err(ConfigError::Invalid {
                field: "menu.arrow_height_px",
                reason: format!(
                    "must be in [0, menu.height_px = {}), got {}",
                    menu.height_px, menu.arrow_height_px
                ),
            });
        }
        if !(menu.arrow_half_len_px >= 0.0 && 2.0 * menu.arrow_half_len_px <= menu.width_px) {
            return Err(ConfigError::Invalid {
                field: "menu.arrow_half_len_px",
                reason: format!("arrow wider than the menu, got {}", menu.arrow_half_len_px),
            });
        }
        if !(menu.stroke_width_px >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "menu.stroke_width_px",
                reason: format!("must be non-negative, got {}", menu.stroke_width_px),
            });
        }
        if !(self.detection.max_poll_ms >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "detection.max_poll_ms",
                reason: format!("must be non-negative, got {}", self.detection.max_poll_ms),
            });
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

fn check_frames(field: &'static str, frames: f64) -> Result<(), ConfigError> {
    if frames.is_finite() && frames > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("frame count must be finite and positive, got {frames}"),
        })
    }
}

fn check_alpha(field: &'static str, alpha: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("alpha must be in [0, 1], got {alpha}"),
        })
    }
}

//! Configuration file support for penmark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/penmark/config.toml`. Settings include tool defaults, zoom
//! limits, gesture thresholds, eraser feedback, undo depth, autosave timing and the
//! notes store location.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, StorageCompression, StorageMode};
pub use types::{
    AutosaveConfig, DrawingConfig, EraserConfig, GestureConfig, HistoryConfig, StorageConfig,
    ViewportConfig,
};

use crate::input::tool::{MAX_PEN_SIZE, MAX_SIZE, MIN_ERASER_SIZE, MIN_SIZE};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// pen_color = "black"
/// pen_size = 4.0
/// highlighter_opacity = 0.35
///
/// [viewport]
/// min_scale = 0.5
/// max_scale = 5.0
///
/// [eraser]
/// fade_ms = 180
///
/// [autosave]
/// delay_ms = 500
/// mobile_delay_ms = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, schemars::JsonSchema)]
pub struct Config {
    /// Drawing tool defaults (colors, sizes, capture thresholds)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Zoom limits and wheel sensitivity
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Two-finger gesture thresholds
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Eraser fade and preview
    #[serde(default)]
    pub eraser: EraserConfig,

    /// Undo history depth
    #[serde(default)]
    pub history: HistoryConfig,

    /// Autosave debounce delays
    #[serde(default)]
    pub autosave: AutosaveConfig,

    /// Notes store location and file handling
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Clamps `value` into `min..=max`, logging when it had to change.
fn clamp_setting(value: &mut f64, min: f64, max: f64, name: &str) {
    if !value.is_finite() || !(min..=max).contains(&*value) {
        log::warn!("Invalid {} {:.4}, clamping to {}-{} range", name, value, min, max);
        *value = if value.is_finite() { value.clamp(min, max) } else { min };
    }
}

fn clamp_count<T>(value: &mut T, min: T, max: T, name: &str)
where
    T: Ord + Copy + std::fmt::Display,
{
    if !(min..=max).contains(&*value) {
        log::warn!("Invalid {} {}, clamping to {}-{} range", name, value, min, max);
        *value = (*value).clamp(min, max);
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// This method ensures that user-provided config values won't cause degenerate
    /// geometry or runaway timers. Invalid values are clamped to the nearest valid
    /// value and a warning is logged.
    pub fn validate_and_clamp(&mut self) {
        let drawing = &mut self.drawing;
        clamp_setting(&mut drawing.pen_size, MIN_SIZE, MAX_PEN_SIZE, "pen_size");
        clamp_setting(&mut drawing.highlighter_size, MIN_SIZE, MAX_SIZE, "highlighter_size");
        clamp_setting(&mut drawing.highlighter_opacity, 0.05, 1.0, "highlighter_opacity");
        clamp_setting(&mut drawing.eraser_size, MIN_ERASER_SIZE, MAX_SIZE, "eraser_size");
        clamp_setting(&mut drawing.min_point_distance, 0.0, 50.0, "min_point_distance");
        clamp_setting(&mut drawing.interpolation_distance, 0.0, 200.0, "interpolation_distance");
        if drawing.interpolation_distance < drawing.min_point_distance {
            log::warn!(
                "interpolation_distance {:.1} is below min_point_distance {:.1}; raising it",
                drawing.interpolation_distance,
                drawing.min_point_distance
            );
            drawing.interpolation_distance = drawing.min_point_distance;
        }

        let viewport = &mut self.viewport;
        clamp_setting(&mut viewport.min_scale, 0.1, 1.0, "min_scale");
        clamp_setting(&mut viewport.max_scale, 1.0, 20.0, "max_scale");
        clamp_setting(&mut viewport.zoom_step, 1.01, 4.0, "zoom_step");
        clamp_setting(&mut viewport.rest_snap_threshold, 1.0, 1.5, "rest_snap_threshold");
        clamp_setting(&mut viewport.wheel_sensitivity, 0.0001, 0.05, "wheel_sensitivity");

        let gesture = &mut self.gesture;
        clamp_setting(&mut gesture.min_pinch_separation, 0.0, 400.0, "min_pinch_separation");
        clamp_setting(&mut gesture.zoom_threshold, 0.0, 200.0, "zoom_threshold");
        clamp_setting(&mut gesture.pan_threshold, 0.0, 200.0, "pan_threshold");
        clamp_setting(&mut gesture.pan_dead_zone, 0.0, 50.0, "pan_dead_zone");
        clamp_setting(&mut gesture.rest_pan_min_distance, 0.0, 200.0, "rest_pan_min_distance");

        clamp_count(&mut self.eraser.fade_ms, 0, 2_000, "fade_ms");
        clamp_setting(&mut self.eraser.preview_opacity, 0.0, 1.0, "preview_opacity");

        clamp_count(&mut self.history.max_depth, 0, 10_000, "max_depth");

        clamp_count(&mut self.autosave.delay_ms, 50, 60_000, "autosave delay_ms");
        clamp_count(&mut self.autosave.mobile_delay_ms, 50, 60_000, "autosave mobile_delay_ms");

        clamp_count(&mut self.storage.auto_compress_threshold_kb, 1, 1_048_576, "auto_compress_threshold_kb");
        clamp_count(&mut self.storage.max_file_size_mb, 1, 1_024, "max_file_size_mb");
        clamp_count(&mut self.storage.backup_retention, 0, 10, "backup_retention");
    }

    /// Returns the directory holding the config file (`~/.config/penmark`).
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not find config directory")?
            .join("penmark"))
    }

    /// Returns the path to the configuration file.
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to `config_path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema of the config file, for editor integration.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

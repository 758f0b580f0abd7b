//! Configuration type definitions.

use super::enums::{ColorSpec, StorageCompression, StorageMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing tool defaults.
///
/// Controls the tool parameters a fresh workspace starts with. Hosts can change
/// them at runtime through the per-tool setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Pen color - a named color, a hex string like `"#1e88e5"`, or an RGB array
    #[serde(default = "default_pen_color")]
    pub pen_color: ColorSpec,

    /// Pen width in model units (valid range: 1.0 - 50.0)
    #[serde(default = "default_pen_size")]
    pub pen_size: f64,

    /// Highlighter color
    #[serde(default = "default_highlighter_color")]
    pub highlighter_color: ColorSpec,

    /// Highlighter width in model units (valid range: 1.0 - 200.0)
    #[serde(default = "default_highlighter_size")]
    pub highlighter_size: f64,

    /// Highlighter opacity (valid range: 0.05 - 1.0)
    #[serde(default = "default_highlighter_opacity")]
    pub highlighter_opacity: f64,

    /// Eraser diameter in screen pixels (valid range: 4.0 - 200.0)
    #[serde(default = "default_eraser_size")]
    pub eraser_size: f64,

    /// Pointer samples closer than this to the previous point are dropped
    #[serde(default = "default_min_point_distance")]
    pub min_point_distance: f64,

    /// Gaps wider than this between samples get a midpoint inserted
    #[serde(default = "default_interpolation_distance")]
    pub interpolation_distance: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            pen_color: default_pen_color(),
            pen_size: default_pen_size(),
            highlighter_color: default_highlighter_color(),
            highlighter_size: default_highlighter_size(),
            highlighter_opacity: default_highlighter_opacity(),
            eraser_size: default_eraser_size(),
            min_point_distance: default_min_point_distance(),
            interpolation_distance: default_interpolation_distance(),
        }
    }
}

/// Zoom bounds and wheel behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ViewportConfig {
    /// Smallest zoom factor (valid range: 0.1 - 1.0)
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,

    /// Largest zoom factor (valid range: 1.0 - 20.0)
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,

    /// Factor applied by one zoom in/out button press
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,

    /// Zoom factors at or below this snap back to the origin when zooming out
    #[serde(default = "default_rest_snap_threshold")]
    pub rest_snap_threshold: f64,

    /// Exponential zoom factor per wheel pixel
    #[serde(default = "default_wheel_sensitivity")]
    pub wheel_sensitivity: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            zoom_step: default_zoom_step(),
            rest_snap_threshold: default_rest_snap_threshold(),
            wheel_sensitivity: default_wheel_sensitivity(),
        }
    }
}

/// Two-finger gesture classification thresholds, in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GestureConfig {
    /// Fingers closer than this never start a pinch or pan
    #[serde(default = "default_min_pinch_separation")]
    pub min_pinch_separation: f64,

    /// Finger distance change that commits the gesture to zoom
    #[serde(default = "default_zoom_threshold")]
    pub zoom_threshold: f64,

    /// Midpoint movement that commits the gesture to pan
    #[serde(default = "default_pan_threshold")]
    pub pan_threshold: f64,

    /// Pan movements below this are ignored
    #[serde(default = "default_pan_dead_zone")]
    pub pan_dead_zone: f64,

    /// Minimum pan movement while the canvas is not zoomed
    #[serde(default = "default_rest_pan_min_distance")]
    pub rest_pan_min_distance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_pinch_separation: default_min_pinch_separation(),
            zoom_threshold: default_zoom_threshold(),
            pan_threshold: default_pan_threshold(),
            pan_dead_zone: default_pan_dead_zone(),
            rest_pan_min_distance: default_rest_pan_min_distance(),
        }
    }
}

/// Eraser feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EraserConfig {
    /// Fade-out duration of erased strokes in milliseconds (0 removes immediately)
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,

    /// Opacity multiplier for strokes under the eraser cursor
    #[serde(default = "default_preview_opacity")]
    pub preview_opacity: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            fade_ms: default_fade_ms(),
            preview_opacity: default_preview_opacity(),
        }
    }
}

/// Undo history limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Maximum undo steps kept per page (0 = unlimited)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Autosave debounce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AutosaveConfig {
    /// Delay after the last edit before saving, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Longer delay used on mobile devices
    #[serde(default = "default_mobile_delay_ms")]
    pub mobile_delay_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            mobile_delay_ms: default_mobile_delay_ms(),
        }
    }
}

/// On-disk notes store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Where to keep the notes file
    #[serde(default)]
    pub storage: StorageMode,

    /// Directory used when `storage = "custom"` (`~/` is expanded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_directory: Option<String>,

    /// Gzip the notes file (auto, on, off)
    #[serde(default)]
    pub compress: StorageCompression,

    /// Payload size above which `auto` compression kicks in
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Files larger than this are neither written nor loaded
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Keep the previous notes file as `.bak` (0 disables)
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage: StorageMode::default(),
            custom_directory: None,
            compress: StorageCompression::default(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            max_file_size_mb: default_max_file_size_mb(),
            backup_retention: default_backup_retention(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_pen_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_pen_size() -> f64 {
    4.0
}

fn default_highlighter_color() -> ColorSpec {
    ColorSpec::Name("#ffeb3b".to_string())
}

fn default_highlighter_size() -> f64 {
    20.0
}

fn default_highlighter_opacity() -> f64 {
    crate::draw::stroke::HIGHLIGHTER_OPACITY
}

fn default_eraser_size() -> f64 {
    20.0
}

fn default_min_point_distance() -> f64 {
    2.0
}

fn default_interpolation_distance() -> f64 {
    5.0
}

fn default_min_scale() -> f64 {
    0.5
}

fn default_max_scale() -> f64 {
    5.0
}

fn default_zoom_step() -> f64 {
    1.2
}

fn default_rest_snap_threshold() -> f64 {
    1.05
}

fn default_wheel_sensitivity() -> f64 {
    0.0015
}

fn default_min_pinch_separation() -> f64 {
    40.0
}

fn default_zoom_threshold() -> f64 {
    10.0
}

fn default_pan_threshold() -> f64 {
    10.0
}

fn default_pan_dead_zone() -> f64 {
    2.0
}

fn default_rest_pan_min_distance() -> f64 {
    8.0
}

fn default_fade_ms() -> u64 {
    180
}

fn default_preview_opacity() -> f64 {
    0.3
}

fn default_max_depth() -> usize {
    100
}

fn default_delay_ms() -> u64 {
    500
}

fn default_mobile_delay_ms() -> u64 {
    2000
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_backup_retention() -> usize {
    1
}

//! Configuration enum types.

use crate::draw::{Color, color::*};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - a named color, a hex string or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// pen_color = "blue"
///
/// # Hex string
/// pen_color = "#1e88e5"
///
/// # Custom RGB color (0-255 per component)
/// pen_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black) or `#rrggbb`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Names are looked up with `util::name_to_color()`, then parsed as hex.
    /// Anything unrecognised falls back to `fallback` with a warning.
    pub fn to_color_or(&self, fallback: Color) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name)
                .or_else(|| Color::from_hex(name))
                .unwrap_or_else(|| {
                    warn!("Unknown color '{}', using {}", name, fallback.to_hex());
                    fallback
                }),
            ColorSpec::Rgb([r, g, b]) => Color {
                r: *r as f64 / 255.0,
                g: *g as f64 / 255.0,
                b: *b as f64 / 255.0,
                a: 1.0,
            },
        }
    }

    /// Hex string as stored on strokes.
    pub fn to_hex_or(&self, fallback: Color) -> String {
        self.to_color_or(fallback).to_hex()
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Name("black".to_string())
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Name(color.to_hex())
    }
}

/// Where the notes store lives.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// `$XDG_DATA_HOME/penmark`, falling back to the config directory
    #[default]
    Auto,
    /// Next to the config file
    Config,
    /// `storage.custom_directory`
    Custom,
}

/// Compression preference for the notes file.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageCompression {
    /// Compress once the payload exceeds `auto_compress_threshold_kb`
    #[default]
    Auto,
    On,
    Off,
}

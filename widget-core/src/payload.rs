//! Type-specific configuration payloads carried by [`ElementKind`](crate::ElementKind)
//! variants.

use serde::{Deserialize, Serialize};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    Left,
    /// Center within the box.
    #[default]
    Center,
    /// Align to the right edge.
    Right,
}

/// Typography for `text` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in canvas units.
    pub font_size: f32,
    /// Numeric font weight (100-900).
    pub font_weight: u16,
    /// Text color as hex.
    pub color: String,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Line height multiplier.
    #[serde(default = "TextStyle::default_line_height")]
    pub line_height: f32,
    /// Extra spacing between glyphs.
    #[serde(default)]
    pub letter_spacing: f32,
}

impl TextStyle {
    const fn default_line_height() -> f32 {
        1.2
    }

    /// Text style with the given size and defaults elsewhere.
    #[must_use]
    pub fn sized(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "System".to_string(),
            font_size: 24.0,
            font_weight: 400,
            color: "#FFFFFF".to_string(),
            align: TextAlign::Center,
            line_height: Self::default_line_height(),
            letter_spacing: 0.0,
        }
    }
}

/// Configuration shared by analog and digital clocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockConfig {
    /// IANA timezone; `None` follows the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Use a 24-hour display.
    pub use_24_hour: bool,
    /// Show the seconds hand / digits.
    pub show_seconds: bool,
    /// Show the date under the time.
    #[serde(default)]
    pub show_date: bool,
    /// Primary color (digits, hands).
    pub color: String,
    /// Accent color (seconds hand, separators).
    pub accent_color: String,
    /// Font family for digits.
    #[serde(default = "ClockConfig::default_font")]
    pub font_family: String,
}

impl ClockConfig {
    fn default_font() -> String {
        "System".to_string()
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            use_24_hour: true,
            show_seconds: false,
            show_date: false,
            color: "#FFFFFF".to_string(),
            accent_color: "#FF3B30".to_string(),
            font_family: Self::default_font(),
        }
    }
}

/// Layout of text drawn along a circular arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvedTextConfig {
    /// Arc radius in canvas units.
    pub radius: f32,
    /// Start angle in degrees, clockwise from 12 o'clock.
    pub start_angle: f32,
    /// Font size in canvas units.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Text color as hex.
    pub color: String,
    /// Extra spacing between glyphs.
    #[serde(default)]
    pub letter_spacing: f32,
    /// Draw on the inside of the arc.
    #[serde(default)]
    pub inside: bool,
}

impl Default for CurvedTextConfig {
    fn default() -> Self {
        Self {
            radius: 80.0,
            start_angle: -90.0,
            font_size: 18.0,
            font_family: "System".to_string(),
            color: "#FFFFFF".to_string(),
            letter_spacing: 0.0,
            inside: false,
        }
    }
}

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Linear gradient along `angle`.
    #[default]
    Linear,
    /// Radial gradient from the center.
    Radial,
}

/// A single color stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in `0.0..=1.0`.
    pub offset: f32,
    /// Color as hex.
    pub color: String,
}

/// Gradient fill definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientConfig {
    /// Linear or radial.
    pub kind: GradientKind,
    /// Angle in degrees for linear gradients.
    #[serde(default)]
    pub angle: f32,
    /// Color stops, ordered by offset.
    pub stops: Vec<GradientStop>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle: 90.0,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: "#4FACFE".to_string(),
                },
                GradientStop {
                    offset: 1.0,
                    color: "#00F2FE".to_string(),
                },
            ],
        }
    }
}

/// Non-destructive adjustments applied to `image` elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilterConfig {
    /// Brightness multiplier (1.0 = unchanged).
    pub brightness: f32,
    /// Contrast multiplier (1.0 = unchanged).
    pub contrast: f32,
    /// Saturation multiplier (1.0 = unchanged).
    pub saturation: f32,
    /// Gaussian blur radius.
    #[serde(default)]
    pub blur: f32,
    /// Render in grayscale.
    #[serde(default)]
    pub grayscale: bool,
    /// Optional tint color as hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<String>,
}

impl Default for ImageFilterConfig {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            blur: 0.0,
            grayscale: false,
            tint: None,
        }
    }
}

/// A vertex of a path, in element-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// X offset from the element origin.
    pub x: f32,
    /// Y offset from the element origin.
    pub y: f32,
}

/// Polyline or polygon geometry for `path` elements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    /// Vertices in drawing order.
    pub points: Vec<PathPoint>,
    /// Close the path back to the first point.
    #[serde(default)]
    pub closed: bool,
    /// Smooth the path through the points.
    #[serde(default)]
    pub smooth: bool,
}

//! Common visual properties shared by every element type.
//!
//! The engine treats these as opaque payloads: it stores and merges them but
//! never interprets colors or draws anything.

use serde::{Deserialize, Serialize};

/// Corner treatment applied together with `corner_radius`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerFamily {
    /// Circular arcs.
    #[default]
    Round,
    /// Continuous (superellipse) corners.
    Squircle,
    /// Straight chamfered corners.
    Cut,
}

/// Outline drawn around the element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Stroke color as hex.
    pub color: String,
    /// Stroke width in canvas units.
    pub width: f32,
    /// Dash pattern; empty means solid.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f32>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 1.0,
            dash: Vec::new(),
        }
    }
}

/// Drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    /// Shadow color as hex (alpha allowed).
    pub color: String,
    /// Horizontal offset.
    pub offset_x: f32,
    /// Vertical offset.
    pub offset_y: f32,
    /// Blur radius.
    pub blur: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: "#00000080".to_string(),
            offset_x: 0.0,
            offset_y: 2.0,
            blur: 4.0,
        }
    }
}

/// Visual style common to all elements. Which fields matter depends on the
/// element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Fill color as hex.
    pub fill: String,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Corner radius in canvas units.
    #[serde(default)]
    pub corner_radius: f32,
    /// Corner family.
    #[serde(default)]
    pub corner_family: CornerFamily,
    /// Optional outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    /// Optional drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: "#FFFFFF".to_string(),
            opacity: 1.0,
            corner_radius: 0.0,
            corner_family: CornerFamily::Round,
            stroke: None,
            shadow: None,
        }
    }
}

impl Style {
    /// Create a style with the given fill color.
    #[must_use]
    pub fn filled(fill: impl Into<String>) -> Self {
        Self {
            fill: fill.into(),
            ..Self::default()
        }
    }
}

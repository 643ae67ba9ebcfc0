//! Partial element updates with explicit merge contracts.
//!
//! Every field of a patch is optional; `None` leaves the target untouched.
//! Each sub-object documents whether it is *merged* field by field or
//! *replaced* wholesale.
//! Nullable targets (`stroke`, `shadow`, `animation`) use a double option:
//! a missing key keeps the value, an explicit `null` clears it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::element::{Element, ElementKind, Transform};
use crate::payload::{
    ClockConfig, CurvedTextConfig, GradientConfig, ImageFilterConfig, PathData, TextAlign,
    TextStyle,
};
use crate::style::{CornerFamily, Shadow, Stroke, Style};

/// Deserialize a field so that `null` becomes `Some(None)` and a missing
/// field (via `#[serde(default)]`) stays `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Field-wise merge into a [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformPatch {
    /// New X position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// New Y position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// New rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    /// New horizontal scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f32>,
    /// New vertical scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f32>,
}

impl TransformPatch {
    /// Patch that only changes the size.
    #[must_use]
    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that only changes the position.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The transform that results from applying this patch to `base`.
    #[must_use]
    pub fn applied_to(&self, base: &Transform) -> Transform {
        Transform {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            rotation: self.rotation.unwrap_or(base.rotation),
            scale_x: self.scale_x.unwrap_or(base.scale_x),
            scale_y: self.scale_y.unwrap_or(base.scale_y),
        }
    }
}

impl From<Transform> for TransformPatch {
    fn from(t: Transform) -> Self {
        Self {
            x: Some(t.x),
            y: Some(t.y),
            width: Some(t.width),
            height: Some(t.height),
            rotation: Some(t.rotation),
            scale_x: Some(t.scale_x),
            scale_y: Some(t.scale_y),
        }
    }
}

/// Field-wise merge into a [`Style`]. `stroke` and `shadow` replace the whole
/// sub-object; `null` removes it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    /// New fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// New opacity, clamped to `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// New corner radius, clamped to be non-negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    /// New corner family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_family: Option<CornerFamily>,
    /// Replacement stroke, or `Some(None)` to remove it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke: Option<Option<Stroke>>,
    /// Replacement shadow, or `Some(None)` to remove it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub shadow: Option<Option<Shadow>>,
}

impl StylePatch {
    /// Merge into `style`.
    pub fn apply(&self, style: &mut Style) {
        if let Some(fill) = &self.fill {
            style.fill.clone_from(fill);
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(radius) = self.corner_radius {
            style.corner_radius = radius.max(0.0);
        }
        if let Some(family) = self.corner_family {
            style.corner_family = family;
        }
        if let Some(stroke) = &self.stroke {
            style.stroke.clone_from(stroke);
        }
        if let Some(shadow) = &self.shadow {
            style.shadow.clone_from(shadow);
        }
    }
}

/// Field-wise merge into a [`TextStyle`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStylePatch {
    /// New font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// New font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// New font weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    /// New text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    /// New line height multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    /// New letter spacing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,
}

impl TextStylePatch {
    /// Merge into `text_style`.
    pub fn apply(&self, text_style: &mut TextStyle) {
        if let Some(family) = &self.font_family {
            text_style.font_family.clone_from(family);
        }
        if let Some(size) = self.font_size {
            text_style.font_size = size;
        }
        if let Some(weight) = self.font_weight {
            text_style.font_weight = weight;
        }
        if let Some(color) = &self.color {
            text_style.color.clone_from(color);
        }
        if let Some(align) = self.align {
            text_style.align = align;
        }
        if let Some(line_height) = self.line_height {
            text_style.line_height = line_height;
        }
        if let Some(spacing) = self.letter_spacing {
            text_style.letter_spacing = spacing;
        }
    }
}

/// Update of the type-specific payload. The variant must match the element's
/// kind; a mismatched patch is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentPatch {
    /// Text: content replaced, typography merged.
    Text {
        /// Replacement content.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Typography merge.
        #[serde(
            default,
            rename = "textStyle",
            skip_serializing_if = "Option::is_none"
        )]
        text_style: Option<TextStylePatch>,
    },
    /// Curved text: content and layout each replaced.
    CurvedText {
        /// Replacement content.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Replacement layout.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<CurvedTextConfig>,
    },
    /// Image: source and filter each replaced.
    Image {
        /// Replacement source.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        /// Replacement filter.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<ImageFilterConfig>,
    },
    /// Analog or digital clock: configuration replaced.
    Clock {
        /// Replacement configuration.
        clock: ClockConfig,
    },
    /// Gradient: definition replaced.
    Gradient {
        /// Replacement definition.
        config: GradientConfig,
    },
    /// Path: geometry replaced.
    Path {
        /// Replacement geometry.
        path: PathData,
    },
    /// Script widget: script text and refresh interval each replaced.
    Script {
        /// Replacement script.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        script: Option<String>,
        /// Replacement interval in seconds (at least 1).
        #[serde(
            default,
            rename = "scriptRefreshSec",
            skip_serializing_if = "Option::is_none"
        )]
        refresh_sec: Option<u32>,
    },
}

impl ContentPatch {
    /// Apply to `kind`. Returns `false` when the variant does not match.
    pub fn apply(&self, kind: &mut ElementKind) -> bool {
        match (self, kind) {
            (
                Self::Text {
                    content,
                    text_style,
                },
                ElementKind::Text {
                    content: target,
                    text_style: target_style,
                },
            ) => {
                if let Some(content) = content {
                    target.clone_from(content);
                }
                if let Some(patch) = text_style {
                    patch.apply(target_style);
                }
                true
            }
            (
                Self::CurvedText { content, config },
                ElementKind::CurvedText {
                    content: target,
                    config: target_config,
                },
            ) => {
                if let Some(content) = content {
                    target.clone_from(content);
                }
                if let Some(config) = config {
                    target_config.clone_from(config);
                }
                true
            }
            (
                Self::Image { src, filter },
                ElementKind::Image {
                    src: target,
                    filter: target_filter,
                },
            ) => {
                if let Some(src) = src {
                    target.clone_from(src);
                }
                if let Some(filter) = filter {
                    target_filter.clone_from(filter);
                }
                true
            }
            (
                Self::Clock { clock },
                ElementKind::AnalogClock { clock: target } | ElementKind::DigitalClock { clock: target },
            ) => {
                target.clone_from(clock);
                true
            }
            (Self::Gradient { config }, ElementKind::Gradient { config: target }) => {
                target.clone_from(config);
                true
            }
            (Self::Path { path }, ElementKind::Path { path: target }) => {
                target.clone_from(path);
                true
            }
            (
                Self::Script {
                    script,
                    refresh_sec,
                },
                ElementKind::ScriptWidget {
                    script: target,
                    refresh_sec: target_refresh,
                },
            ) => {
                if let Some(script) = script {
                    target.clone_from(script);
                }
                if let Some(refresh) = refresh_sec {
                    *target_refresh = (*refresh).max(1);
                }
                true
            }
            _ => false,
        }
    }
}

/// A partial update of one element, as dispatched by `UPDATE_ELEMENT`.
///
/// `name` and `visible` replace; `transform`, `style` and the text typography
/// merge field by field; `animation` replaces (explicit `null` clears).
/// `locked` is absent: lock state changes only through `SET_LOCKED`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    /// Replacement display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Transform merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformPatch>,
    /// Style merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StylePatch>,
    /// Replacement visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Replacement animation, or `Some(None)` to remove it.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub animation: Option<Option<serde_json::Value>>,
    /// Payload update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentPatch>,
}

impl ElementPatch {
    /// Patch that only renames.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Patch that only merges style fields.
    #[must_use]
    pub fn style(style: StylePatch) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// Patch that only merges transform fields.
    #[must_use]
    pub fn transform(transform: TransformPatch) -> Self {
        Self {
            transform: Some(transform),
            ..Self::default()
        }
    }

    /// Patch that only updates the payload.
    #[must_use]
    pub fn content(content: ContentPatch) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    /// Apply every non-geometric field to `element`. The transform is left
    /// to the caller, which owns size clamping and group geometry.
    pub fn apply_non_geometric(&self, element: &mut Element) {
        if let Some(name) = &self.name {
            element.name.clone_from(name);
        }
        if let Some(style) = &self.style {
            style.apply(&mut element.style);
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(animation) = &self.animation {
            element.animation.clone_from(animation);
        }
        if let Some(content) = &self.content {
            if !content.apply(&mut element.kind) {
                tracing::trace!(
                    "Ignoring content patch for {} element {}",
                    element.element_type(),
                    element.id
                );
            }
        }
    }
}

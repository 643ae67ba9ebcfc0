//! Canvas elements - the building blocks of a widget.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payload::{
    ClockConfig, CurvedTextConfig, GradientConfig, ImageFilterConfig, PathData, TextStyle,
};
use crate::style::Style;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and size in canvas coordinates (not normalized).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// X position (canvas units from the left).
    pub x: f32,
    /// Y position (canvas units from the top).
    pub y: f32,
    /// Width in canvas units.
    pub width: f32,
    /// Height in canvas units.
    pub height: f32,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Horizontal scale factor.
    #[serde(default = "Transform::unit_scale")]
    pub scale_x: f32,
    /// Vertical scale factor.
    #[serde(default = "Transform::unit_scale")]
    pub scale_y: f32,
}

impl Transform {
    const fn unit_scale() -> f32 {
        1.0
    }

    /// Axis-aligned transform at `(x, y)` with the given size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The shorter side of the box.
    #[must_use]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Check if a point is within the unrotated box.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Clamp width and height to at least `min`.
    pub fn clamp_size(&mut self, min: f32) {
        self.width = self.width.max(min);
        self.height = self.height.max(min);
    }

    /// Whether every field is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.x,
            self.y,
            self.width,
            self.height,
            self.rotation,
            self.scale_x,
            self.scale_y,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Clamp the size to `min`, or `None` when any field is not finite.
    #[must_use]
    pub fn sanitized(mut self, min: f32) -> Option<Self> {
        self.clamp_size(min);
        self.is_finite().then_some(self)
    }

    /// Shift by `(dx, dy)`, or `None` when the result overflows.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Option<Self> {
        let moved = Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        };
        moved.is_finite().then_some(moved)
    }

    /// Replace non-finite fields with neutral values: origin, `min` size,
    /// no rotation, unit scale.
    pub fn replace_non_finite(&mut self, min: f32) {
        let fix = |v: &mut f32, fallback: f32| {
            if !v.is_finite() {
                *v = fallback;
            }
        };
        fix(&mut self.x, 0.0);
        fix(&mut self.y, 0.0);
        fix(&mut self.width, min);
        fix(&mut self.height, min);
        fix(&mut self.rotation, 0.0);
        fix(&mut self.scale_x, 1.0);
        fix(&mut self.scale_y, 1.0);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

/// Discriminant of [`ElementKind`], for queries and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    /// Rectangle shape.
    Rectangle,
    /// Ellipse shape.
    Ellipse,
    /// Text block.
    Text,
    /// Bitmap image.
    Image,
    /// Path or line.
    Path,
    /// Analog clock face.
    AnalogClock,
    /// Digital clock readout.
    DigitalClock,
    /// Text along an arc.
    CurvedText,
    /// Gradient fill.
    Gradient,
    /// Script-driven content.
    ScriptWidget,
    /// Group of child elements.
    Group,
}

impl ElementType {
    /// Default display label for new elements of this type.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::Ellipse => "Ellipse",
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Path => "Path",
            Self::AnalogClock => "Analog Clock",
            Self::DigitalClock => "Digital Clock",
            Self::CurvedText => "Curved Text",
            Self::Gradient => "Gradient",
            Self::ScriptWidget => "Script",
            Self::Group => "Group",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The type of an element together with its type-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ElementKind {
    /// A rectangle; drawn entirely from [`Style`].
    Rectangle,

    /// An ellipse inscribed in the transform box.
    Ellipse,

    /// A text block. `content` may contain `{namespace.key}` binding tokens.
    Text {
        /// Raw text content, tokens unresolved.
        content: String,
        /// Typography.
        #[serde(rename = "textStyle")]
        text_style: TextStyle,
    },

    /// A bitmap image.
    Image {
        /// Image source URI or base64 data.
        src: String,
        /// Image adjustments.
        #[serde(default)]
        filter: ImageFilterConfig,
    },

    /// A polyline or polygon.
    Path {
        /// Path geometry.
        path: PathData,
    },

    /// An analog clock face.
    AnalogClock {
        /// Clock options.
        clock: ClockConfig,
    },

    /// A digital clock readout.
    DigitalClock {
        /// Clock options.
        clock: ClockConfig,
    },

    /// Text laid out along an arc.
    CurvedText {
        /// Text content.
        content: String,
        /// Arc layout.
        config: CurvedTextConfig,
    },

    /// A gradient-filled box.
    Gradient {
        /// Gradient definition.
        config: GradientConfig,
    },

    /// Content computed by an external script runtime.
    ScriptWidget {
        /// Opaque script source.
        script: String,
        /// Re-execution interval in seconds.
        #[serde(rename = "scriptRefreshSec")]
        refresh_sec: u32,
    },

    /// A group owning an ordered list of children (back to front).
    Group {
        /// Child element IDs in relative paint order.
        children: Vec<ElementId>,
    },
}

impl ElementKind {
    /// The discriminant of this kind.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Rectangle => ElementType::Rectangle,
            Self::Ellipse => ElementType::Ellipse,
            Self::Text { .. } => ElementType::Text,
            Self::Image { .. } => ElementType::Image,
            Self::Path { .. } => ElementType::Path,
            Self::AnalogClock { .. } => ElementType::AnalogClock,
            Self::DigitalClock { .. } => ElementType::DigitalClock,
            Self::CurvedText { .. } => ElementType::CurvedText,
            Self::Gradient { .. } => ElementType::Gradient,
            Self::ScriptWidget { .. } => ElementType::ScriptWidget,
            Self::Group { .. } => ElementType::Group,
        }
    }

    /// Plain text element with the given content and font size.
    #[must_use]
    pub fn text(content: impl Into<String>, font_size: f32) -> Self {
        Self::Text {
            content: content.into(),
            text_style: TextStyle::sized(font_size),
        }
    }

    /// Children of a group, empty for every other kind.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        match self {
            Self::Group { children } => children,
            _ => &[],
        }
    }

    /// Whether this kind is a group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }
}

/// A canvas element with content, geometry and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier, immutable for the element's lifetime.
    pub id: ElementId,
    /// Display label; not unique.
    pub name: String,
    /// Position and size.
    pub transform: Transform,
    /// Common visual properties.
    #[serde(default)]
    pub style: Style,
    /// Element type and payload.
    pub kind: ElementKind,
    /// Whether the element is rendered.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether the element rejects edits.
    #[serde(default)]
    pub locked: bool,
    /// Presentation effect descriptor, opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<serde_json::Value>,
}

const fn default_true() -> bool {
    true
}

impl Element {
    /// Create a new element with a fresh id and default settings.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        ElementDraft::new(kind).into_element(ElementId::new())
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// The element's type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Whether this element is a group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.transform.contains_point(x, y)
    }

    /// Font size for `text` elements.
    #[must_use]
    pub fn font_size(&self) -> Option<f32> {
        match &self.kind {
            ElementKind::Text { text_style, .. } => Some(text_style.font_size),
            _ => None,
        }
    }
}

/// A fully specified element lacking only its id; the input of an add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraft {
    /// Display label.
    pub name: String,
    /// Position and size.
    pub transform: Transform,
    /// Common visual properties.
    #[serde(default)]
    pub style: Style,
    /// Element type and payload.
    pub kind: ElementKind,
    /// Whether the element is rendered.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether the element rejects edits.
    #[serde(default)]
    pub locked: bool,
    /// Presentation effect descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<serde_json::Value>,
}

impl ElementDraft {
    /// Draft of the given kind, named after its type, at the default transform.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            name: kind.element_type().label().to_string(),
            transform: Transform::default(),
            style: Style::default(),
            kind,
            visible: true,
            locked: false,
            animation: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the lock flag.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Materialize the draft under the given id.
    #[must_use]
    pub fn into_element(self, id: ElementId) -> Element {
        Element {
            id,
            name: self.name,
            transform: self.transform,
            style: self.style,
            kind: self.kind,
            visible: self.visible,
            locked: self.locked,
            animation: self.animation,
        }
    }
}

impl From<Element> for ElementDraft {
    fn from(element: Element) -> Self {
        Self {
            name: element.name,
            transform: element.transform,
            style: element.style,
            kind: element.kind,
            visible: element.visible,
            locked: element.locked,
            animation: element.animation,
        }
    }
}

//! Built-in starting points for new widgets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::document::CanvasSize;
use crate::element::{Element, ElementDraft, ElementId, ElementKind, Transform};
use crate::payload::{ClockConfig, TextStyle};
use crate::schema::WidgetDocument;
use crate::style::Style;
use crate::CanvasError;

/// A built-in widget template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Template {
    /// Empty canvas.
    #[default]
    Blank,
    /// Background plus a centered digital clock.
    DigitalClock,
    /// Background plus an analog clock face.
    AnalogClock,
    /// Background, a greeting bound to the time of day and the date.
    Greeting,
}

impl Template {
    /// Every template, in display order.
    pub const ALL: [Self; 4] = [
        Self::Blank,
        Self::DigitalClock,
        Self::AnalogClock,
        Self::Greeting,
    ];

    /// Kebab-case name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::DigitalClock => "digital-clock",
            Self::AnalogClock => "analog-clock",
            Self::Greeting => "greeting",
        }
    }

    /// Build the template's document for a canvas of `canvas_size`.
    ///
    /// Element geometry is laid out relative to the canvas so every template
    /// fits any valid size.
    #[must_use]
    pub fn build(self, canvas_size: CanvasSize) -> WidgetDocument {
        let CanvasSize { width, height } = canvas_size;
        let full = Transform::new(0.0, 0.0, width, height);
        let drafts = match self {
            Self::Blank => Vec::new(),
            Self::DigitalClock => vec![
                background(full, "#1C1C1E"),
                ElementDraft::new(ElementKind::DigitalClock {
                    clock: ClockConfig {
                        show_date: true,
                        ..ClockConfig::default()
                    },
                })
                .with_name("Clock")
                .with_transform(Transform::new(
                    width * 0.1,
                    height * 0.35,
                    width * 0.8,
                    height * 0.3,
                )),
            ],
            Self::AnalogClock => {
                let side = width.min(height) * 0.8;
                vec![
                    background(full, "#000000"),
                    ElementDraft::new(ElementKind::AnalogClock {
                        clock: ClockConfig {
                            show_seconds: true,
                            ..ClockConfig::default()
                        },
                    })
                    .with_name("Clock")
                    .with_transform(Transform::new(
                        (width - side) / 2.0,
                        (height - side) / 2.0,
                        side,
                        side,
                    )),
                ]
            }
            Self::Greeting => vec![
                background(full, "#2C3E50"),
                ElementDraft::new(ElementKind::Text {
                    content: "Good {time.period}".to_string(),
                    text_style: TextStyle {
                        font_weight: 600,
                        ..TextStyle::sized(32.0)
                    },
                })
                .with_name("Greeting")
                .with_transform(Transform::new(
                    width * 0.1,
                    height * 0.3,
                    width * 0.8,
                    height * 0.2,
                )),
                ElementDraft::new(ElementKind::text("{date.weekday}, {date.long}", 16.0))
                    .with_name("Date")
                    .with_transform(Transform::new(
                        width * 0.1,
                        height * 0.55,
                        width * 0.8,
                        height * 0.12,
                    )),
            ],
        };

        let mut elements = BTreeMap::new();
        let mut element_order = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let element: Element = draft.into_element(ElementId::new());
            element_order.push(element.id);
            elements.insert(element.id, element);
        }
        WidgetDocument {
            elements,
            element_order,
            ..WidgetDocument::empty(canvas_size)
        }
    }
}

fn background(full: Transform, fill: &str) -> ElementDraft {
    ElementDraft::new(ElementKind::Rectangle)
        .with_name("Background")
        .with_transform(full)
        .with_style(Style::filled(fill))
        .with_locked(true)
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Template {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| CanvasError::UnknownTemplate(s.to_string()))
    }
}

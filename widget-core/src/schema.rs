//! Canonical serialized representation of a widget, shared with storage and
//! any host.
//!
//! Elements are keyed in id order, so serializing the same document always
//! yields the same bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{CanvasSize, Document};
use crate::element::{Element, ElementId};
use crate::{CanvasError, CanvasResult, EditorConfig};

/// Current persisted format version.
pub const WIDGET_FORMAT_VERSION: u32 = 1;

/// Persisted widget: elements, paint order and canvas size. Selection and
/// editor flags are not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDocument {
    /// Format version.
    #[serde(default = "WidgetDocument::default_version")]
    pub version: u32,
    /// Canvas dimensions.
    pub canvas_size: CanvasSize,
    /// Every element by id.
    pub elements: BTreeMap<ElementId, Element>,
    /// Top-level paint order, back to front.
    pub element_order: Vec<ElementId>,
}

impl WidgetDocument {
    const fn default_version() -> u32 {
        WIDGET_FORMAT_VERSION
    }

    /// Empty widget of the given size.
    #[must_use]
    pub fn empty(canvas_size: CanvasSize) -> Self {
        Self {
            version: WIDGET_FORMAT_VERSION,
            canvas_size,
            elements: BTreeMap::new(),
            element_order: Vec::new(),
        }
    }

    /// Build a widget from a runtime document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            version: WIDGET_FORMAT_VERSION,
            canvas_size: document.canvas_size(),
            elements: document.elements().map(|e| (e.id, e.clone())).collect(),
            element_order: document.element_order().to_vec(),
        }
    }

    /// Convert into a runtime document, validating every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnsupportedVersion`] for unknown versions and
    /// [`CanvasError::Integrity`] for structurally broken documents.
    pub fn into_document(self) -> CanvasResult<Document> {
        if self.version != WIDGET_FORMAT_VERSION {
            return Err(CanvasError::UnsupportedVersion(self.version));
        }
        let document =
            Document::from_parts(self.elements, self.element_order, self.canvas_size)?;
        Ok(document)
    }

    /// Convert into a runtime document, repairing structural problems.
    #[must_use]
    pub fn into_document_repaired(self, config: &EditorConfig) -> Document {
        Document::from_parts_repaired(
            self.elements,
            self.element_order,
            self.canvas_size,
            config,
        )
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string_pretty(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a widget.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }
}

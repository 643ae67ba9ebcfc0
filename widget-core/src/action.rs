//! The closed set of actions accepted by [`DocumentStore::dispatch`](crate::DocumentStore::dispatch).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::CanvasSize;
use crate::element::{Element, ElementDraft, ElementId};
use crate::layering::Direction;
use crate::patch::{ElementPatch, TransformPatch};

/// A document action.
///
/// Serialized with a `type` tag in upper snake case, e.g.
/// `{"type": "MOVE_ELEMENTS", "ids": [...], "dx": 4, "dy": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Add a new element on top and select it.
    AddElement {
        /// The element to add, minus its id.
        element: ElementDraft,
    },
    /// Delete top-level elements; groups take their children along.
    DeleteElements {
        /// Ids to delete.
        ids: Vec<ElementId>,
    },
    /// Merge a partial update into one element.
    UpdateElement {
        /// Target element.
        id: ElementId,
        /// Fields to merge.
        patch: ElementPatch,
    },
    /// Translate unlocked top-level elements.
    MoveElements {
        /// Ids to move.
        ids: Vec<ElementId>,
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
    },
    /// Replace a subset of one element's transform.
    ResizeElement {
        /// Target element.
        id: ElementId,
        /// Transform fields to set.
        transform: TransformPatch,
    },
    /// Replace the selection.
    SelectElements {
        /// Ids to select.
        ids: Vec<ElementId>,
    },
    /// Add an element to the selection, or remove it if already selected.
    ToggleSelection {
        /// Element to toggle.
        id: ElementId,
    },
    /// Select every top-level element.
    SelectAll,
    /// Clear the selection.
    ClearSelection,
    /// Move an element in paint order.
    Reorder {
        /// Target element.
        id: ElementId,
        /// Where to move it.
        direction: Direction,
    },
    /// Promote elements into a new group.
    Group {
        /// Candidate members.
        ids: Vec<ElementId>,
    },
    /// Dissolve a group.
    Ungroup {
        /// Group to dissolve.
        id: ElementId,
    },
    /// Copy elements on top of paint order.
    DuplicateElements {
        /// Ids to copy.
        ids: Vec<ElementId>,
    },
    /// Lock or unlock top-level elements.
    SetLocked {
        /// Target ids.
        ids: Vec<ElementId>,
        /// New lock state.
        locked: bool,
    },
    /// Change the canvas size.
    SetCanvasSize {
        /// New size.
        size: CanvasSize,
    },
    /// Change the editor grid flags.
    SetGrid {
        /// Show the grid.
        show: bool,
        /// New spacing, if changing.
        #[serde(default, rename = "gridSize", skip_serializing_if = "Option::is_none")]
        grid_size: Option<f32>,
    },
    /// Step back in history.
    Undo,
    /// Step forward in history.
    Redo,
    /// Replace the whole document and reset history.
    Load {
        /// Every element by id.
        elements: BTreeMap<ElementId, Element>,
        /// Top-level paint order.
        #[serde(rename = "elementOrder")]
        element_order: Vec<ElementId>,
        /// Canvas dimensions.
        #[serde(rename = "canvasSize")]
        canvas_size: CanvasSize,
    },
}

impl Action {
    /// Upper snake case name, as serialized.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddElement { .. } => "ADD_ELEMENT",
            Self::DeleteElements { .. } => "DELETE_ELEMENTS",
            Self::UpdateElement { .. } => "UPDATE_ELEMENT",
            Self::MoveElements { .. } => "MOVE_ELEMENTS",
            Self::ResizeElement { .. } => "RESIZE_ELEMENT",
            Self::SelectElements { .. } => "SELECT_ELEMENTS",
            Self::ToggleSelection { .. } => "TOGGLE_SELECTION",
            Self::SelectAll => "SELECT_ALL",
            Self::ClearSelection => "CLEAR_SELECTION",
            Self::Reorder { .. } => "REORDER",
            Self::Group { .. } => "GROUP",
            Self::Ungroup { .. } => "UNGROUP",
            Self::DuplicateElements { .. } => "DUPLICATE_ELEMENTS",
            Self::SetLocked { .. } => "SET_LOCKED",
            Self::SetCanvasSize { .. } => "SET_CANVAS_SIZE",
            Self::SetGrid { .. } => "SET_GRID",
            Self::Undo => "UNDO",
            Self::Redo => "REDO",
            Self::Load { .. } => "LOAD",
        }
    }

    /// Whether dispatching this action records a history entry.
    ///
    /// Selection, canvas size and grid flags are outside the snapshot;
    /// undo/redo move the cursor; load resets the history.
    #[must_use]
    pub const fn records_history(&self) -> bool {
        !matches!(
            self,
            Self::SelectElements { .. }
                | Self::ToggleSelection { .. }
                | Self::SelectAll
                | Self::ClearSelection
                | Self::SetCanvasSize { .. }
                | Self::SetGrid { .. }
                | Self::Undo
                | Self::Redo
                | Self::Load { .. }
        )
    }
}

//! Linear undo/redo history of whole-document snapshots.
//!
//! Entry 0 is the state the document was loaded with. Each recorded action
//! pushes the state *after* it, and the cursor always points at the entry
//! matching the live document:
//!
//! ```text
//! entries:  [S0] [S1] [S2] [S3]
//!                       ^ index = 2   (undo -> S1, redo -> S3)
//! ```
//!
//! Pushing while the cursor is not at the end truncates the redo future.

use std::collections::HashMap;

use crate::element::{Element, ElementId};

/// The undo-relevant subset of document state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// All elements by id.
    pub elements: HashMap<ElementId, Element>,
    /// Top-level paint order.
    pub element_order: Vec<ElementId>,
}

/// Snapshot stack with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
    /// Maximum number of undo steps (entries beyond the initial one).
    limit: usize,
}

impl History {
    /// Create a history holding only the initial snapshot.
    #[must_use]
    pub fn new(initial: Snapshot, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Drop every entry and start over from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }

    /// Record the state after an action, discarding any redo future.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);

        // Trim history if it exceeds the limit
        let overflow = self.entries.len().saturating_sub(self.limit + 1);
        if overflow > 0 {
            self.entries.drain(..overflow);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    /// Check if there are entries to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if there are entries to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Cursor position (`historyIndex`).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of stored entries, including the initial one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of undo steps kept.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

//! Selection operations.
//!
//! The selection holds top-level ids only, in the order they were selected;
//! `selected_ids[0]` is the primary element for single-target operations.

use crate::document::Document;
use crate::element::{Element, ElementId};

impl Document {
    /// The primary (first selected) element.
    #[must_use]
    pub fn primary_selection(&self) -> Option<ElementId> {
        self.selected_ids.first().copied()
    }

    /// Check if an element is selected.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Selected elements in selection order.
    pub fn selected_elements(&self) -> impl Iterator<Item = &Element> {
        self.selected_ids
            .iter()
            .filter_map(|id| self.elements.get(id))
    }

    /// Replace the selection. Unknown, grouped and repeated ids are dropped.
    pub(crate) fn select(&mut self, ids: &[ElementId]) {
        let mut selected = Vec::with_capacity(ids.len());
        for id in ids {
            if self.is_top_level(*id) && !selected.contains(id) {
                selected.push(*id);
            }
        }
        self.selected_ids = selected;
    }

    /// Add `id` to the selection, or remove it if already selected.
    pub(crate) fn toggle_selection(&mut self, id: ElementId) {
        if let Some(pos) = self.selected_ids.iter().position(|&s| s == id) {
            self.selected_ids.remove(pos);
        } else if self.is_top_level(id) {
            self.selected_ids.push(id);
        }
    }

    /// Select every top-level element in paint order.
    pub(crate) fn select_all(&mut self) {
        self.selected_ids = self.element_order.clone();
    }

    /// Clear the selection.
    pub(crate) fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    /// Drop selected ids that are no longer top-level.
    pub(crate) fn prune_selection(&mut self) {
        let order = &self.element_order;
        self.selected_ids.retain(|id| order.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::document::CanvasSize;
    use crate::element::ElementKind;

    fn document_with(n: usize) -> (Document, Vec<ElementId>) {
        let elements: Vec<Element> = (0..n).map(|_| Element::new(ElementKind::Ellipse)).collect();
        let ids: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
        let map: BTreeMap<_, _> = elements.into_iter().map(|e| (e.id, e)).collect();
        let doc = Document::from_parts(map, ids.clone(), CanvasSize::default()).expect("valid");
        (doc, ids)
    }

    #[test]
    fn test_select_filters_unknown_and_duplicates() {
        let (mut doc, ids) = document_with(3);
        let ghost = ElementId::new();
        doc.select(&[ids[2], ghost, ids[0], ids[2]]);
        assert_eq!(doc.selected_ids(), &[ids[2], ids[0]]);
        assert_eq!(doc.primary_selection(), Some(ids[2]));
    }

    #[test]
    fn test_select_same_sole_element_is_idempotent() {
        let (mut doc, ids) = document_with(2);
        doc.select(&[ids[1]]);
        let before = doc.clone();
        doc.select(&[ids[1]]);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let (mut doc, ids) = document_with(2);
        doc.toggle_selection(ids[0]);
        doc.toggle_selection(ids[1]);
        assert_eq!(doc.selected_ids(), &[ids[0], ids[1]]);
        doc.toggle_selection(ids[0]);
        assert_eq!(doc.selected_ids(), &[ids[1]]);
    }

    #[test]
    fn test_clear_when_empty_is_noop() {
        let (mut doc, _) = document_with(1);
        doc.clear_selection();
        doc.clear_selection();
        assert!(doc.selected_ids().is_empty());
    }

    #[test]
    fn test_select_all_uses_paint_order() {
        let (mut doc, ids) = document_with(3);
        doc.select_all();
        assert_eq!(doc.selected_ids(), ids.as_slice());
        assert_eq!(doc.selected_elements().count(), 3);
    }
}

//! Z-order operations on the top-level paint order.
//!
//! `element_order` is back to front; its last entry paints topmost. Group
//! children keep their own recorded order and are not reachable from here.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::element::ElementId;

/// Where to move an element in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// One step toward the top.
    Forward,
    /// One step toward the bottom.
    Backward,
    /// All the way to the top.
    Front,
    /// All the way to the bottom.
    Back,
}

impl Document {
    /// Move a top-level element in paint order. Returns `false` when nothing
    /// moved: unknown or grouped id, or already at the boundary.
    pub(crate) fn reorder(&mut self, id: ElementId, direction: Direction) -> bool {
        let Some(index) = self.order_index(id) else {
            return false;
        };
        let last = self.element_order.len() - 1;
        match direction {
            Direction::Forward if index < last => {
                self.element_order.swap(index, index + 1);
            }
            Direction::Backward if index > 0 => {
                self.element_order.swap(index, index - 1);
            }
            Direction::Front if index < last => {
                let id = self.element_order.remove(index);
                self.element_order.push(id);
            }
            Direction::Back if index > 0 => {
                let id = self.element_order.remove(index);
                self.element_order.insert(0, id);
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::document::CanvasSize;
    use crate::element::{Element, ElementKind};

    fn document_with(n: usize) -> (Document, Vec<ElementId>) {
        let elements: Vec<Element> = (0..n).map(|_| Element::new(ElementKind::Rectangle)).collect();
        let ids: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
        let map: BTreeMap<_, _> = elements.into_iter().map(|e| (e.id, e)).collect();
        let doc = Document::from_parts(map, ids.clone(), CanvasSize::default()).expect("valid");
        (doc, ids)
    }

    #[test]
    fn test_forward_swaps_one_step() {
        let (mut doc, ids) = document_with(3);
        assert!(doc.reorder(ids[0], Direction::Forward));
        assert_eq!(doc.element_order(), &[ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_backward_swaps_one_step() {
        let (mut doc, ids) = document_with(3);
        assert!(doc.reorder(ids[2], Direction::Backward));
        assert_eq!(doc.element_order(), &[ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let (mut doc, ids) = document_with(3);
        assert!(!doc.reorder(ids[2], Direction::Forward));
        assert!(!doc.reorder(ids[0], Direction::Backward));
        assert!(!doc.reorder(ids[2], Direction::Front));
        assert!(!doc.reorder(ids[0], Direction::Back));
        assert_eq!(doc.element_order(), ids.as_slice());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut doc, ids) = document_with(2);
        assert!(!doc.reorder(ElementId::new(), Direction::Forward));
        assert_eq!(doc.element_order(), ids.as_slice());
    }

    #[test]
    fn test_repeated_forward_ends_on_top() {
        let (mut doc, ids) = document_with(5);
        let mut steps = 0;
        while doc.reorder(ids[1], Direction::Forward) {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(doc.element_order().last(), Some(&ids[1]));
    }

    #[test]
    fn test_front_and_back() {
        let (mut doc, ids) = document_with(3);
        assert!(doc.reorder(ids[0], Direction::Front));
        assert_eq!(doc.element_order(), &[ids[1], ids[2], ids[0]]);
        assert!(doc.reorder(ids[0], Direction::Back));
        assert_eq!(doc.element_order(), ids.as_slice());
    }
}

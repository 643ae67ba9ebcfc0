//! Grouping and ungrouping.
//!
//! Groups are one level deep. Children are stored in absolute canvas
//! coordinates, so ungrouping needs no coordinate transform; the group's own
//! transform is the bounding box of its children and is kept in sync when
//! the group is moved or resized.

use std::ops::RangeInclusive;

use crate::document::Document;
use crate::edit::scaled_font_size;
use crate::element::{Element, ElementId, ElementKind, Transform};
use crate::payload::TextStyle;

/// Smallest axis-aligned box enclosing every transform. Rotation is ignored.
#[must_use]
pub fn bounding_box<'a>(transforms: impl IntoIterator<Item = &'a Transform>) -> Option<Transform> {
    let mut iter = transforms.into_iter();
    let first = iter.next()?;
    let (mut left, mut top, mut right, mut bottom) =
        (first.x, first.y, first.right(), first.bottom());
    for t in iter {
        left = left.min(t.x);
        top = top.min(t.y);
        right = right.max(t.right());
        bottom = bottom.max(t.bottom());
    }
    Some(Transform::new(left, top, right - left, bottom - top))
}

/// How group children follow a change of the group box.
pub(crate) struct ChildFit<'a> {
    /// Minimum child width/height.
    pub min_size: f32,
    /// Font clamp range when text children rescale their font.
    pub font_range: Option<&'a RangeInclusive<f32>>,
}

impl Document {
    /// Promote the eligible ids into a new group. Returns the group id, or
    /// `None` when fewer than two ids are eligible.
    ///
    /// Eligible: top-level, unlocked, not itself a group. Children keep their
    /// relative paint order; the group takes the slot of the topmost member.
    pub(crate) fn group(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let mut members: Vec<(usize, ElementId)> = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(index) = self.order_index(*id) else {
                continue;
            };
            let eligible = self
                .elements
                .get(id)
                .is_some_and(|e| !e.locked && !e.is_group());
            if eligible && !members.iter().any(|(_, m)| m == id) {
                members.push((index, *id));
            } else if !eligible {
                tracing::trace!("Element {id} not eligible for grouping");
            }
        }
        if members.len() < 2 {
            return None;
        }
        members.sort_by_key(|(index, _)| *index);

        let topmost = members.last().map_or(0, |(index, _)| *index);
        let children: Vec<ElementId> = members.iter().map(|(_, id)| *id).collect();
        let insert_at = self.element_order[..topmost]
            .iter()
            .filter(|id| !children.contains(*id))
            .count();

        let bounds = bounding_box(
            children
                .iter()
                .filter_map(|id| self.elements.get(id))
                .map(|e| &e.transform),
        )
        .filter(Transform::is_finite)?;

        let group_id = self.fresh_id();
        let mut group = Element::new(ElementKind::Group {
            children: children.clone(),
        })
        .with_transform(bounds);
        group.id = group_id;

        self.element_order.retain(|id| !children.contains(id));
        self.element_order.insert(insert_at, group_id);
        self.elements.insert(group_id, group);
        self.selected_ids = vec![group_id];
        Some(group_id)
    }

    /// Dissolve a group, reinserting its children at the group's former slot
    /// in their recorded order. Returns the children, or `None` when `id` is
    /// not an unlocked group.
    pub(crate) fn ungroup(&mut self, id: ElementId) -> Option<Vec<ElementId>> {
        let index = self.order_index(id)?;
        let group = self.elements.get(&id)?;
        if group.locked {
            return None;
        }
        let ElementKind::Group { children } = &group.kind else {
            return None;
        };
        let children: Vec<ElementId> = children
            .iter()
            .copied()
            .filter(|c| self.elements.contains_key(c))
            .collect();

        self.elements.remove(&id);
        self.element_order.remove(index);
        for (offset, child) in children.iter().enumerate() {
            self.element_order.insert(index + offset, *child);
        }
        self.selected_ids.clone_from(&children);
        Some(children)
    }

    /// Map every child of `group_id` from the `from` box onto the `to` box.
    ///
    /// All or nothing: returns `false` and leaves every child untouched when
    /// any mapped child box would be non-finite.
    pub(crate) fn fit_children(
        &mut self,
        group_id: ElementId,
        from: &Transform,
        to: &Transform,
        fit: &ChildFit<'_>,
    ) -> bool {
        let Some(group) = self.elements.get(&group_id) else {
            return false;
        };
        let sx = to.width / from.width;
        let sy = to.height / from.height;
        let mut fitted = Vec::with_capacity(group.kind.children().len());
        for child_id in group.kind.children() {
            let Some(child) = self.elements.get(child_id) else {
                continue;
            };
            let old = child.transform;
            let mapped = Transform {
                x: to.x + (old.x - from.x) * sx,
                y: to.y + (old.y - from.y) * sy,
                width: old.width * sx,
                height: old.height * sy,
                ..old
            };
            let Some(mapped) = mapped.sanitized(fit.min_size) else {
                tracing::debug!("Group {group_id} fit rejected: child {child_id} overflows");
                return false;
            };
            fitted.push((*child_id, old, mapped));
        }

        for (child_id, old, mapped) in fitted {
            let Some(child) = self.elements.get_mut(&child_id) else {
                continue;
            };
            child.transform = mapped;
            if let (
                Some(range),
                ElementKind::Text {
                    text_style: TextStyle { font_size, .. },
                    ..
                },
            ) = (fit.font_range, &mut child.kind)
            {
                *font_size = scaled_font_size(*font_size, &old, &mapped, range);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::document::CanvasSize;

    fn rect(x: f32, y: f32) -> Element {
        Element::new(ElementKind::Rectangle).with_transform(Transform::new(x, y, 10.0, 10.0))
    }

    fn document_of(elements: Vec<Element>) -> (Document, Vec<ElementId>) {
        let ids: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
        let map: BTreeMap<_, _> = elements.into_iter().map(|e| (e.id, e)).collect();
        let doc = Document::from_parts(map, ids.clone(), CanvasSize::default()).expect("valid");
        (doc, ids)
    }

    #[test]
    fn test_bounding_box_encloses_all() {
        let a = Transform::new(0.0, 10.0, 10.0, 10.0);
        let b = Transform::new(30.0, 0.0, 5.0, 50.0);
        let bounds = bounding_box([&a, &b]).expect("non-empty");
        assert_eq!(bounds, Transform::new(0.0, 0.0, 35.0, 50.0));
        assert!(bounding_box(std::iter::empty()).is_none());
    }

    #[test]
    fn test_group_takes_topmost_slot() {
        let (mut doc, ids) = document_of(vec![rect(0.0, 0.0), rect(20.0, 0.0), rect(40.0, 0.0)]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        let g = doc.group(&[c, a]).expect("grouped");
        assert_eq!(doc.element_order(), &[b, g]);
        assert_eq!(doc.element(g).map(|e| e.kind.children().to_vec()), Some(vec![a, c]));
        assert_eq!(doc.selected_ids(), &[g]);
        assert_eq!(
            doc.element(g).map(|e| e.transform),
            Some(Transform::new(0.0, 0.0, 50.0, 10.0))
        );
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn test_group_below_other_elements() {
        let (mut doc, ids) = document_of(vec![
            rect(0.0, 0.0),
            rect(10.0, 0.0),
            rect(20.0, 0.0),
            rect(30.0, 0.0),
        ]);
        let g = doc.group(&[ids[0], ids[1]]).expect("grouped");
        assert_eq!(doc.element_order(), &[g, ids[2], ids[3]]);
    }

    #[test]
    fn test_group_needs_two_eligible() {
        let mut locked = rect(0.0, 0.0);
        locked.locked = true;
        let (mut doc, ids) = document_of(vec![locked, rect(10.0, 0.0)]);
        let before = doc.clone();

        assert!(doc.group(&[ids[0], ids[1]]).is_none());
        assert!(doc.group(&[ids[1], ids[1]]).is_none());
        assert!(doc.group(&[ids[1], ElementId::new()]).is_none());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_group_rejects_groups_as_members() {
        let (mut doc, ids) = document_of(vec![rect(0.0, 0.0), rect(10.0, 0.0), rect(20.0, 0.0)]);
        let g = doc.group(&[ids[0], ids[1]]).expect("grouped");
        assert!(doc.group(&[g, ids[2]]).is_none());
        assert!(doc.group(&[ids[0], ids[2]]).is_none(), "grouped child not top-level");
    }

    #[test]
    fn test_ungroup_reinserts_at_group_slot() {
        let (mut doc, ids) = document_of(vec![rect(0.0, 0.0), rect(20.0, 0.0), rect(40.0, 0.0)]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        let g = doc.group(&[a, c]).expect("grouped");

        let children = doc.ungroup(g).expect("ungrouped");
        assert_eq!(children, vec![a, c]);
        assert_eq!(doc.element_order(), &[b, a, c]);
        assert_eq!(doc.selected_ids(), &[a, c]);
        assert!(doc.element(g).is_none());
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn test_ungroup_non_group_is_noop() {
        let (mut doc, ids) = document_of(vec![rect(0.0, 0.0)]);
        assert!(doc.ungroup(ids[0]).is_none());
        assert!(doc.ungroup(ElementId::new()).is_none());
    }

    #[test]
    fn test_fit_children_scales_into_new_box() {
        let (mut doc, ids) = document_of(vec![rect(0.0, 0.0), rect(10.0, 10.0)]);
        let g = doc.group(&ids).expect("grouped");
        let from = Transform::new(0.0, 0.0, 20.0, 20.0);
        let to = Transform::new(100.0, 100.0, 40.0, 40.0);
        assert!(doc.fit_children(
            g,
            &from,
            &to,
            &ChildFit {
                min_size: 1.0,
                font_range: None,
            },
        ));

        assert_eq!(
            doc.element(ids[1]).map(|e| e.transform),
            Some(Transform::new(120.0, 120.0, 20.0, 20.0))
        );
    }

    #[test]
    fn test_fit_children_overflow_leaves_children_untouched() {
        let (mut doc, ids) = document_of(vec![rect(0.0, 0.0), rect(10.0, 10.0)]);
        let g = doc.group(&ids).expect("grouped");
        let from = Transform::new(0.0, 0.0, 20.0, 20.0);
        let to = Transform::new(3.0e38, 0.0, 3.0e38, 20.0);
        let fit = ChildFit {
            min_size: 1.0,
            font_range: None,
        };

        assert!(!doc.fit_children(g, &from, &to, &fit));
        assert_eq!(
            doc.element(ids[0]).map(|e| e.transform),
            Some(Transform::new(0.0, 0.0, 10.0, 10.0))
        );
        assert_eq!(
            doc.element(ids[1]).map(|e| e.transform),
            Some(Transform::new(10.0, 10.0, 10.0, 10.0))
        );
    }

    #[test]
    fn test_group_rejects_overflowing_bounds() {
        let (mut doc, ids) = document_of(vec![
            Element::new(ElementKind::Rectangle)
                .with_transform(Transform::new(-3.0e38, 0.0, 10.0, 10.0)),
            Element::new(ElementKind::Rectangle)
                .with_transform(Transform::new(3.0e38, 0.0, 10.0, 10.0)),
        ]);
        assert!(doc.group(&ids).is_none());
        assert_eq!(doc.element_order(), ids.as_slice());
    }
}

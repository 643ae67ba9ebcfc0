//! Element edits: add, delete, update, move, resize, lock, duplicate.
//!
//! Batch operations make one pass over the candidate ids and skip each
//! ineligible element individually (unknown, grouped, or locked); they never
//! fail the whole batch.

use std::ops::RangeInclusive;

use crate::config::EditorConfig;
use crate::document::{CanvasSize, Document};
use crate::element::{Element, ElementDraft, ElementId, ElementKind, Transform};
use crate::grouping::ChildFit;
use crate::patch::{ElementPatch, TransformPatch};

/// Font size after a text box is resized from `old` to `new`.
///
/// The font scales with the ratio of the new to the old shorter side and is
/// clamped to `range`. When the shorter side is unchanged the size is left
/// alone, so moving a box never snaps an out-of-range font.
#[must_use]
pub fn scaled_font_size(
    font_size: f32,
    old: &Transform,
    new: &Transform,
    range: &RangeInclusive<f32>,
) -> f32 {
    let old_min = old.min_side();
    let new_min = new.min_side();
    if old_min <= 0.0 || (new_min - old_min).abs() <= f32::EPSILON {
        return font_size;
    }
    let scaled = font_size * new_min / old_min;
    if !scaled.is_finite() {
        return font_size;
    }
    // `clamp` panics on an inverted range
    scaled.max(*range.start()).min(*range.end())
}

impl Document {
    /// Insert a new element on top of paint order and select it exclusively.
    /// Groups cannot be added directly; they only come from grouping.
    pub(crate) fn add(&mut self, draft: ElementDraft, config: &EditorConfig) -> Option<ElementId> {
        if draft.kind.is_group() {
            tracing::debug!("Rejected add of a group element");
            return None;
        }
        let Some(transform) = draft.transform.sanitized(config.min_element_size) else {
            tracing::debug!("Rejected add with a non-finite transform");
            return None;
        };
        let id = self.fresh_id();
        let mut element = draft.into_element(id);
        element.transform = transform;
        self.elements.insert(id, element);
        self.element_order.push(id);
        self.selected_ids = vec![id];
        Some(id)
    }

    /// Remove top-level elements, cascading into group children. Returns the
    /// number of top-level elements removed.
    pub(crate) fn delete(&mut self, ids: &[ElementId]) -> usize {
        let mut removed = 0;
        for id in ids {
            let Some(index) = self.order_index(*id) else {
                tracing::trace!("Delete skipped non top-level id {id}");
                continue;
            };
            self.element_order.remove(index);
            if let Some(element) = self.elements.remove(id) {
                for child in element.kind.children() {
                    self.elements.remove(child);
                }
            }
            removed += 1;
        }
        self.prune_selection();
        removed
    }

    /// Apply a patch to one element. Returns `false` for unknown or locked
    /// elements, and for a transform that would leave any box non-finite.
    /// A transform patch on a group child is dropped; on a group it drags
    /// the children along.
    pub(crate) fn update(
        &mut self,
        id: ElementId,
        patch: &ElementPatch,
        config: &EditorConfig,
    ) -> bool {
        if self.is_effectively_locked(id) {
            return false;
        }
        let is_child = self.parent_of(id).is_some();
        let Some(element) = self.elements.get(&id) else {
            return false;
        };
        let old = element.transform;
        let is_group = element.is_group();

        let mut new_transform = None;
        if let Some(transform) = patch.transform.filter(|t| !t.is_empty()) {
            if is_child {
                tracing::trace!("Dropped transform patch on group child {id}");
            } else {
                let Some(new) = transform
                    .applied_to(&old)
                    .sanitized(config.min_element_size)
                else {
                    tracing::debug!("Rejected non-finite transform patch on {id}");
                    return false;
                };
                let fit = ChildFit {
                    min_size: config.min_element_size,
                    font_range: None,
                };
                if is_group && !self.fit_children(id, &old, &new, &fit) {
                    return false;
                }
                new_transform = Some(new);
            }
        }

        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        patch.apply_non_geometric(element);
        if let Some(new) = new_transform {
            element.transform = new;
        }
        true
    }

    /// Translate unlocked top-level elements (and their children). An
    /// element whose box or any child box would overflow stays put. Returns
    /// the number of top-level elements moved.
    pub(crate) fn move_by(&mut self, ids: &[ElementId], dx: f32, dy: f32) -> usize {
        if !(dx.is_finite() && dy.is_finite()) {
            return 0;
        }
        let mut moved = 0;
        let mut seen: Vec<ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if seen.contains(id) || !self.is_top_level(*id) {
                continue;
            }
            seen.push(*id);
            let Some(element) = self.elements.get(id) else {
                continue;
            };
            if element.locked {
                tracing::trace!("Move skipped locked element {id}");
                continue;
            }
            let mut targets = vec![*id];
            targets.extend_from_slice(element.kind.children());
            let Some(moves) = targets
                .iter()
                .filter_map(|target| self.elements.get(target).map(|e| (*target, e.transform)))
                .map(|(target, t)| t.translated(dx, dy).map(|moved| (target, moved)))
                .collect::<Option<Vec<_>>>()
            else {
                tracing::debug!("Move skipped {id}: position would overflow");
                continue;
            };
            for (target, transform) in moves {
                if let Some(e) = self.elements.get_mut(&target) {
                    e.transform = transform;
                }
            }
            moved += 1;
        }
        moved
    }

    /// Resize a top-level element. Width and height are clamped to the
    /// configured minimum; text rescales its font; a group maps its children
    /// into the new box.
    pub(crate) fn resize(
        &mut self,
        id: ElementId,
        patch: &TransformPatch,
        config: &EditorConfig,
    ) -> bool {
        if !self.is_top_level(id) {
            return false;
        }
        let Some(element) = self.elements.get(&id) else {
            return false;
        };
        if element.locked {
            return false;
        }
        let old = element.transform;
        let Some(new) = patch.applied_to(&old).sanitized(config.min_element_size) else {
            tracing::debug!("Rejected non-finite resize of {id}");
            return false;
        };
        let range = config.font_size_range();
        let fit = ChildFit {
            min_size: config.min_element_size,
            font_range: Some(&range),
        };
        if element.is_group() && !self.fit_children(id, &old, &new, &fit) {
            return false;
        }

        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        element.transform = new;
        if let ElementKind::Text { text_style, .. } = &mut element.kind {
            text_style.font_size = scaled_font_size(text_style.font_size, &old, &new, &range);
        }
        true
    }

    /// Set the lock flag on top-level elements. Returns how many changed.
    pub(crate) fn set_locked(&mut self, ids: &[ElementId], locked: bool) -> usize {
        let mut changed = 0;
        for id in ids {
            if !self.is_top_level(*id) {
                continue;
            }
            if let Some(element) = self.elements.get_mut(id) {
                if element.locked != locked {
                    element.locked = locked;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Copy top-level elements (groups with fresh children) onto the top of
    /// paint order, offset by the configured amount, and select the copies.
    /// Copies are unlocked.
    pub(crate) fn duplicate(&mut self, ids: &[ElementId], config: &EditorConfig) -> Vec<ElementId> {
        let mut sources: Vec<(usize, ElementId)> = ids
            .iter()
            .filter_map(|id| self.order_index(*id).map(|index| (index, *id)))
            .collect();
        sources.sort_by_key(|(index, _)| *index);
        sources.dedup();

        let offset = config.duplicate_offset;
        let mut copies = Vec::with_capacity(sources.len());
        for (_, source_id) in sources {
            let Some(source) = self.elements.get(&source_id) else {
                continue;
            };
            let sources: Vec<&Element> = std::iter::once(source)
                .chain(
                    source
                        .kind
                        .children()
                        .iter()
                        .filter_map(|c| self.elements.get(c)),
                )
                .collect();
            let Some(shifted) = sources
                .iter()
                .map(|e| e.transform.translated(offset, offset))
                .collect::<Option<Vec<Transform>>>()
            else {
                tracing::debug!("Duplicate skipped {source_id}: copy would overflow");
                continue;
            };
            let mut copies_of: Vec<Element> = sources.into_iter().cloned().collect();
            for (element, transform) in copies_of.iter_mut().zip(shifted) {
                element.id = self.fresh_id();
                element.transform = transform;
            }
            let mut members = copies_of.into_iter();
            let Some(mut copy) = members.next() else {
                continue;
            };
            copy.locked = false;
            if let ElementKind::Group { children } = &mut copy.kind {
                *children = Vec::new();
                for child_copy in members {
                    children.push(child_copy.id);
                    self.elements.insert(child_copy.id, child_copy);
                }
            }

            copies.push(copy.id);
            self.element_order.push(copy.id);
            self.elements.insert(copy.id, copy);
        }
        if !copies.is_empty() {
            self.selected_ids.clone_from(&copies);
        }
        copies
    }

    /// Change the canvas size. Invalid sizes are ignored.
    pub(crate) fn set_canvas_size(&mut self, size: CanvasSize) -> bool {
        if !size.is_valid() {
            return false;
        }
        self.canvas_size = size;
        true
    }

    /// Update the editor grid flags. A non-positive spacing is ignored.
    pub(crate) fn set_grid(&mut self, show: bool, grid_size: Option<f32>) {
        self.show_grid = show;
        if let Some(size) = grid_size.filter(|s| s.is_finite() && *s > 0.0) {
            self.grid_size = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::StylePatch;

    fn text_transform(w: f32, h: f32) -> Transform {
        Transform::new(0.0, 0.0, w, h)
    }

    #[test]
    fn test_font_scales_with_min_side() {
        let range = 8.0..=200.0;
        let size = scaled_font_size(
            24.0,
            &text_transform(100.0, 200.0),
            &text_transform(150.0, 300.0),
            &range,
        );
        assert!((size - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_font_scale_is_clamped() {
        let range = 8.0..=200.0;
        let big = scaled_font_size(
            150.0,
            &text_transform(10.0, 10.0),
            &text_transform(100.0, 100.0),
            &range,
        );
        assert!((big - 200.0).abs() < f32::EPSILON);
        let small = scaled_font_size(
            10.0,
            &text_transform(100.0, 100.0),
            &text_transform(10.0, 10.0),
            &range,
        );
        assert!((small - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_font_untouched_when_min_side_unchanged() {
        let range = 8.0..=200.0;
        let size = scaled_font_size(
            4.0,
            &text_transform(100.0, 50.0),
            &text_transform(300.0, 50.0),
            &range,
        );
        assert!((size - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_add_selects_new_element_on_top() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let first = doc
            .add(ElementDraft::new(ElementKind::Rectangle), &config)
            .expect("added");
        let second = doc
            .add(ElementDraft::new(ElementKind::Ellipse), &config)
            .expect("added");
        assert_eq!(doc.element_order(), &[first, second]);
        assert_eq!(doc.selected_ids(), &[second]);
    }

    #[test]
    fn test_add_rejects_group() {
        let mut doc = Document::default();
        let draft = ElementDraft::new(ElementKind::Group { children: vec![] });
        assert!(doc.add(draft, &EditorConfig::default()).is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_delete_ignores_unknown_and_prunes_selection() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let a = doc
            .add(ElementDraft::new(ElementKind::Rectangle), &config)
            .expect("added");
        assert_eq!(doc.delete(&[ElementId::new(), a]), 1);
        assert!(doc.is_empty());
        assert!(doc.selected_ids().is_empty());
    }

    #[test]
    fn test_update_skips_locked() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let id = doc
            .add(
                ElementDraft::new(ElementKind::Rectangle).with_locked(true),
                &config,
            )
            .expect("added");
        let patch = ElementPatch::style(StylePatch {
            fill: Some("#123456".to_string()),
            ..StylePatch::default()
        });
        assert!(!doc.update(id, &patch, &config));
        assert_eq!(doc.element(id).map(|e| e.style.fill.as_str()), Some("#FFFFFF"));
    }

    #[test]
    fn test_move_is_partial_over_locked() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let free = doc
            .add(ElementDraft::new(ElementKind::Rectangle), &config)
            .expect("added");
        let locked = doc
            .add(
                ElementDraft::new(ElementKind::Rectangle).with_locked(true),
                &config,
            )
            .expect("added");

        assert_eq!(doc.move_by(&[free, locked], 5.0, -5.0), 1);
        let moved = doc.element(free).expect("exists").transform;
        assert!((moved.x - 5.0).abs() < f32::EPSILON);
        assert!((moved.y + 5.0).abs() < f32::EPSILON);
        assert_eq!(
            doc.element(locked).map(|e| e.transform),
            Some(Transform::default())
        );
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let id = doc
            .add(ElementDraft::new(ElementKind::Ellipse), &config)
            .expect("added");
        assert!(doc.resize(id, &TransformPatch::size(-20.0, 0.0), &config));
        let t = doc.element(id).expect("exists").transform;
        assert!((t.width - 1.0).abs() < f32::EPSILON);
        assert!((t.height - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_duplicate_offsets_and_selects_copies() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let id = doc
            .add(
                ElementDraft::new(ElementKind::Rectangle).with_locked(true),
                &config,
            )
            .expect("added");
        let copies = doc.duplicate(&[id, id], &config);
        assert_eq!(copies.len(), 1);
        assert_eq!(doc.selected_ids(), copies.as_slice());

        let copy: &Element = doc.element(copies[0]).expect("copy exists");
        assert!(!copy.locked);
        assert!((copy.transform.x - 10.0).abs() < f32::EPSILON);
        assert_eq!(doc.element_order(), &[id, copies[0]]);
    }

    #[test]
    fn test_set_grid_ignores_bad_spacing() {
        let mut doc = Document::default();
        doc.set_grid(true, Some(-3.0));
        assert!(doc.show_grid());
        assert!((doc.grid_size() - 10.0).abs() < f32::EPSILON);
        doc.set_grid(false, Some(25.0));
        assert!((doc.grid_size() - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_move_that_would_overflow_stays_put() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let id = doc
            .add(ElementDraft::new(ElementKind::Rectangle), &config)
            .expect("added");

        assert_eq!(doc.move_by(&[id], 3.0e38, 0.0), 1);
        assert_eq!(doc.move_by(&[id], 3.0e38, 0.0), 0);
        let t = doc.element(id).expect("exists").transform;
        assert!((t.x - 3.0e38).abs() < 1.0e32);
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn test_group_move_is_all_or_nothing() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let near = doc
            .add(ElementDraft::new(ElementKind::Rectangle), &config)
            .expect("added");
        let far = doc
            .add(
                ElementDraft::new(ElementKind::Rectangle)
                    .with_transform(Transform::new(3.0e38, 0.0, 10.0, 10.0)),
                &config,
            )
            .expect("added");
        let group = doc.group(&[near, far]).expect("grouped");
        let before = doc.snapshot();

        assert_eq!(doc.move_by(&[group], 1.0e38, 0.0), 0);
        assert_eq!(doc.snapshot(), before);
    }

    #[test]
    fn test_non_finite_resize_rejected() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let id = doc
            .add(ElementDraft::new(ElementKind::text("Hi", 24.0)), &config)
            .expect("added");

        assert!(!doc.resize(id, &TransformPatch::size(f32::INFINITY, 10.0), &config));
        let rotate = TransformPatch {
            rotation: Some(f32::NAN),
            ..TransformPatch::default()
        };
        assert!(!doc.resize(id, &rotate, &config));
        let element = doc.element(id).expect("exists");
        assert_eq!(element.transform, Transform::default());
        assert!(element
            .font_size()
            .is_some_and(|size| (size - 24.0).abs() < f32::EPSILON));
        assert!(doc.check_integrity().is_ok());
    }

    #[test]
    fn test_non_finite_update_rejected_whole() {
        let mut doc = Document::default();
        let config = EditorConfig::default();
        let id = doc
            .add(ElementDraft::new(ElementKind::Rectangle), &config)
            .expect("added");
        let patch = ElementPatch {
            name: Some("Renamed".to_string()),
            transform: Some(TransformPatch::position(f32::NEG_INFINITY, 0.0)),
            ..ElementPatch::default()
        };

        assert!(!doc.update(id, &patch, &config));
        let element = doc.element(id).expect("exists");
        assert_eq!(element.name, "Rectangle");
        assert_eq!(element.transform, Transform::default());
    }

    #[test]
    fn test_add_rejects_non_finite_transform() {
        let mut doc = Document::default();
        let draft = ElementDraft::new(ElementKind::Ellipse)
            .with_transform(Transform::new(f32::NAN, 0.0, 10.0, 10.0));
        assert!(doc.add(draft, &EditorConfig::default()).is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_duplicate_that_would_overflow_is_skipped() {
        let mut doc = Document::default();
        let config = EditorConfig {
            duplicate_offset: 3.0e38,
            ..EditorConfig::default()
        };
        let id = doc
            .add(
                ElementDraft::new(ElementKind::Rectangle)
                    .with_transform(Transform::new(3.0e38, 0.0, 10.0, 10.0)),
                &config,
            )
            .expect("added");
        assert!(doc.duplicate(&[id], &config).is_empty());
        assert_eq!(doc.element_order(), &[id]);
    }

    #[test]
    fn test_inverted_font_range_does_not_panic() {
        let size = scaled_font_size(
            24.0,
            &text_transform(100.0, 100.0),
            &text_transform(200.0, 200.0),
            &(50.0..=10.0),
        );
        assert!(size.is_finite());
    }
}

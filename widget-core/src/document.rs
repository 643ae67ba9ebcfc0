//! The document aggregate: elements, paint order, selection and canvas size.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementKind};
use crate::error::IntegrityError;
use crate::history::Snapshot;
use crate::EditorConfig;

/// Default canvas edge length for new widgets.
const DEFAULT_CANVAS_EDGE: f32 = 360.0;

/// Fixed size of the widget canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in canvas units.
    pub width: f32,
    /// Height in canvas units.
    pub height: f32,
}

impl CanvasSize {
    /// Create a canvas size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_EDGE, DEFAULT_CANVAS_EDGE)
    }
}

/// Full in-memory state of one widget being edited.
///
/// `Document` is only mutated by [`DocumentStore`](crate::DocumentStore);
/// everything public here is a read.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// All elements, top-level and grouped, by id.
    pub(crate) elements: HashMap<ElementId, Element>,
    /// Top-level ids, back to front.
    pub(crate) element_order: Vec<ElementId>,
    /// Selected top-level ids in selection order.
    pub(crate) selected_ids: Vec<ElementId>,
    /// Canvas dimensions.
    pub(crate) canvas_size: CanvasSize,
    /// Editor-only: draw the grid.
    pub(crate) show_grid: bool,
    /// Editor-only: grid spacing.
    pub(crate) grid_size: f32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(CanvasSize::default())
    }
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new(canvas_size: CanvasSize) -> Self {
        Self {
            elements: HashMap::new(),
            element_order: Vec::new(),
            selected_ids: Vec::new(),
            canvas_size,
            show_grid: false,
            grid_size: EditorConfig::default().grid_size,
        }
    }

    /// Build a document from persisted parts, rejecting any structural
    /// violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`IntegrityError`] found.
    pub fn from_parts(
        elements: BTreeMap<ElementId, Element>,
        element_order: Vec<ElementId>,
        canvas_size: CanvasSize,
    ) -> Result<Self, IntegrityError> {
        let document = Self {
            elements: elements.into_iter().collect(),
            element_order,
            ..Self::new(canvas_size)
        };
        document.check_integrity()?;
        Ok(document)
    }

    /// Build a document from untrusted parts, repairing whatever violates the
    /// structural invariants. Each repair is logged as a warning.
    #[must_use]
    pub fn from_parts_repaired(
        elements: BTreeMap<ElementId, Element>,
        element_order: Vec<ElementId>,
        canvas_size: CanvasSize,
        config: &EditorConfig,
    ) -> Self {
        let mut elements = elements;
        for (key, element) in &mut elements {
            if element.id != *key {
                tracing::warn!("Repair: element {} re-keyed to {key}", element.id);
                element.id = *key;
            }
        }

        // Claim children group by group; the first group to list an id wins.
        let groups: Vec<ElementId> = elements
            .values()
            .filter(|e| e.is_group())
            .map(|e| e.id)
            .collect();
        let mut owned: HashSet<ElementId> = HashSet::new();
        for group_id in &groups {
            let listed = elements
                .get(group_id)
                .map(|g| g.kind.children().to_vec())
                .unwrap_or_default();
            let mut kept = Vec::with_capacity(listed.len());
            for child in listed {
                let valid = child != *group_id
                    && elements.get(&child).is_some_and(|c| !c.is_group())
                    && !owned.contains(&child);
                if valid {
                    owned.insert(child);
                    kept.push(child);
                } else {
                    tracing::warn!("Repair: dropped child {child} from group {group_id}");
                }
            }
            if let Some(ElementKind::Group { children }) =
                elements.get_mut(group_id).map(|g| &mut g.kind)
            {
                *children = kept;
            }
        }

        // Empty groups own nothing and draw nothing.
        for group_id in &groups {
            if elements
                .get(group_id)
                .is_some_and(|g| g.kind.children().is_empty())
            {
                tracing::warn!("Repair: removed empty group {group_id}");
                elements.remove(group_id);
            }
        }

        for id in &owned {
            if let Some(child) = elements.get_mut(id) {
                if child.locked {
                    tracing::warn!("Repair: unlocked group child {id}");
                    child.locked = false;
                }
            }
        }

        let mut seen = HashSet::new();
        let mut order = Vec::with_capacity(element_order.len());
        for id in element_order {
            if !elements.contains_key(&id) {
                tracing::warn!("Repair: dropped dangling order entry {id}");
            } else if owned.contains(&id) {
                tracing::warn!("Repair: removed group child {id} from top level");
            } else if !seen.insert(id) {
                tracing::warn!("Repair: dropped duplicate order entry {id}");
            } else {
                order.push(id);
            }
        }
        for id in elements.keys() {
            if !owned.contains(id) && !seen.contains(id) {
                tracing::warn!("Repair: appended unplaced element {id}");
                order.push(*id);
            }
        }

        for element in elements.values_mut() {
            let t = &mut element.transform;
            if !t.is_finite() {
                tracing::warn!("Repair: reset non-finite transform of {}", element.id);
                t.replace_non_finite(config.min_element_size);
            }
            t.clamp_size(config.min_element_size);
        }

        let canvas_size = if canvas_size.is_valid() {
            canvas_size
        } else {
            tracing::warn!("Repair: replaced invalid canvas size {canvas_size:?}");
            config.canvas_size
        };

        Self {
            elements: elements.into_iter().collect(),
            element_order: order,
            selected_ids: Vec::new(),
            canvas_size,
            show_grid: false,
            grid_size: config.grid_size,
        }
    }

    /// Get an element by ID, top-level or grouped.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// All elements in unspecified order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Top-level ids, back to front.
    #[must_use]
    pub fn element_order(&self) -> &[ElementId] {
        &self.element_order
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> &[ElementId] {
        &self.selected_ids
    }

    /// Canvas dimensions.
    #[must_use]
    pub const fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    /// Whether the editor grid is shown.
    #[must_use]
    pub const fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Editor grid spacing.
    #[must_use]
    pub const fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Total number of elements, including group children.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Position of a top-level id in paint order.
    #[must_use]
    pub fn order_index(&self, id: ElementId) -> Option<usize> {
        self.element_order.iter().position(|&eid| eid == id)
    }

    /// Whether `id` is addressable at top level.
    #[must_use]
    pub fn is_top_level(&self, id: ElementId) -> bool {
        self.element_order.contains(&id)
    }

    /// The group owning `id`, if any.
    #[must_use]
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.element_order.iter().copied().find(|gid| {
            self.elements
                .get(gid)
                .is_some_and(|g| g.kind.children().contains(&id))
        })
    }

    /// Top-level elements, back to front.
    pub fn top_level_elements(&self) -> impl Iterator<Item = &Element> {
        self.element_order
            .iter()
            .filter_map(|id| self.elements.get(id))
    }

    /// Every drawable element back to front, with each group replaced by its
    /// children in their recorded order.
    #[must_use]
    pub fn paint_list(&self) -> Vec<&Element> {
        let mut list = Vec::with_capacity(self.elements.len());
        for element in self.top_level_elements() {
            match &element.kind {
                ElementKind::Group { children } => {
                    list.extend(children.iter().filter_map(|id| self.elements.get(id)));
                }
                _ => list.push(element),
            }
        }
        list
    }

    /// Find the topmost visible top-level element at the given canvas point.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.element_order.iter().rev().copied().find(|id| {
            self.elements
                .get(id)
                .is_some_and(|e| e.visible && e.contains_point(x, y))
        })
    }

    /// Whether edits to `id` must be skipped: the element or its group is
    /// locked.
    #[must_use]
    pub fn is_effectively_locked(&self, id: ElementId) -> bool {
        let Some(element) = self.elements.get(&id) else {
            return false;
        };
        element.locked
            || self
                .parent_of(id)
                .and_then(|gid| self.elements.get(&gid))
                .is_some_and(|g| g.locked)
    }

    /// Ids back to front, each group followed by its children.
    pub(crate) fn flattened_ids(&self) -> Vec<ElementId> {
        let mut ids = Vec::with_capacity(self.elements.len());
        for id in &self.element_order {
            ids.push(*id);
            if let Some(element) = self.elements.get(id) {
                ids.extend_from_slice(element.kind.children());
            }
        }
        ids
    }

    /// A fresh id not present in the document.
    pub(crate) fn fresh_id(&self) -> ElementId {
        loop {
            let id = ElementId::new();
            if !self.elements.contains_key(&id) {
                return id;
            }
        }
    }

    /// Capture the undo-relevant state.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.elements.clone(),
            element_order: self.element_order.clone(),
        }
    }

    /// Restore elements and order from a snapshot. The selection keeps the
    /// ids that are still top-level afterwards.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.elements = snapshot.elements;
        self.element_order = snapshot.element_order;
        self.prune_selection();
    }

    /// Validate every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        for (key, element) in &self.elements {
            if element.id != *key {
                return Err(IntegrityError::IdMismatch {
                    key: *key,
                    id: element.id,
                });
            }
            let t = &element.transform;
            if !(t.width.is_finite() && t.height.is_finite() && t.width > 0.0 && t.height > 0.0) {
                return Err(IntegrityError::DegenerateSize(element.id));
            }
            if !t.is_finite() {
                return Err(IntegrityError::NonFiniteTransform(element.id));
            }
        }

        let mut owned: HashSet<ElementId> = HashSet::new();
        for group in self.elements.values().filter(|e| e.is_group()) {
            for child_id in group.kind.children() {
                let Some(child) = self.elements.get(child_id) else {
                    return Err(IntegrityError::MissingChild {
                        group: group.id,
                        child: *child_id,
                    });
                };
                if child.is_group() {
                    return Err(IntegrityError::NestedGroup {
                        group: group.id,
                        child: *child_id,
                    });
                }
                if child.locked {
                    return Err(IntegrityError::LockedChild(*child_id));
                }
                if !owned.insert(*child_id) {
                    return Err(IntegrityError::SharedChild(*child_id));
                }
            }
        }

        let mut placed: HashSet<ElementId> = HashSet::new();
        for id in &self.element_order {
            if !self.elements.contains_key(id) {
                return Err(IntegrityError::OrderWithoutElement(*id));
            }
            if owned.contains(id) {
                return Err(IntegrityError::ChildAtTopLevel(*id));
            }
            if !placed.insert(*id) {
                return Err(IntegrityError::DuplicateInOrder(*id));
            }
        }

        if let Some(id) = self
            .elements
            .keys()
            .find(|id| !placed.contains(id) && !owned.contains(id))
        {
            return Err(IntegrityError::Unplaced(*id));
        }

        if let Some(id) = self.selected_ids.iter().find(|id| !placed.contains(id)) {
            return Err(IntegrityError::DanglingSelection(*id));
        }

        Ok(())
    }
}

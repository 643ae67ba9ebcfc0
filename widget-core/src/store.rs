//! The document store: the only place document state changes.
//!
//! Every change goes through [`DocumentStore::dispatch`], which applies one
//! [`Action`] synchronously, records a history snapshot when the action is
//! undo-relevant, and notifies subscribers with the new immutable state.
//!
//! # Example
//!
//! ```
//! use widget_core::{Action, DocumentStore, EditorConfig, ElementDraft, ElementKind};
//!
//! let mut store = DocumentStore::new(EditorConfig::default());
//! let change = store.dispatch(Action::AddElement {
//!     element: ElementDraft::new(ElementKind::text("Hello", 24.0)),
//! });
//! assert_eq!(change.created.len(), 1);
//!
//! store.dispatch(Action::Undo);
//! assert!(store.document().is_empty());
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::action::Action;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{ElementDraft, ElementId};
use crate::history::History;
use crate::layering::Direction;
use crate::schema::WidgetDocument;
use crate::template::Template;
use crate::CanvasResult;

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Outcome of one dispatch, also delivered to subscribers.
#[derive(Debug, Clone)]
pub struct Change {
    /// Name of the dispatched action.
    pub action: &'static str,
    /// Document state after the action.
    pub state: Arc<Document>,
    /// Ids that did not exist before the action, back to front.
    pub created: Vec<ElementId>,
    /// Ids that no longer exist, back to front as they were painted.
    /// Schedulers must cancel refresh timers for these.
    pub removed: Vec<ElementId>,
    /// Whether a history entry was recorded.
    pub recorded: bool,
}

type Subscriber = Box<dyn FnMut(&Change) + Send>;

/// Owns one document, its history and its subscribers.
pub struct DocumentStore {
    state: Arc<Document>,
    history: History,
    config: EditorConfig,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("config", &self.config)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl DocumentStore {
    /// Create a store holding an empty document of the configured size.
    ///
    /// Out-of-range config values fall back to their defaults, here and in
    /// every other constructor.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let config = config.sanitized();
        let mut document = Document::new(config.canvas_size);
        document.grid_size = config.grid_size;
        Self::with_document(document, config)
    }

    /// Hydrate a store from a persisted widget, validating it strictly.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget violates a structural invariant.
    pub fn from_widget(widget: WidgetDocument, config: EditorConfig) -> CanvasResult<Self> {
        let config = config.sanitized();
        let mut document = widget.into_document()?;
        document.grid_size = config.grid_size;
        Ok(Self::with_document(document, config))
    }

    /// Hydrate a store from a built-in template.
    #[must_use]
    pub fn from_template(template: Template, config: EditorConfig) -> Self {
        let config = config.sanitized();
        let mut document = template
            .build(config.canvas_size)
            .into_document_repaired(&config);
        document.grid_size = config.grid_size;
        Self::with_document(document, config)
    }

    fn with_document(document: Document, config: EditorConfig) -> Self {
        let history = History::new(document.snapshot(), config.history_limit);
        Self {
            state: Arc::new(document),
            history,
            config,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The current state as a shared immutable snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<Document> {
        Arc::clone(&self.state)
    }

    /// Borrow the current state.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.state
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The undo/redo history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Check if `UNDO` would change anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if `REDO` would change anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The current document in its persisted form.
    #[must_use]
    pub fn to_widget(&self) -> WidgetDocument {
        WidgetDocument::from_document(&self.state)
    }

    /// Register a callback invoked after every dispatch.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Apply one action. Never fails: invalid references, arity, locked
    /// elements and exhausted history all end as "nothing happened".
    pub fn dispatch(&mut self, action: Action) -> Change {
        let name = action.name();
        let records = action.records_history();
        let before = self.state.flattened_ids();

        let doc = Arc::make_mut(&mut self.state);
        apply(doc, &mut self.history, &self.config, action);
        if records {
            self.history.push(doc.snapshot());
        }

        let (created, removed) = diff_ids(before, self.state.flattened_ids());

        tracing::debug!(
            action = name,
            created = created.len(),
            removed = removed.len(),
            recorded = records,
            history_index = self.history.index(),
            "Dispatched"
        );

        let change = Change {
            action: name,
            state: Arc::clone(&self.state),
            created,
            removed,
            recorded: records,
        };
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&change);
        }
        change
    }

    /// Replace the document with a persisted widget, repairing it if needed.
    pub fn load(&mut self, widget: WidgetDocument) -> Change {
        self.dispatch(Action::Load {
            elements: widget.elements,
            element_order: widget.element_order,
            canvas_size: widget.canvas_size,
        })
    }

    /// Add an element and return its id.
    pub fn add_element(&mut self, element: ElementDraft) -> Option<ElementId> {
        self.dispatch(Action::AddElement { element })
            .created
            .first()
            .copied()
    }

    /// Step back in history.
    pub fn undo(&mut self) -> Change {
        self.dispatch(Action::Undo)
    }

    /// Step forward in history.
    pub fn redo(&mut self) -> Change {
        self.dispatch(Action::Redo)
    }

    /// Delete every selected element.
    pub fn delete_selection(&mut self) -> Change {
        let ids = self.state.selected_ids().to_vec();
        self.dispatch(Action::DeleteElements { ids })
    }

    /// Move every selected element.
    pub fn move_selection(&mut self, dx: f32, dy: f32) -> Change {
        let ids = self.state.selected_ids().to_vec();
        self.dispatch(Action::MoveElements { ids, dx, dy })
    }

    /// Duplicate the selection and return the new top-level ids.
    pub fn duplicate_selection(&mut self) -> Vec<ElementId> {
        let ids = self.state.selected_ids().to_vec();
        self.dispatch(Action::DuplicateElements { ids });
        self.state.selected_ids().to_vec()
    }

    /// Group the selection and return the new group id.
    pub fn group_selection(&mut self) -> Option<ElementId> {
        let ids = self.state.selected_ids().to_vec();
        let change = self.dispatch(Action::Group { ids });
        change
            .created
            .first()
            .copied()
            .filter(|id| change.state.element(*id).is_some_and(crate::Element::is_group))
    }

    /// Ungroup the primary selection and return the released children.
    pub fn ungroup_selection(&mut self) -> Vec<ElementId> {
        let Some(id) = self.state.primary_selection() else {
            return Vec::new();
        };
        let change = self.dispatch(Action::Ungroup { id });
        if change.removed.contains(&id) {
            change.state.selected_ids().to_vec()
        } else {
            Vec::new()
        }
    }

    /// Reorder the primary selection.
    pub fn reorder_selection(&mut self, direction: Direction) -> Option<Change> {
        let id = self.state.primary_selection()?;
        Some(self.dispatch(Action::Reorder { id, direction }))
    }
}

/// Apply one action to the document. Undo, redo and load also move the
/// history cursor; recording happens in the caller.
fn apply(doc: &mut Document, history: &mut History, config: &EditorConfig, action: Action) {
    let name = action.name();
    match action {
        Action::AddElement { element } => {
            if doc.add(element, config).is_none() {
                tracing::debug!("{name} ignored: groups are created by GROUP");
            }
        }
        Action::DeleteElements { ids } => {
            doc.delete(&ids);
        }
        Action::UpdateElement { id, patch } => {
            if !doc.update(id, &patch, config) {
                tracing::debug!("{name} ignored: {id} unknown or locked");
            }
        }
        Action::MoveElements { ids, dx, dy } => {
            let moved = doc.move_by(&ids, dx, dy);
            tracing::trace!("{name}: moved {moved} of {}", ids.len());
        }
        Action::ResizeElement { id, transform } => {
            if !doc.resize(id, &transform, config) {
                tracing::debug!("{name} ignored: {id} unknown, grouped or locked");
            }
        }
        Action::SelectElements { ids } => doc.select(&ids),
        Action::ToggleSelection { id } => doc.toggle_selection(id),
        Action::SelectAll => doc.select_all(),
        Action::ClearSelection => doc.clear_selection(),
        Action::Reorder { id, direction } => {
            doc.reorder(id, direction);
        }
        Action::Group { ids } => {
            if doc.group(&ids).is_none() {
                tracing::debug!("{name} ignored: fewer than two eligible elements");
            }
        }
        Action::Ungroup { id } => {
            if doc.ungroup(id).is_none() {
                tracing::debug!("{name} ignored: {id} is not an unlocked group");
            }
        }
        Action::DuplicateElements { ids } => {
            doc.duplicate(&ids, config);
        }
        Action::SetLocked { ids, locked } => {
            doc.set_locked(&ids, locked);
        }
        Action::SetCanvasSize { size } => {
            if !doc.set_canvas_size(size) {
                tracing::debug!("{name} ignored: invalid size {size:?}");
            }
        }
        Action::SetGrid { show, grid_size } => doc.set_grid(show, grid_size),
        Action::Undo => {
            if let Some(snapshot) = history.undo() {
                doc.restore(snapshot.clone());
            }
        }
        Action::Redo => {
            if let Some(snapshot) = history.redo() {
                doc.restore(snapshot.clone());
            }
        }
        Action::Load {
            elements,
            element_order,
            canvas_size,
        } => {
            let (show_grid, grid_size) = (doc.show_grid, doc.grid_size);
            *doc = Document::from_parts_repaired(elements, element_order, canvas_size, config);
            doc.show_grid = show_grid;
            doc.grid_size = grid_size;
            history.reset(doc.snapshot());
        }
    }
}

/// Ids present only after (created) and only before (removed), each in
/// paint order.
fn diff_ids(before: Vec<ElementId>, after: Vec<ElementId>) -> (Vec<ElementId>, Vec<ElementId>) {
    let before_set: HashSet<ElementId> = before.iter().copied().collect();
    let after_set: HashSet<ElementId> = after.iter().copied().collect();
    let created = after
        .into_iter()
        .filter(|id| !before_set.contains(id))
        .collect();
    let removed = before
        .into_iter()
        .filter(|id| !after_set.contains(id))
        .collect();
    (created, removed)
}

/// A [`DocumentStore`] behind a mutex, for hosts that touch the document
/// from several threads. Each dispatch runs as one critical section.
///
/// Subscribers run while the lock is held and must not call back into the
/// same shared store.
#[derive(Debug, Clone, Default)]
pub struct SharedDocumentStore {
    inner: Arc<Mutex<DocumentStore>>,
}

impl SharedDocumentStore {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Dispatch under the lock.
    pub fn dispatch(&self, action: Action) -> Change {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .dispatch(action)
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> Arc<Document> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .state()
    }

    /// Register a callback invoked after every dispatch.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change) + Send + 'static,
    {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .subscribe(callback)
    }

    /// Remove a callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .unsubscribe(id)
    }

    /// Run a read-only closure against the store.
    pub fn with<R>(&self, f: impl FnOnce(&DocumentStore) -> R) -> R {
        let store = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&store)
    }
}

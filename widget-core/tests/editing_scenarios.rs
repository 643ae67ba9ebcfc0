//! End-to-end editing scenarios driven through the public store API.

use std::sync::{Arc, Mutex};

use widget_core::{
    Action, CanvasSize, ContentPatch, Direction, DocumentStore, EditorConfig, ElementDraft,
    ElementId, ElementKind, ElementPatch, Template, TextStylePatch, Transform, TransformPatch,
    WidgetDocument,
};

/// Store holding three rectangles A, B, C in paint order.
fn abc() -> (DocumentStore, [ElementId; 3]) {
    let mut store = DocumentStore::default();
    let mut add = |name: &str, x: f32| {
        store
            .add_element(
                ElementDraft::new(ElementKind::Rectangle)
                    .with_name(name)
                    .with_transform(Transform::new(x, 10.0, 40.0, 40.0)),
            )
            .expect("added")
    };
    let a = add("A", 0.0);
    let b = add("B", 50.0);
    let c = add("C", 100.0);
    (store, [a, b, c])
}

fn text_store(font_size: f32, side: f32) -> (DocumentStore, ElementId) {
    let mut store = DocumentStore::default();
    let id = store
        .add_element(
            ElementDraft::new(ElementKind::text("Hello", font_size))
                .with_transform(Transform::new(0.0, 0.0, side, side)),
        )
        .expect("added");
    (store, id)
}

#[test]
fn test_group_then_ungroup_abc() {
    let (mut store, [a, b, c]) = abc();

    let change = store.dispatch(Action::Group { ids: vec![a, c] });
    assert_eq!(change.created.len(), 1);
    let g = change.created[0];

    let doc = store.document();
    let group = doc.element(g).expect("group exists");
    assert_eq!(group.kind.children(), &[a, c]);
    assert_eq!(doc.element_order(), &[b, g]);
    assert_eq!(doc.selected_ids(), &[g]);
    assert_eq!(group.transform, Transform::new(0.0, 10.0, 140.0, 40.0));
    assert!(!doc.is_top_level(a));
    assert_eq!(doc.parent_of(c), Some(g));

    store.dispatch(Action::Ungroup { id: g });
    let doc = store.document();
    assert_eq!(doc.element_order(), &[b, a, c]);
    assert!(doc.element(g).is_none());
    assert_eq!(doc.selected_ids(), &[a, c]);
}

#[test]
fn test_group_with_one_eligible_member_is_noop() {
    let (mut store, [a, b, _]) = abc();
    store.dispatch(Action::SetLocked {
        ids: vec![b],
        locked: true,
    });
    let before = store.to_widget();
    let change = store.dispatch(Action::Group { ids: vec![a, b] });
    assert!(change.created.is_empty());
    assert_eq!(store.to_widget(), before);
}

#[test]
fn test_grouped_children_are_not_top_level_addressable() {
    let (mut store, [a, b, c]) = abc();
    let g = store.dispatch(Action::Group { ids: vec![a, b] }).created[0];
    let before = store.to_widget();

    store.dispatch(Action::DeleteElements { ids: vec![a] });
    store.dispatch(Action::MoveElements {
        ids: vec![b],
        dx: 5.0,
        dy: 5.0,
    });
    store.dispatch(Action::Reorder {
        id: a,
        direction: Direction::Front,
    });
    store.dispatch(Action::SelectElements { ids: vec![a, c] });
    assert_eq!(store.to_widget(), before);
    assert_eq!(store.document().selected_ids(), &[c]);
    assert_eq!(store.document().element_order(), &[g, c]);
}

#[test]
fn test_moving_group_moves_children() {
    let (mut store, [a, _, c]) = abc();
    let g = store.dispatch(Action::Group { ids: vec![a, c] }).created[0];
    store.dispatch(Action::MoveElements {
        ids: vec![g],
        dx: 10.0,
        dy: -5.0,
    });
    let doc = store.document();
    assert_eq!(doc.element(a).map(|e| e.transform.x), Some(10.0));
    assert_eq!(doc.element(c).map(|e| e.transform.y), Some(5.0));
    assert_eq!(doc.element(g).map(|e| e.transform.x), Some(10.0));
}

#[test]
fn test_deleting_group_removes_children() {
    let (mut store, [a, b, c]) = abc();
    let g = store.dispatch(Action::Group { ids: vec![a, c] }).created[0];
    let change = store.dispatch(Action::DeleteElements { ids: vec![g] });
    assert_eq!(change.removed, vec![g, a, c]);
    assert_eq!(store.document().element_order(), &[b]);
    assert_eq!(store.document().element_count(), 1);
}

#[test]
fn test_z_order_boundaries() {
    let (mut store, [a, b, c]) = abc();

    store.dispatch(Action::Reorder {
        id: c,
        direction: Direction::Forward,
    });
    assert_eq!(store.document().element_order(), &[a, b, c]);

    store.dispatch(Action::Reorder {
        id: a,
        direction: Direction::Backward,
    });
    assert_eq!(store.document().element_order(), &[a, b, c]);

    store.dispatch(Action::Reorder {
        id: a,
        direction: Direction::Front,
    });
    assert_eq!(store.document().element_order(), &[b, c, a]);

    store.dispatch(Action::Reorder {
        id: a,
        direction: Direction::Back,
    });
    assert_eq!(store.document().element_order(), &[a, b, c]);
}

#[test]
fn test_text_resize_scales_font() {
    let (mut store, id) = text_store(24.0, 100.0);
    store.dispatch(Action::ResizeElement {
        id,
        transform: TransformPatch::size(150.0, 150.0),
    });
    let font = store.document().element(id).and_then(|e| e.font_size());
    assert_eq!(font, Some(36.0));
}

#[test]
fn test_text_resize_clamps_font() {
    let (mut store, id) = text_store(150.0, 100.0);
    store.dispatch(Action::ResizeElement {
        id,
        transform: TransformPatch::size(400.0, 400.0),
    });
    assert_eq!(
        store.document().element(id).and_then(|e| e.font_size()),
        Some(200.0)
    );

    store.dispatch(Action::ResizeElement {
        id,
        transform: TransformPatch::size(4.0, 4.0),
    });
    assert_eq!(
        store.document().element(id).and_then(|e| e.font_size()),
        Some(8.0)
    );
}

#[test]
fn test_resize_clamps_to_minimum_size() {
    let (mut store, [a, _, _]) = abc();
    store.dispatch(Action::ResizeElement {
        id: a,
        transform: TransformPatch::size(-20.0, 0.0),
    });
    let t = store.document().element(a).expect("present").transform;
    assert!((t.width - 1.0).abs() < f32::EPSILON);
    assert!((t.height - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_text_patch_merges_typography() {
    let (mut store, id) = text_store(24.0, 100.0);
    store.dispatch(Action::UpdateElement {
        id,
        patch: ElementPatch::content(ContentPatch::Text {
            content: Some("Hi {user.name}".to_string()),
            text_style: Some(TextStylePatch {
                color: Some("#000000".to_string()),
                ..TextStylePatch::default()
            }),
        }),
    });
    let element = store.document().element(id).expect("present");
    let ElementKind::Text {
        content,
        text_style,
    } = &element.kind
    else {
        panic!("expected text");
    };
    assert_eq!(content, "Hi {user.name}");
    assert_eq!(text_style.color, "#000000");
    assert!((text_style.font_size - 24.0).abs() < f32::EPSILON);

    let tokens = store.document().binding_tokens();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].1.path(), "user.name");
}

#[test]
fn test_mismatched_content_patch_is_ignored() {
    let (mut store, [a, _, _]) = abc();
    let before = store.to_widget();
    let change = store.dispatch(Action::UpdateElement {
        id: a,
        patch: ElementPatch::content(ContentPatch::Text {
            content: Some("nope".to_string()),
            text_style: None,
        }),
    });
    assert!(change.recorded);
    assert_eq!(store.to_widget(), before);
}

#[test]
fn test_move_batch_skips_locked_members() {
    let (mut store, [a, b, c]) = abc();
    store.dispatch(Action::SetLocked {
        ids: vec![b],
        locked: true,
    });
    store.dispatch(Action::MoveElements {
        ids: vec![a, b, c],
        dx: 1.0,
        dy: 0.0,
    });
    let x = |id| store.document().element(id).map(|e| e.transform.x);
    assert_eq!(x(a), Some(1.0));
    assert_eq!(x(b), Some(50.0));
    assert_eq!(x(c), Some(101.0));
}

#[test]
fn test_locked_group_cannot_be_ungrouped() {
    let (mut store, [a, _, c]) = abc();
    let g = store.dispatch(Action::Group { ids: vec![a, c] }).created[0];
    store.dispatch(Action::SetLocked {
        ids: vec![g],
        locked: true,
    });
    store.dispatch(Action::Ungroup { id: g });
    assert!(store.document().element(g).is_some());
    assert!(store.document().is_effectively_locked(a));
}

#[test]
fn test_duplicate_offsets_and_selects_copies() {
    let (mut store, [a, _, c]) = abc();
    store.dispatch(Action::SelectElements { ids: vec![c, a] });
    let copies = store.duplicate_selection();
    assert_eq!(copies.len(), 2);

    let doc = store.document();
    assert_eq!(&doc.element_order()[3..], copies.as_slice());
    let first = doc.element(copies[0]).expect("copy");
    assert_eq!(first.name, "A");
    assert_eq!(first.transform, Transform::new(10.0, 20.0, 40.0, 40.0));
}

#[test]
fn test_duplicate_group_copies_children() {
    let (mut store, [a, _, c]) = abc();
    let g = store.dispatch(Action::Group { ids: vec![a, c] }).created[0];
    let change = store.dispatch(Action::DuplicateElements { ids: vec![g] });
    assert_eq!(change.created.len(), 3);

    let doc = store.document();
    let copy = doc.element(change.created[0]).expect("group copy");
    assert_eq!(copy.kind.children().len(), 2);
    assert!(!copy.kind.children().contains(&a));
    assert!(doc.check_integrity().is_ok());
}

#[test]
fn test_undo_redo_walks_history() {
    let (mut store, [a, b, c]) = abc();
    store.dispatch(Action::DeleteElements { ids: vec![b] });
    assert_eq!(store.document().element_order(), &[a, c]);

    store.undo();
    assert_eq!(store.document().element_order(), &[a, b, c]);
    store.undo();
    assert_eq!(store.document().element_order(), &[a, b]);

    store.redo();
    store.redo();
    assert_eq!(store.document().element_order(), &[a, c]);
    assert!(!store.can_redo());

    let change = store.redo();
    assert!(!change.recorded);
    assert_eq!(store.document().element_order(), &[a, c]);
}

#[test]
fn test_history_limit_drops_oldest() {
    let config = EditorConfig {
        history_limit: 3,
        ..EditorConfig::default()
    };
    let mut store = DocumentStore::new(config);
    for _ in 0..5 {
        store.add_element(ElementDraft::new(ElementKind::Ellipse));
    }
    for _ in 0..10 {
        store.undo();
    }
    assert_eq!(store.document().element_count(), 2);
}

#[test]
fn test_canvas_and_grid_are_not_recorded() {
    let (mut store, _) = abc();
    let index = store.history().index();
    store.dispatch(Action::SetCanvasSize {
        size: CanvasSize::new(200.0, 100.0),
    });
    store.dispatch(Action::SetGrid {
        show: true,
        grid_size: Some(20.0),
    });
    assert_eq!(store.history().index(), index);
    assert_eq!(store.document().canvas_size(), CanvasSize::new(200.0, 100.0));
    assert!(store.document().show_grid());

    store.undo();
    assert_eq!(store.document().canvas_size(), CanvasSize::new(200.0, 100.0));
}

#[test]
fn test_load_repairs_and_resets() {
    let (mut store, [a, b, _]) = abc();
    let mut widget = store.to_widget();
    widget.element_order = vec![b, b, ElementId::new()];
    store.load(widget);

    let doc = store.document();
    assert!(doc.check_integrity().is_ok());
    assert_eq!(doc.element_order()[0], b);
    assert!(doc.element_order().contains(&a));
    assert_eq!(doc.element_order().len(), 3);
    assert!(!store.can_undo());
}

#[test]
fn test_strict_load_rejects_broken_document() {
    let (store, [a, _, _]) = abc();
    let mut widget = store.to_widget();
    widget.element_order.push(a);
    assert!(DocumentStore::from_widget(widget, EditorConfig::default()).is_err());
}

#[test]
fn test_persisted_bytes_are_stable() {
    let mut store = DocumentStore::from_template(Template::Greeting, EditorConfig::default());
    store.move_selection(3.0, 3.0);
    store.dispatch(Action::SelectAll);
    store.move_selection(1.5, 0.25);

    let json = store.to_widget().to_json().expect("serialize");
    let reparsed = WidgetDocument::from_json(&json).expect("parse");
    assert_eq!(reparsed.to_json().expect("serialize"), json);
}

#[test]
fn test_subscribers_see_removed_ids() {
    let (mut store, [a, b, _]) = abc();
    let removed: Arc<Mutex<Vec<ElementId>>> = Arc::default();
    let sink = Arc::clone(&removed);
    store.subscribe(move |change| {
        sink.lock()
            .expect("lock")
            .extend_from_slice(&change.removed);
    });
    store.dispatch(Action::DeleteElements { ids: vec![a, b] });
    assert_eq!(*removed.lock().expect("lock"), vec![a, b]);
}

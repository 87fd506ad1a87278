use std::collections::HashSet;

use treeview::prelude::*;

/// root -> [A -> [A1, A2 -> [A2x]], B, C -> [C1]]
fn model() -> MemoryModel {
    let model = MemoryModel::new("root");
    let a = model.add_child(MemoryModel::ROOT, "A").unwrap();
    model.add_child(MemoryModel::ROOT, "B").unwrap();
    let c = model.add_child(MemoryModel::ROOT, "C").unwrap();
    model.add_child(a, "A1").unwrap();
    let a2 = model.add_child(a, "A2").unwrap();
    model.add_child(a2, "A2x").unwrap();
    model.add_child(c, "C1").unwrap();
    model
}

fn labels(model: &MemoryModel, layer: &RowLayer<NodeKey>) -> Vec<String> {
    layer
        .visible_rows()
        .iter()
        .map(|row| model.label_at(&layer.path(*row).unwrap()).unwrap())
        .collect()
}

fn row(model: &MemoryModel, layer: &RowLayer<NodeKey>, label: &str) -> RowId {
    *layer
        .visible_rows()
        .iter()
        .find(|row| model.label_at(&layer.path(**row).unwrap()).as_deref() == Some(label))
        .unwrap()
}

/// Pre-order walk of the model, descending only into expanded rows.
fn expected(model: &MemoryModel, layer: &RowLayer<NodeKey>) -> Vec<TreePath<NodeKey>> {
    fn walk(
        model: &MemoryModel,
        layer: &RowLayer<NodeKey>,
        path: TreePath<NodeKey>,
        show: bool,
        out: &mut Vec<TreePath<NodeKey>>,
    ) {
        let Some(id) = layer.find(&path) else {
            return;
        };
        if show {
            out.push(path.clone());
        }
        if layer.is_expanded(id) {
            for key in model.children(&path) {
                walk(model, layer, path.child(key), true, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(model, layer, TreePath::root(), layer.shows_root(), &mut out);
    out
}

/// Flat list is the pre-order projection and indices agree both ways.
fn assert_consistent(model: &MemoryModel, layer: &RowLayer<NodeKey>) {
    let paths: Vec<_> = layer
        .visible_rows()
        .iter()
        .map(|row| layer.path(*row).unwrap())
        .collect();
    assert_eq!(paths, expected(model, layer));

    let unique: HashSet<_> = layer.visible_rows().iter().collect();
    assert_eq!(unique.len(), layer.len(), "duplicate rows in flat list");

    for index in 0..layer.len() {
        let row = layer.row_at(index).unwrap();
        assert_eq!(layer.index_of(row), Some(index));
    }
    assert_eq!(layer.row_at(layer.len()), None);
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_preorder_after_mixed_expansion() {
    let model = model();
    let mut layer = RowLayer::new(true, false);
    layer.attach(&model);
    let root = layer.root().unwrap();

    assert!(layer.expand(&model, root));
    assert_consistent(&model, &layer);

    let c = row(&model, &layer, "C");
    assert!(layer.expand(&model, c));
    let a = row(&model, &layer, "A");
    assert!(layer.expand(&model, a));
    let a2 = row(&model, &layer, "A2");
    assert!(layer.expand(&model, a2));
    assert_eq!(
        labels(&model, &layer),
        ["root", "A", "A1", "A2", "A2x", "B", "C", "C1"]
    );
    assert_consistent(&model, &layer);

    layer.collapse(a);
    assert_eq!(labels(&model, &layer), ["root", "A", "B", "C", "C1"]);
    assert_consistent(&model, &layer);
}

#[test]
fn test_expand_is_idempotent() {
    let model = model();
    let mut layer = RowLayer::new(true, false);
    layer.attach(&model);
    let root = layer.root().unwrap();
    assert!(layer.expand(&model, root));
    assert!(!layer.expand(&model, root));
    assert_eq!(layer.len(), 4);

    let b = row(&model, &layer, "B");
    assert!(layer.is_leaf(b));
    assert!(!layer.expand(&model, b));
    assert_eq!(layer.collapse(b), None);
}

#[test]
fn test_collapse_expand_restores_nested_expansion() {
    let model = model();
    let mut layer = RowLayer::new(true, false);
    layer.attach(&model);
    layer.expand_all(&model, layer.root().unwrap());
    let before = labels(&model, &layer);
    let a = row(&model, &layer, "A");

    layer.collapse(a);
    layer.expand(&model, a);
    assert_eq!(labels(&model, &layer), before);
    assert_consistent(&model, &layer);
}

#[test]
fn test_evicting_collapse_releases_rows() {
    let model = model();
    let mut layer = RowLayer::new(true, true);
    layer.attach(&model);
    let root = layer.root().unwrap();
    layer.expand(&model, root);
    let a = row(&model, &layer, "A");
    layer.expand(&model, a);
    let a1 = row(&model, &layer, "A1");

    let released = layer.collapse(a).unwrap();
    assert!(released.contains(&a1));
    assert!(!layer.contains(a1));
    assert!(!layer.is_fetched(a));

    layer.expand(&model, a);
    let fresh = row(&model, &layer, "A1");
    assert_ne!(fresh, a1, "stale handle must not alias the new row");
    assert_consistent(&model, &layer);
}

#[test]
fn test_hidden_root_shows_children_at_level_zero() {
    let model = model();
    let mut layer = RowLayer::new(false, false);
    layer.attach(&model);
    assert_eq!(labels(&model, &layer), ["A", "B", "C"]);

    let a = row(&model, &layer, "A");
    assert_eq!(layer.level(a), Some(0));
    assert_eq!(layer.depth(a), Some(1));
    assert_eq!(layer.collapse(layer.root().unwrap()), None);
    assert_consistent(&model, &layer);
}

#[test]
fn test_expand_all_then_collapse_all() {
    let model = model();
    let mut layer = RowLayer::new(true, false);
    layer.attach(&model);
    let root = layer.root().unwrap();

    assert!(layer.expand_all(&model, root));
    assert_eq!(layer.len(), 8);
    assert_consistent(&model, &layer);

    assert!(layer.collapse_all(root).is_some());
    assert_eq!(layer.len(), 1);
    layer.expand(&model, root);
    // Descendants come back collapsed.
    assert_eq!(labels(&model, &layer), ["root", "A", "B", "C"]);
}

#[test]
fn test_deferred_node_without_children_becomes_leaf() {
    let model = MemoryModel::new("root");
    model.add_deferred(MemoryModel::ROOT, "lazy").unwrap();
    let mut layer = RowLayer::new(false, false);
    layer.attach(&model);

    let lazy = layer.row_at(0).unwrap();
    assert!(!layer.is_leaf(lazy));
    assert!(!layer.expand(&model, lazy));
    assert!(layer.is_leaf(lazy));
    assert!(layer.is_fetched(lazy));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_find_and_visible_between() {
    let model = model();
    let mut layer = RowLayer::new(true, false);
    layer.attach(&model);
    layer.expand_all(&model, layer.root().unwrap());

    let a1 = row(&model, &layer, "A1");
    let b = row(&model, &layer, "B");
    let path = layer.path(a1).unwrap();
    assert_eq!(layer.find(&path), Some(a1));

    let span = layer.visible_between(b, a1).unwrap();
    assert_eq!(span.len(), 4);
    assert_eq!(span.first(), Some(&a1));
    assert_eq!(span.last(), Some(&b));
}

#[test]
fn test_subtree_range() {
    let model = model();
    let mut layer = RowLayer::new(true, false);
    layer.attach(&model);
    layer.expand_all(&model, layer.root().unwrap());

    let a = row(&model, &layer, "A");
    assert_eq!(layer.subtree_range(a), Some(1..5));
    assert_eq!(layer.visible_descendant_count(a), 3);
    let a2x = row(&model, &layer, "A2x");
    assert!(layer.is_ancestor(a, a2x));
    assert!(!layer.is_ancestor(a2x, a));
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_viewport_follows_focus_with_page_keys() {
    let model = MemoryModel::new("root");
    for i in 0..50 {
        model.add_child(MemoryModel::ROOT, format!("item {i}")).unwrap();
    }
    let mut view = TreeView::with_model(
        std::sync::Arc::new(model),
        TreeConfig::default().with_show_root(false),
    );
    view.set_size(40, 10);
    assert_eq!(view.viewport().visible_range(view.rows().len()), 0..10);

    view.key_down(&KeyInput::new(Key::Down));
    assert_eq!(view.current(), view.row_at(0));
    view.key_down(&KeyInput::new(Key::PageDown));
    assert_eq!(view.current(), view.row_at(10));
    assert_eq!(view.viewport().offset(), 1);

    view.key_down(&KeyInput::new(Key::End));
    assert_eq!(view.current(), view.row_at(49));
    assert_eq!(view.viewport().visible_range(50), 40..50);

    view.key_down(&KeyInput::new(Key::PageUp));
    assert_eq!(view.current(), view.row_at(39));
    assert_eq!(view.viewport().offset(), 39);
}

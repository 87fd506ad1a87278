use std::sync::Arc;

use treeview::prelude::*;

/// root (hidden) -> [A -> [A1, A2], B -> [B1], C]
fn view(config: TreeConfig) -> (Arc<MemoryModel>, TreeView<MemoryModel>) {
    let model = Arc::new(MemoryModel::new("root"));
    let a = model.add_child(MemoryModel::ROOT, "A").unwrap();
    let b = model.add_child(MemoryModel::ROOT, "B").unwrap();
    model.add_child(MemoryModel::ROOT, "C").unwrap();
    model.add_child(a, "A1").unwrap();
    model.add_child(a, "A2").unwrap();
    model.add_child(b, "B1").unwrap();
    let mut view = TreeView::with_model(model.clone(), config.with_show_root(false));
    let labels = model.clone();
    view.add_control(
        TextControl::new(move |row: &RowInfo<NodeKey>| labels.label_at(&row.path).unwrap_or_default())
            .editable(),
    );
    view.drain_events();
    (model, view)
}

fn multi() -> TreeConfig {
    TreeConfig::default().with_selection_mode(SelectionMode::Multi)
}

fn key(view: &mut TreeView<MemoryModel>, key: Key) -> bool {
    view.key_down(&KeyInput::new(key))
}

fn labels(model: &MemoryModel, view: &TreeView<MemoryModel>, rows: &[RowId]) -> Vec<String> {
    rows.iter()
        .map(|row| model.label_at(&view.path(*row).unwrap()).unwrap())
        .collect()
}

fn visible(model: &MemoryModel, view: &TreeView<MemoryModel>) -> Vec<String> {
    labels(model, view, view.rows().visible_rows())
}

fn selected(model: &MemoryModel, view: &TreeView<MemoryModel>) -> Vec<String> {
    labels(model, view, &view.selected_rows())
}

fn current(model: &MemoryModel, view: &TreeView<MemoryModel>) -> Option<String> {
    view.current()
        .and_then(|row| view.path(row))
        .and_then(|path| model.label_at(&path))
}

/// Column just right of the expander for a row at `level`: the label cell.
fn label_x(level: u16) -> u16 {
    level * 2 + 2
}

fn click(view: &mut TreeView<MemoryModel>, x: u16, y: u16, modifiers: Modifiers) {
    let input = MouseInput::left(x, y).with_modifiers(modifiers);
    view.mouse_down(&input);
    view.mouse_up(&input);
}

// ============================================================================
// Keyboard navigation
// ============================================================================

#[test]
fn test_arrows_move_and_reselect_in_single_mode() {
    let (model, mut view) = view(TreeConfig::default());
    assert!(key(&mut view, Key::Down));
    assert_eq!(current(&model, &view).as_deref(), Some("A"));
    assert_eq!(selected(&model, &view), ["A"]);

    key(&mut view, Key::Down);
    key(&mut view, Key::Down);
    assert_eq!(selected(&model, &view), ["C"]);
    // Clamped at the end.
    key(&mut view, Key::Down);
    assert_eq!(current(&model, &view).as_deref(), Some("C"));

    key(&mut view, Key::Home);
    assert_eq!(selected(&model, &view), ["A"]);
    key(&mut view, Key::End);
    assert_eq!(selected(&model, &view), ["C"]);
}

#[test]
fn test_right_and_left_walk_the_hierarchy() {
    let (model, mut view) = view(TreeConfig::default());
    key(&mut view, Key::Down);

    key(&mut view, Key::Right);
    assert_eq!(visible(&model, &view), ["A", "A1", "A2", "B", "C"]);
    key(&mut view, Key::Right);
    assert_eq!(current(&model, &view).as_deref(), Some("A1"));

    key(&mut view, Key::Left);
    assert_eq!(current(&model, &view).as_deref(), Some("A"));
    key(&mut view, Key::Left);
    assert_eq!(visible(&model, &view), ["A", "B", "C"]);
}

#[test]
fn test_plus_minus_star() {
    let (model, mut view) = view(TreeConfig::default());
    key(&mut view, Key::Down);
    key(&mut view, Key::Down);
    assert!(key(&mut view, Key::Char('+')));
    assert_eq!(visible(&model, &view), ["A", "B", "B1", "C"]);
    assert!(key(&mut view, Key::Char('-')));
    assert_eq!(visible(&model, &view), ["A", "B", "C"]);
    assert!(!key(&mut view, Key::Char('-')));

    key(&mut view, Key::Home);
    assert!(key(&mut view, Key::Char('*')));
    assert_eq!(visible(&model, &view), ["A", "A1", "A2", "B", "C"]);
}

#[test]
fn test_keys_without_rows_are_not_consumed() {
    let model = Arc::new(MemoryModel::new("empty"));
    let mut view = TreeView::with_model(model, TreeConfig::default().with_show_root(false));
    assert!(!key(&mut view, Key::Down));
}

#[test]
fn test_enter_activates_current() {
    let (_, mut view) = view(TreeConfig::default());
    key(&mut view, Key::Down);
    view.drain_events();
    assert!(key(&mut view, Key::Enter));
    assert_eq!(
        view.drain_events(),
        vec![TreeEvent::Activated(view.row_at(0).unwrap())]
    );
}

#[test]
fn test_shift_arrows_extend_from_anchor() {
    let (model, mut view) = view(multi());
    key(&mut view, Key::Down);
    view.key_down(&KeyInput::new(Key::Down).shift());
    view.key_down(&KeyInput::new(Key::Down).shift());
    assert_eq!(selected(&model, &view), ["A", "B", "C"]);

    view.key_down(&KeyInput::new(Key::Up).shift());
    assert_eq!(selected(&model, &view), ["A", "B"]);
}

#[test]
fn test_ctrl_arrows_move_focus_and_ctrl_space_toggles() {
    let (model, mut view) = view(multi());
    key(&mut view, Key::Down);
    view.key_down(&KeyInput::new(Key::Down).ctrl());
    view.key_down(&KeyInput::new(Key::Down).ctrl());
    assert_eq!(current(&model, &view).as_deref(), Some("C"));
    assert_eq!(selected(&model, &view), ["A"]);

    view.key_down(&KeyInput::new(Key::Space).ctrl());
    assert_eq!(selected(&model, &view), ["A", "C"]);
    view.key_down(&KeyInput::new(Key::Space).ctrl());
    assert_eq!(selected(&model, &view), ["A"]);
}

#[test]
fn test_ctrl_a_and_escape() {
    let (model, mut view) = view(multi());
    view.key_down(&KeyInput::new(Key::Char('a')).ctrl());
    assert_eq!(selected(&model, &view), ["A", "B", "C"]);
    assert!(key(&mut view, Key::Escape));
    assert!(view.selection().is_empty());
}

// ============================================================================
// Mouse
// ============================================================================

#[test]
fn test_shift_click_without_anchor_is_plain_click() {
    let (model, mut view) = view(multi());
    click(&mut view, label_x(0), 1, Modifiers::SHIFT);
    assert_eq!(selected(&model, &view), ["B"]);
    assert_eq!(view.selection().anchor(), view.row_at(1));
}

#[test]
fn test_click_below_rows_clears() {
    let (_, mut view) = view(multi());
    click(&mut view, label_x(0), 0, Modifiers::NONE);
    assert_eq!(view.selection().len(), 1);
    click(&mut view, label_x(0), 10, Modifiers::NONE);
    assert!(view.selection().is_empty());
}

#[test]
fn test_press_on_multi_selection_narrows_on_release() {
    let (model, mut view) = view(multi());
    view.key_down(&KeyInput::new(Key::Char('a')).ctrl());

    let press = MouseInput::left(label_x(0), 1);
    view.mouse_down(&press);
    // Still selected while the button is down, so the rows can be dragged.
    assert_eq!(selected(&model, &view), ["A", "B", "C"]);
    view.mouse_up(&press);
    assert_eq!(selected(&model, &view), ["B"]);
}

#[test]
fn test_double_click_activates_and_toggles() {
    let (model, mut view) = view(TreeConfig::default());
    let input = MouseInput::left(label_x(0), 0);
    view.mouse_down(&input);
    view.mouse_up(&input);
    view.drain_events();

    view.mouse_down(&input.double());
    view.mouse_up(&input.double());
    let row = view.row_at(0).unwrap();
    let events = view.drain_events();
    assert!(events.contains(&TreeEvent::Activated(row)));
    assert!(events.contains(&TreeEvent::Expanded(row)));
    assert_eq!(visible(&model, &view), ["A", "A1", "A2", "B", "C"]);
}

#[test]
fn test_right_click_keeps_existing_selection() {
    let (model, mut view) = view(multi());
    view.key_down(&KeyInput::new(Key::Char('a')).ctrl());
    let input = MouseInput::new(MouseButton::Right, label_x(0), 2);
    view.mouse_down(&input);
    assert_eq!(selected(&model, &view), ["A", "B", "C"]);
    assert_eq!(current(&model, &view).as_deref(), Some("C"));

    view.clear_selection();
    view.mouse_down(&MouseInput::new(MouseButton::Right, label_x(0), 1));
    assert_eq!(selected(&model, &view), ["B"]);
}

#[test]
fn test_disabled_view_ignores_input() {
    let (_, mut view) = view(TreeConfig::default());
    view.set_enabled(false);
    assert!(!key(&mut view, Key::Down));
    assert_eq!(view.current(), None);
}

// ============================================================================
// Drag
// ============================================================================

#[test]
fn test_drag_past_threshold_and_drop() {
    let (_, mut view) = view(multi());
    let a = view.row_at(0).unwrap();
    let c = view.row_at(2).unwrap();

    view.mouse_down(&MouseInput::left(label_x(0), 0));
    // Below the threshold nothing happens.
    assert!(!view.mouse_move(&MouseInput::left(label_x(0) + 1, 0)));
    assert_eq!(view.input_state(), InputStateKind::Normal);

    assert!(view.mouse_move(&MouseInput::left(label_x(0), 2)));
    assert_eq!(view.input_state(), InputStateKind::Dragging);
    assert_eq!(view.drag().unwrap().rows, vec![a]);
    // The move that starts the drag does not pick a target yet.
    assert_eq!(view.drag().unwrap().target, None);

    view.mouse_move(&MouseInput::left(label_x(0), 2));
    assert_eq!(
        view.drag().unwrap().target,
        Some(DropTarget {
            row: c,
            position: DropPosition::Inside,
        })
    );

    view.drain_events();
    view.mouse_up(&MouseInput::left(label_x(0), 2));
    assert_eq!(
        view.drain_events(),
        vec![TreeEvent::Dropped {
            rows: vec![a],
            target: DropTarget {
                row: c,
                position: DropPosition::Inside,
            },
        }]
    );
    assert_eq!(view.input_state(), InputStateKind::Normal);
}

#[test]
fn test_drag_onto_own_descendant_is_refused() {
    let (_, mut view) = view(multi());
    let a = view.row_at(0).unwrap();
    view.expand(a);
    view.mouse_down(&MouseInput::left(label_x(0), 0));
    view.mouse_move(&MouseInput::left(label_x(1), 2));
    assert_eq!(view.drag().unwrap().target, None);

    view.drain_events();
    view.mouse_up(&MouseInput::left(label_x(1), 2));
    assert_eq!(view.drain_events(), vec![TreeEvent::DragCancelled]);
}

#[test]
fn test_escape_cancels_drag() {
    let (_, mut view) = view(multi());
    view.mouse_down(&MouseInput::left(label_x(0), 0));
    view.mouse_move(&MouseInput::left(label_x(0), 2));
    view.drain_events();

    assert!(key(&mut view, Key::Escape));
    assert_eq!(view.drain_events(), vec![TreeEvent::DragCancelled]);
    assert!(view.drag().is_none());
    // Escape went to the drag, not the selection.
    assert_eq!(view.selection().len(), 1);
}

#[test]
fn test_drag_disabled_by_config() {
    let (_, mut view) = view(multi().with_allow_drag(false));
    view.mouse_down(&MouseInput::left(label_x(0), 0));
    assert!(!view.mouse_move(&MouseInput::left(label_x(0), 3)));
    assert!(view.drag().is_none());
}

// ============================================================================
// Label editing
// ============================================================================

#[test]
fn test_f2_edits_and_enter_commits() {
    let (_, mut view) = view(TreeConfig::default().with_label_edit(true));
    key(&mut view, Key::Down);
    view.drain_events();
    let a = view.row_at(0).unwrap();

    assert!(key(&mut view, Key::F(2)));
    assert_eq!(view.input_state(), InputStateKind::Editing);
    assert_eq!(
        view.drain_events(),
        vec![TreeEvent::EditStarted { row: a, control: 0 }]
    );
    // Navigation keys belong to the editor now.
    assert!(!key(&mut view, Key::Down));
    assert_eq!(view.current(), Some(a));

    assert!(key(&mut view, Key::Enter));
    assert_eq!(
        view.drain_events(),
        vec![TreeEvent::EditCommitted { row: a, control: 0 }]
    );
    assert_eq!(view.input_state(), InputStateKind::Normal);
}

#[test]
fn test_f2_ignored_without_label_edit() {
    let (_, mut view) = view(TreeConfig::default());
    key(&mut view, Key::Down);
    assert!(!key(&mut view, Key::F(2)));
    assert!(view.editing().is_none());
}

#[test]
fn test_click_on_current_row_starts_edit_and_escape_cancels() {
    let (_, mut view) = view(TreeConfig::default().with_label_edit(true));
    click(&mut view, label_x(0), 1, Modifiers::NONE);
    assert!(view.editing().is_none());

    click(&mut view, label_x(0), 1, Modifiers::NONE);
    let b = view.row_at(1).unwrap();
    assert_eq!(view.editing().map(|edit| edit.row), Some(b));

    view.drain_events();
    assert!(key(&mut view, Key::Escape));
    assert_eq!(
        view.drain_events(),
        vec![TreeEvent::EditCancelled { row: b, control: 0 }]
    );
}

#[test]
fn test_click_elsewhere_commits_then_selects() {
    let (model, mut view) = view(TreeConfig::default().with_label_edit(true));
    key(&mut view, Key::Down);
    key(&mut view, Key::F(2));
    view.drain_events();

    click(&mut view, label_x(0), 2, Modifiers::NONE);
    let events = view.drain_events();
    assert_eq!(
        events.first(),
        Some(&TreeEvent::EditCommitted {
            row: view.row_at(0).unwrap(),
            control: 0,
        })
    );
    assert_eq!(selected(&model, &view), ["C"]);
    assert!(view.editing().is_none());
}

#[test]
fn test_edit_api_errors() {
    let (_, mut view) = view(TreeConfig::default());
    assert_eq!(view.commit_edit(), Err(TreeError::NoEditSession));
    let a = view.row_at(0).unwrap();
    assert_eq!(view.begin_edit(a, 7), Err(TreeError::NotEditable(a)));
    assert!(view.begin_edit(a, 0).is_ok());
    assert!(view.cancel_edit().is_ok());
}

#[test]
fn test_collapse_cancels_edit_on_hidden_row() {
    let (_, mut view) = view(TreeConfig::default());
    let a = view.row_at(0).unwrap();
    view.expand(a);
    let a1 = view.row_at(1).unwrap();
    view.begin_edit(a1, 0).unwrap();
    view.drain_events();

    view.collapse(a);
    assert!(view.editing().is_none());
    assert!(
        view.drain_events()
            .contains(&TreeEvent::EditCancelled { row: a1, control: 0 })
    );
}

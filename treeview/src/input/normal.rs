//! Plain input, plus the navigation and pointer handling every steady
//! state shares.

use log::debug;

use super::{InputHandler, InputSession, Key, KeyInput, MouseButton, MouseInput, Press, RowHit};
use super::{DragSession, edit};
use crate::TreeEvent;
use crate::model::TreeModel;
use crate::rows::RowId;
use crate::view::TreeView;

/// What a steady state does when a gesture lands on a row.
///
/// Defaults are the plain behavior; Shift and Ctrl override the parts they
/// change and reuse the rest of the key and pointer handling.
pub(crate) trait Gesture {
    /// Keyboard navigation arrived at `row`.
    fn focus_row<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        select_and_focus(view, row);
    }

    /// Left click on `row`.
    fn click_row<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        select_and_focus(view, row);
    }

    /// Space on the current row.
    fn space<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        select_and_focus(view, row);
    }

    /// Left click below the last row.
    fn click_empty<M: TreeModel>(&self, view: &mut TreeView<M>) {
        view.clear_selection();
    }
}

/// Select `row` alone (if it may be selected) and move focus to it.
pub(crate) fn select_and_focus<M: TreeModel>(view: &mut TreeView<M>, row: RowId) {
    if view.can_select(row) {
        view.select(row);
    }
    view.set_current(row);
    view.scroll_to(row);
}

/// Keys handled the same way in every steady state.
pub(crate) fn key_down<G: Gesture, M: TreeModel>(
    gesture: &G,
    view: &mut TreeView<M>,
    session: &mut InputSession,
    input: &KeyInput,
) -> bool {
    let len = view.rows().len();
    if len == 0 {
        return false;
    }
    let current = view.current().filter(|row| view.rows().is_visible(*row));
    let index = current.and_then(|row| view.index_of(row));
    let page = view.viewport().page_size();
    let last = len - 1;

    let target = match input.key {
        Key::Up => Some(index.map_or(0, |i| i.saturating_sub(1))),
        Key::Down => Some(index.map_or(0, |i| (i + 1).min(last))),
        Key::PageUp => Some(index.map_or(0, |i| i.saturating_sub(page))),
        Key::PageDown => Some(index.map_or(0, |i| (i + page).min(last))),
        Key::Home => Some(0),
        Key::End => Some(last),
        _ => None,
    };
    if let Some(target) = target {
        if let Some(row) = view.row_at(target) {
            gesture.focus_row(view, row);
        }
        return true;
    }

    if input.key == Key::Char('a') && input.modifiers.ctrl {
        view.select_all();
        return true;
    }
    if input.key == Key::Escape {
        view.clear_selection();
        return true;
    }

    let Some(row) = current else {
        return false;
    };
    match input.key {
        Key::Left => {
            if view.rows().is_expanded(row) && view.collapse(row) {
                return true;
            }
            if let Some(parent) = view.rows().parent(row)
                && view.rows().is_visible(parent)
            {
                gesture.focus_row(view, parent);
            }
            true
        }
        Key::Right => {
            if !view.rows().is_expanded(row) {
                view.expand(row);
            } else if let Some(child) = view.rows().children(row).first().copied() {
                gesture.focus_row(view, child);
            }
            true
        }
        Key::Char('+') => view.expand(row),
        Key::Char('-') => view.collapse(row),
        Key::Char('*') => view.expand_all(row),
        Key::Enter => {
            view.activate(row);
            true
        }
        Key::Space => {
            gesture.space(view, row);
            true
        }
        Key::F(2) if view.config().label_edit => {
            edit::begin_first(view, session, row).is_ok()
        }
        _ => false,
    }
}

/// Pointer press handled the same way in every steady state.
pub(crate) fn mouse_down<G: Gesture, M: TreeModel>(
    gesture: &G,
    view: &mut TreeView<M>,
    session: &mut InputSession,
    input: &MouseInput,
    hit: Option<RowHit>,
) -> bool {
    session.press = None;
    let Some(hit) = hit else {
        if input.button == MouseButton::Left {
            gesture.click_empty(view);
            return true;
        }
        return false;
    };

    match input.button {
        MouseButton::Left if hit.on_expander => {
            view.toggle_expand(hit.row);
            true
        }
        MouseButton::Left if input.clicks >= 2 => {
            view.activate(hit.row);
            if !view.rows().is_leaf(hit.row) {
                view.toggle_expand(hit.row);
            }
            true
        }
        MouseButton::Left => {
            let selected = view.is_selected(hit.row);
            let plain = input.modifiers.none();
            let deferred = plain && selected && view.selection().len() > 1;
            let edit_control = if plain
                && view.config().label_edit
                && selected
                && view.selection().len() == 1
                && view.current() == Some(hit.row)
            {
                hit.control
                    .filter(|control| view.is_editable(hit.row, *control))
            } else {
                None
            };

            if deferred {
                view.set_current(hit.row);
            } else {
                gesture.click_row(view, hit.row);
            }
            session.press = Some(Press {
                row: hit.row,
                x: input.x,
                y: input.y,
                deferred,
                edit_control,
            });
            true
        }
        MouseButton::Right => {
            // Context clicks keep a selection the row is already part of.
            if view.is_selected(hit.row) {
                view.set_current(hit.row);
            } else {
                select_and_focus(view, hit.row);
            }
            true
        }
        MouseButton::Middle => false,
    }
}

/// Release of a press that did not turn into a drag.
pub(crate) fn mouse_up<M: TreeModel>(
    view: &mut TreeView<M>,
    session: &mut InputSession,
    hit: Option<RowHit>,
) -> bool {
    let Some(press) = session.press.take() else {
        return false;
    };
    let released_on_press = hit.is_some_and(|hit| hit.row == press.row);
    if press.deferred && released_on_press {
        select_and_focus(view, press.row);
    }
    if let Some(control) = press.edit_control
        && released_on_press
        && let Err(err) = edit::begin(view, session, press.row, control)
    {
        debug!("edit not started on {}: {}", press.row, err);
    }
    true
}

/// Start a drag once the pointer travels past the threshold with a
/// selected row pressed.
pub(crate) fn mouse_move<M: TreeModel>(
    view: &mut TreeView<M>,
    session: &mut InputSession,
    input: &MouseInput,
) -> bool {
    let Some(press) = session.press else {
        return false;
    };
    if !view.config().allow_drag || input.button != MouseButton::Left {
        return false;
    }
    let distance = press.x.abs_diff(input.x).max(press.y.abs_diff(input.y));
    if distance < view.config().drag_threshold || !view.is_selected(press.row) {
        return false;
    }
    let rows = view.selected_rows();
    debug!("drag started with {} rows", rows.len());
    session.press = None;
    session.drag = Some(DragSession {
        rows: rows.clone(),
        target: None,
    });
    view.push_event(TreeEvent::DragStarted { rows });
    true
}

/// No modifier held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalInput;

impl Gesture for NormalInput {}

impl InputHandler for NormalInput {
    fn key_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &KeyInput,
    ) -> bool {
        key_down(self, view, session, input)
    }

    fn mouse_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        mouse_down(self, view, session, input, hit)
    }

    fn mouse_up<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        _input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        mouse_up(view, session, hit)
    }

    fn mouse_move<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        _hit: Option<RowHit>,
    ) -> bool {
        mouse_move(view, session, input)
    }
}

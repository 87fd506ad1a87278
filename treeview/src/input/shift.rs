use super::normal::{self, Gesture};
use super::{InputHandler, InputSession, KeyInput, MouseInput, RowHit};
use crate::model::TreeModel;
use crate::rows::RowId;
use crate::view::TreeView;

/// Shift held: gestures extend the selection from the anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftInput;

impl ShiftInput {
    /// Select from the anchor to `row`, or fall back to plain selection when
    /// the mode is not multi-select or no anchor exists yet.
    fn extend<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        let anchor = view
            .selection()
            .anchor()
            .filter(|anchor| view.rows().is_visible(*anchor));
        match anchor {
            Some(anchor) if view.selection().mode().is_multi() => {
                if view.can_select(row) {
                    view.select_range(anchor, row);
                }
                view.set_current(row);
                view.scroll_to(row);
            }
            _ => normal::select_and_focus(view, row),
        }
    }
}

impl Gesture for ShiftInput {
    fn focus_row<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        self.extend(view, row);
    }

    fn click_row<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        self.extend(view, row);
    }

    fn space<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        self.extend(view, row);
    }

    fn click_empty<M: TreeModel>(&self, _view: &mut TreeView<M>) {}
}

impl InputHandler for ShiftInput {
    fn key_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &KeyInput,
    ) -> bool {
        normal::key_down(self, view, session, input)
    }

    fn mouse_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        normal::mouse_down(self, view, session, input, hit)
    }

    fn mouse_up<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        _input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        normal::mouse_up(view, session, hit)
    }

    fn mouse_move<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        _hit: Option<RowHit>,
    ) -> bool {
        normal::mouse_move(view, session, input)
    }
}

use super::normal::{self, Gesture};
use super::{InputHandler, InputSession, KeyInput, MouseInput, RowHit};
use crate::model::TreeModel;
use crate::rows::RowId;
use crate::view::TreeView;

/// Ctrl held: clicks toggle single rows, arrows move focus only.
///
/// The anchor is never moved here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput;

impl ControlInput {
    fn toggle<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        if view.can_select(row) {
            view.toggle(row);
        }
        view.set_current(row);
    }
}

impl Gesture for ControlInput {
    fn focus_row<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        view.set_current(row);
        view.scroll_to(row);
    }

    fn click_row<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        self.toggle(view, row);
    }

    fn space<M: TreeModel>(&self, view: &mut TreeView<M>, row: RowId) {
        self.toggle(view, row);
    }

    fn click_empty<M: TreeModel>(&self, _view: &mut TreeView<M>) {}
}

impl InputHandler for ControlInput {
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

//! In-place label editing.
//!
//! The tree only tracks which row and control own the editor; the host
//! draws the editor and applies the committed text to its model.

use log::debug;

use super::{InputHandler, InputSession, InputState, Key, KeyInput, MouseInput, RowHit};
use crate::TreeEvent;
use crate::error::{Result, TreeError};
use crate::model::TreeModel;
use crate::rows::RowId;
use crate::view::TreeView;

/// Open an editor on `control` of `row`, committing any edit already open.
pub(crate) fn begin<M: TreeModel>(
    view: &mut TreeView<M>,
    session: &mut InputSession,
    row: RowId,
    control: usize,
) -> Result<()> {
    if !view.rows().is_visible(row) {
        return Err(TreeError::StaleRow(row));
    }
    if !view.is_editable(row, control) {
        return Err(TreeError::NotEditable(row));
    }
    if session.edit.is_some() {
        commit(view, session)?;
    }
    session.press = None;
    if session.drag.take().is_some() {
        view.push_event(TreeEvent::DragCancelled);
    }
    view.scroll_to(row);
    session.edit = Some(super::EditSession { row, control });
    debug!("editing {} control {}", row, control);
    view.push_event(TreeEvent::EditStarted { row, control });
    Ok(())
}

/// Open an editor on the first editable control of `row`.
pub(crate) fn begin_first<M: TreeModel>(
    view: &mut TreeView<M>,
    session: &mut InputSession,
    row: RowId,
) -> Result<()> {
    let control = view
        .first_editable(row)
        .ok_or(TreeError::NotEditable(row))?;
    begin(view, session, row, control)
}

pub(crate) fn commit<M: TreeModel>(view: &mut TreeView<M>, session: &mut InputSession) -> Result<()> {
    let edit = session.edit.take().ok_or(TreeError::NoEditSession)?;
    debug!("edit committed on {}", edit.row);
    view.push_event(TreeEvent::EditCommitted {
        row: edit.row,
        control: edit.control,
    });
    Ok(())
}

pub(crate) fn cancel<M: TreeModel>(view: &mut TreeView<M>, session: &mut InputSession) -> Result<()> {
    let edit = session.edit.take().ok_or(TreeError::NoEditSession)?;
    debug!("edit cancelled on {}", edit.row);
    view.push_event(TreeEvent::EditCancelled {
        row: edit.row,
        control: edit.control,
    });
    Ok(())
}

/// A label editor is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditInput;

impl InputHandler for EditInput {
    fn key_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &KeyInput,
    ) -> bool {
        match input.key {
            Key::Enter => commit(view, session).is_ok(),
            Key::Escape => cancel(view, session).is_ok(),
            // Everything else belongs to the host's editor.
            _ => false,
        }
    }

    fn mouse_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        if let Some(edit) = session.edit
            && hit.is_some_and(|hit| hit.row == edit.row && hit.control == Some(edit.control))
        {
            return false;
        }
        // Clicking elsewhere accepts the edit, then the click proceeds.
        let _ = commit(view, session);
        InputState::select(session, input.modifiers).mouse_down(view, session, input, hit)
    }

    fn mouse_up<M: TreeModel>(
        &self,
        _view: &mut TreeView<M>,
        _session: &mut InputSession,
        _input: &MouseInput,
        _hit: Option<RowHit>,
    ) -> bool {
        false
    }
}

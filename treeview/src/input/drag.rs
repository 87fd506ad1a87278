use log::debug;

use super::{InputHandler, InputSession, Key, KeyInput, MouseInput, RowHit};
use crate::TreeEvent;
use crate::events::{DropPosition, DropTarget};
use crate::model::TreeModel;
use crate::view::TreeView;

/// Selected rows are being dragged.
///
/// Entered from a steady state once the pointer passes the drag threshold;
/// left on button release or Escape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragInput;

impl DragInput {
    /// Drop target under the pointer. Rows cannot be dropped onto themselves
    /// or their own descendants.
    fn target<M: TreeModel>(
        view: &TreeView<M>,
        session: &InputSession,
        hit: Option<RowHit>,
    ) -> Option<DropTarget> {
        let hit = hit?;
        let drag = session.drag.as_ref()?;
        let rows = view.rows();
        let blocked = drag
            .rows
            .iter()
            .any(|row| *row == hit.row || rows.is_ancestor(*row, hit.row));
        (!blocked).then(|| DropTarget {
            row: hit.row,
            position: DropPosition::from_fraction(hit.fraction),
        })
    }
}

impl InputHandler for DragInput {
    fn key_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &KeyInput,
    ) -> bool {
        if input.key != Key::Escape {
            return false;
        }
        if session.drag.take().is_some() {
            debug!("drag cancelled");
            view.push_event(TreeEvent::DragCancelled);
        }
        true
    }

    fn mouse_down<M: TreeModel>(
        &self,
        _view: &mut TreeView<M>,
        _session: &mut InputSession,
        _input: &MouseInput,
        _hit: Option<RowHit>,
    ) -> bool {
        true
    }

    fn mouse_up<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        _input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        let target = Self::target(view, session, hit);
        session.press = None;
        let Some(drag) = session.drag.take() else {
            return false;
        };
        match target {
            Some(target) => {
                debug!("dropped {} rows on {:?}", drag.rows.len(), target);
                view.push_event(TreeEvent::Dropped {
                    rows: drag.rows,
                    target,
                });
            }
            None => view.push_event(TreeEvent::DragCancelled),
        }
        true
    }

    fn mouse_move<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        _input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        let target = Self::target(view, session, hit);
        if let Some(drag) = &mut session.drag
            && drag.target != target
        {
            drag.target = target;
            view.mark_dirty();
        }
        true
    }
}

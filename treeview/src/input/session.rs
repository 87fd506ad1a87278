use crate::events::DropTarget;
use crate::rows::RowId;

/// Left-button press waiting for release or a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub row: RowId,
    pub x: u16,
    pub y: u16,
    /// The press landed on an already multi-selected row; the selection is
    /// narrowed on release unless a drag starts first.
    pub deferred: bool,
    /// Control to edit on release (click on the current, sole selected row).
    pub edit_control: Option<usize>,
}

/// Rows being dragged and where they would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub rows: Vec<RowId>,
    pub target: Option<DropTarget>,
}

/// In-place label edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSession {
    pub row: RowId,
    pub control: usize,
}

/// Gesture state carried across input events.
///
/// The view owns one session and lends it to the active input state for the
/// duration of each event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSession {
    pub(crate) press: Option<Press>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) edit: Option<EditSession>,
}

impl InputSession {
    pub fn press(&self) -> Option<&Press> {
        self.press.as_ref()
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// No gesture in progress.
    pub fn is_idle(&self) -> bool {
        self.press.is_none() && self.drag.is_none() && self.edit.is_none()
    }

    /// Drop references to rows that no longer exist.
    ///
    /// Returns the edit session if its row is gone and the drag session if
    /// every dragged row is gone, so the caller can report the cancellation.
    pub(crate) fn retain_rows(
        &mut self,
        alive: impl Fn(RowId) -> bool,
    ) -> (Option<EditSession>, Option<DragSession>) {
        if self.press.is_some_and(|press| !alive(press.row)) {
            self.press = None;
        }
        let edit = self.edit.take_if(|edit| !alive(edit.row));
        let mut dropped = None;
        if let Some(drag) = &mut self.drag {
            drag.rows.retain(|row| alive(*row));
            if drag.target.is_some_and(|target| !alive(target.row)) {
                drag.target = None;
            }
            if drag.rows.is_empty() {
                dropped = self.drag.take();
            }
        }
        (edit, dropped)
    }
}

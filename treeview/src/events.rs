//! Notifications the view raises for its host.

use std::ops::Range;

use crate::rows::RowId;

/// Where dragged rows would land relative to the row under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    Inside,
    After,
}

impl DropPosition {
    /// Position for a pointer at `fraction` (0.0 top .. 1.0 bottom) of a row.
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction < 0.25 {
            DropPosition::Before
        } else if fraction > 0.75 {
            DropPosition::After
        } else {
            DropPosition::Inside
        }
    }
}

/// Row and position a drag would drop onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub row: RowId,
    pub position: DropPosition,
}

/// A change the host may want to react to (redraw, detail panel, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// The selected set changed.
    SelectionChanged,
    /// Keyboard focus moved.
    CurrentChanged {
        previous: Option<RowId>,
        current: Option<RowId>,
    },
    /// A row was expanded by the user or the host.
    Expanded(RowId),
    /// A row was collapsed by the user or the host.
    Collapsed(RowId),
    /// The flat row list changed shape (model insert/remove/reload).
    StructureChanged,
    /// Display content of these flat rows changed.
    RowsChanged { range: Range<usize> },
    /// Enter or double click on a row.
    Activated(RowId),
    /// A drag of the selected rows started.
    DragStarted { rows: Vec<RowId> },
    /// Dragged rows were released over a drop target.
    Dropped {
        rows: Vec<RowId>,
        target: DropTarget,
    },
    /// A drag ended without a drop.
    DragCancelled,
    /// A label edit began on a row's node control.
    EditStarted { row: RowId, control: usize },
    /// A label edit was accepted.
    EditCommitted { row: RowId, control: usize },
    /// A label edit was abandoned.
    EditCancelled { row: RowId, control: usize },
    /// A model was attached and the rows rebuilt.
    ModelAttached,
    /// The model was detached.
    ModelDetached,
}

//! Node-control pipeline.
//!
//! A row is drawn by an ordered list of [`NodeControl`]s. Each control
//! measures itself for a row and contributes a cell; the view lays the cells
//! out after the indentation and expander and hit-tests pointer positions
//! against them.

mod column;
mod draw;
mod text;

pub use column::{Alignment, TreeColumn};
pub use draw::{DrawContext, DrawSelectionMode};
pub use text::{TextControl, display_width, truncate_to_width};

use crate::geometry::{Rect, Size};
use crate::model::TreePath;
use crate::rows::RowId;

/// Width reserved for the expand/collapse glyph.
pub const EXPANDER_WIDTH: u16 = 2;

/// Everything a control needs to know about the row it draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowInfo<K> {
    pub row: RowId,
    /// Flat index in the visible list.
    pub index: usize,
    pub path: TreePath<K>,
    /// Model key; `None` for the root.
    pub key: Option<K>,
    /// Indentation level.
    pub level: usize,
    pub expanded: bool,
    pub leaf: bool,
    pub selected: bool,
    pub current: bool,
}

/// One cell-producing piece of a row.
pub trait NodeControl<K> {
    /// Column this control draws in, when the view has columns.
    fn column(&self) -> Option<usize> {
        None
    }

    /// Size the control wants for `row` within `ctx.bounds`.
    fn measure(&self, row: &RowInfo<K>, ctx: &DrawContext) -> Size;

    /// Text shown in the cell.
    fn text(&self, row: &RowInfo<K>) -> String;

    fn tooltip(&self, _row: &RowInfo<K>) -> Option<String> {
        None
    }

    /// Whether the control supports in-place label editing for `row`.
    fn is_editable(&self, _row: &RowInfo<K>) -> bool {
        false
    }
}

/// Supplies a tooltip for rows whose controls have none of their own.
pub trait ToolTipProvider<K> {
    fn tooltip(&self, row: &RowInfo<K>, control: Option<usize>) -> Option<String>;
}

impl<K, F> ToolTipProvider<K> for F
where
    F: Fn(&RowInfo<K>, Option<usize>) -> Option<String>,
{
    fn tooltip(&self, row: &RowInfo<K>, control: Option<usize>) -> Option<String> {
        self(row, control)
    }
}

/// Bounds assigned to one control in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    /// Index into [`NodeControls`].
    pub control: usize,
    pub bounds: Rect,
}

/// Geometry of a laid-out row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowLayout {
    /// Expander glyph area; `None` for leaves.
    pub expander: Option<Rect>,
    pub cells: Vec<CellLayout>,
}

impl RowLayout {
    pub fn on_expander(&self, x: u16, y: u16) -> bool {
        self.expander.is_some_and(|area| area.contains(x, y))
    }

    /// Control whose cell contains the point.
    pub fn control_at(&self, x: u16, y: u16) -> Option<usize> {
        self.cells
            .iter()
            .find(|cell| cell.bounds.contains(x, y))
            .map(|cell| cell.control)
    }
}

/// One cell of a row ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCell {
    pub control: usize,
    pub text: String,
    pub context: DrawContext,
}

/// A visible row laid out for painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow<K> {
    pub info: RowInfo<K>,
    /// Full row area in viewport coordinates.
    pub bounds: Rect,
    pub expander: Option<Rect>,
    pub cells: Vec<RenderCell>,
}

/// Ordered controls plus optional columns.
pub struct NodeControls<K> {
    controls: Vec<Box<dyn NodeControl<K>>>,
    columns: Vec<TreeColumn>,
}

impl<K> Default for NodeControls<K> {
    fn default() -> Self {
        Self {
            controls: Vec::new(),
            columns: Vec::new(),
        }
    }
}

impl<K> std::fmt::Debug for NodeControls<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeControls")
            .field("controls", &self.controls.len())
            .field("columns", &self.columns)
            .finish()
    }
}

impl<K> NodeControls<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a control; it draws after every control already added.
    pub fn push(&mut self, control: impl NodeControl<K> + 'static) -> usize {
        self.controls.push(Box::new(control));
        self.controls.len() - 1
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn NodeControl<K>> {
        self.controls.get(index).map(|control| control.as_ref())
    }

    pub fn columns(&self) -> &[TreeColumn] {
        &self.columns
    }

    pub fn set_columns(&mut self, columns: Vec<TreeColumn>) {
        self.columns = columns;
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut TreeColumn> {
        self.columns.get_mut(index)
    }

    /// First control that can edit `row`.
    pub fn first_editable(&self, row: &RowInfo<K>) -> Option<usize> {
        self.controls
            .iter()
            .position(|control| control.is_editable(row))
    }

    /// Horizontal span of each visible column inside `bounds`.
    pub fn column_spans(&self, bounds: Rect) -> Vec<(usize, Rect)> {
        let mut spans = Vec::new();
        let mut rest = bounds;
        for (index, column) in self.columns.iter().enumerate() {
            if !column.visible {
                continue;
            }
            let (span, after) = rest.split_left(column.width);
            spans.push((index, span));
            rest = after;
        }
        spans
    }

    /// Lay out a row: indentation, expander, then one cell per control.
    ///
    /// Without columns, cells are packed left to right. With columns, each
    /// control is packed into the span of its column; the first column
    /// also holds the indentation and expander.
    pub fn layout(&self, row: &RowInfo<K>, bounds: Rect, indent: u16) -> RowLayout {
        let offset = indent.saturating_mul(row.level.min(u16::MAX as usize) as u16);
        let (_, after_indent) = bounds.split_left(offset);
        let (expander, content) = after_indent.split_left(EXPANDER_WIDTH);
        let mut layout = RowLayout {
            expander: (!row.leaf && !expander.is_empty()).then_some(expander),
            cells: Vec::new(),
        };

        if self.columns.is_empty() {
            self.pack(row, content, |_| true, &mut layout.cells);
            return layout;
        }

        let spans = self.column_spans(bounds);
        let first = spans.first().map(|(index, _)| *index);
        for (column, span) in spans {
            let area = if Some(column) == first {
                clip_left(span, content.x)
            } else {
                span
            };
            let start = layout.cells.len();
            let used = self.pack(
                row,
                area,
                |control| control.column().unwrap_or(0) == column,
                &mut layout.cells,
            );
            let spare = area.width.saturating_sub(used);
            let shift = match self.columns[column].align {
                Alignment::Left => 0,
                Alignment::Center => spare / 2,
                Alignment::Right => spare,
            };
            for cell in &mut layout.cells[start..] {
                cell.bounds.x += shift;
            }
        }
        layout
    }

    /// Place included controls left to right in `area`. Returns the width
    /// taken.
    fn pack(
        &self,
        row: &RowInfo<K>,
        mut area: Rect,
        include: impl Fn(&dyn NodeControl<K>) -> bool,
        cells: &mut Vec<CellLayout>,
    ) -> u16 {
        let mut used = 0;
        for (index, control) in self.controls.iter().enumerate() {
            if !include(control.as_ref()) {
                continue;
            }
            let ctx = DrawContext::new(area);
            let size = control.measure(row, &ctx);
            let (cell, rest) = area.split_left(size.width);
            if cell.is_empty() {
                continue;
            }
            cells.push(CellLayout {
                control: index,
                bounds: Rect::new(cell.x, cell.y, cell.width, size.height.clamp(1, cell.height)),
            });
            used += cell.width;
            area = rest;
        }
        used
    }
}

/// Cut off everything left of `x`.
fn clip_left(rect: Rect, x: u16) -> Rect {
    if x <= rect.x {
        return rect;
    }
    rect.split_left(x - rect.x).1
}

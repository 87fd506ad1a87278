/// Horizontal alignment of a column's header and cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A column of a multi-column tree.
///
/// Column 0 holds the tree structure (indentation and expander); controls
/// pick their column with [`NodeControl::column`](super::NodeControl::column).
///
/// # Examples
///
/// ```
/// use treeview::controls::{Alignment, TreeColumn};
///
/// let columns = vec![
///     TreeColumn::new("Item", 30),
///     TreeColumn::new("Value", 20).align(Alignment::Right),
/// ];
/// assert!(columns.iter().all(|c| c.visible));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeColumn {
    /// Column header text
    pub header: String,
    /// Column width in terminal columns (fixed)
    pub width: u16,
    /// Horizontal alignment
    pub align: Alignment,
    /// Hidden columns take no space.
    pub visible: bool,
}

impl TreeColumn {
    /// Create a visible, left-aligned column.
    pub fn new(header: impl Into<String>, width: u16) -> Self {
        Self {
            header: header.into(),
            width,
            align: Alignment::Left,
            visible: true,
        }
    }

    /// Set the alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

use crate::geometry::Rect;

/// How selection should be painted for a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawSelectionMode {
    #[default]
    None,
    /// Selected while the tree has focus.
    Active,
    /// Selected while the tree is unfocused.
    Inactive,
    /// Selected, painted across the whole row width.
    FullRowSelect,
}

/// Per-cell drawing state handed to controls and painters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawContext {
    pub bounds: Rect,
    pub draw_selection: DrawSelectionMode,
    /// Draw the focus marker (current row while focused).
    pub draw_focus: bool,
    pub enabled: bool,
    /// Control that owns the active label editor on this row.
    pub editor_owner: Option<usize>,
}

impl DrawContext {
    /// Plain context for measuring inside `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            draw_selection: DrawSelectionMode::None,
            draw_focus: false,
            enabled: true,
            editor_owner: None,
        }
    }
}

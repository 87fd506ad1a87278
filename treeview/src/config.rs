//! Tree view configuration.

use crate::selection::SelectionMode;

/// Behavior settings for a [`TreeView`](crate::TreeView).
///
/// # Example
///
/// ```
/// use treeview::TreeConfig;
/// use treeview::selection::SelectionMode;
///
/// let config = TreeConfig::default()
///     .with_selection_mode(SelectionMode::Multi)
///     .with_show_root(false)
///     .with_label_edit(true);
/// assert_eq!(config.selection_mode, SelectionMode::Multi);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// How many rows may be selected at once.
    ///
    /// Default: `Single`
    pub selection_mode: SelectionMode,

    /// Whether the model root is displayed as a row.
    ///
    /// When hidden, the root is always expanded and its children sit at
    /// level 0. Default: `true`
    pub show_root: bool,

    /// Whether collapsing a row discards its descendant rows.
    ///
    /// Evicted rows are fetched again from the model on the next expand.
    /// Default: `false`
    pub evict_on_collapse: bool,

    /// Cells the pointer must travel with the left button held before a
    /// drag starts.
    ///
    /// Default: 2
    pub drag_threshold: u16,

    /// Whether selected rows can be dragged.
    ///
    /// Default: `true`
    pub allow_drag: bool,

    /// Whether label editing can be triggered (F2, or clicking the current row).
    ///
    /// Default: `false`
    pub label_edit: bool,

    /// Height of a row in cells.
    ///
    /// Default: 1
    pub row_height: u16,

    /// Indentation per tree level in cells.
    ///
    /// Default: 2
    pub indent: u16,

    /// Paint selection across the whole row instead of per cell.
    ///
    /// Default: `false`
    pub full_row_select: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::Single,
            show_root: true,
            evict_on_collapse: false,
            drag_threshold: 2,
            allow_drag: true,
            label_edit: false,
            row_height: 1,
            indent: 2,
            full_row_select: false,
        }
    }
}

impl TreeConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Shows or hides the root row.
    pub fn with_show_root(mut self, show_root: bool) -> Self {
        self.show_root = show_root;
        self
    }

    /// Discards descendant rows on collapse.
    pub fn with_evict_on_collapse(mut self, evict: bool) -> Self {
        self.evict_on_collapse = evict;
        self
    }

    /// Sets the drag threshold in cells.
    pub fn with_drag_threshold(mut self, cells: u16) -> Self {
        self.drag_threshold = cells;
        self
    }

    /// Enables or disables dragging.
    pub fn with_allow_drag(mut self, allow: bool) -> Self {
        self.allow_drag = allow;
        self
    }

    /// Enables or disables label editing.
    pub fn with_label_edit(mut self, enabled: bool) -> Self {
        self.label_edit = enabled;
        self
    }

    /// Sets the row height in cells. Zero is treated as one.
    pub fn with_row_height(mut self, height: u16) -> Self {
        self.row_height = height.max(1);
        self
    }

    /// Sets the per-level indentation in cells.
    pub fn with_indent(mut self, indent: u16) -> Self {
        self.indent = indent;
        self
    }

    /// Paints selection across whole rows.
    pub fn with_full_row_select(mut self, enabled: bool) -> Self {
        self.full_row_select = enabled;
        self
    }
}

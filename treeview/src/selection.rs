//! Selection state for the tree.
//!
//! The engine tracks which rows are selected, which row has keyboard focus
//! (the current row) and where the last range gesture started (the anchor).
//! Rows are referenced by [`RowId`]; callers pass the [`RowLayer`] so range
//! operations follow the visible order at the time of the call.

use std::collections::HashSet;

use crate::rows::{RowId, RowLayer};

/// Selection mode for the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// No selection is ever recorded; only focus moves.
    #[default]
    None,
    /// At most one row is selected.
    Single,
    /// Any subset (Ctrl+click toggles, Shift+click selects a range).
    Multi,
    /// Like `Multi`, but range gestures only pick rows that share the
    /// target row's parent.
    MultiSameParent,
}

impl SelectionMode {
    /// Whether more than one row may be selected.
    pub fn is_multi(self) -> bool {
        matches!(self, SelectionMode::Multi | SelectionMode::MultiSameParent)
    }
}

/// Change notices produced by the engine, drained by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionNotice {
    /// The selected set changed.
    SelectionChanged,
    /// Keyboard focus moved.
    CurrentChanged {
        previous: Option<RowId>,
        current: Option<RowId>,
    },
}

/// Selected rows, current row and range anchor.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectionMode,
    selected: HashSet<RowId>,
    current: Option<RowId>,
    /// Start row for Shift range gestures.
    anchor: Option<RowId>,
    batch_depth: u32,
    /// Selected set when the outermost batch began.
    batch_snapshot: Option<HashSet<RowId>>,
    notices: Vec<SelectionNotice>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Check if a row is selected.
    pub fn is_selected(&self, row: RowId) -> bool {
        self.selected.contains(&row)
    }

    /// Get the number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The focused row.
    pub fn current(&self) -> Option<RowId> {
        self.current
    }

    /// Get the anchor for range selection.
    pub fn anchor(&self) -> Option<RowId> {
        self.anchor
    }

    /// Selected rows in visible order.
    pub fn selected_rows<K>(&self, rows: &RowLayer<K>) -> Vec<RowId> {
        let mut selected: Vec<_> = self
            .selected
            .iter()
            .filter_map(|id| rows.index_of(*id).map(|index| (index, *id)))
            .collect();
        selected.sort_unstable();
        selected.into_iter().map(|(_, id)| id).collect()
    }

    // -------------------------------------------------------------------------
    // Mode
    // -------------------------------------------------------------------------

    /// Switch mode, trimming the selection to what the new mode allows.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::None => {
                self.clear();
            }
            SelectionMode::Single if self.selected.len() > 1 => {
                let keep = self.current.filter(|row| self.selected.contains(row));
                self.selected.retain(|row| Some(*row) == keep);
                self.anchor = keep;
                self.notify();
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Selection operations
    // -------------------------------------------------------------------------

    /// Make `row` the only selected row and the new anchor.
    ///
    /// Returns `true` if the selected set changed.
    pub fn select<K>(&mut self, rows: &RowLayer<K>, row: RowId) -> bool {
        if self.mode == SelectionMode::None || !rows.is_visible(row) {
            return false;
        }
        self.anchor = Some(row);
        let changed = !(self.selected.len() == 1 && self.selected.contains(&row));
        if changed {
            self.selected.clear();
            self.selected.insert(row);
            self.notify();
        }
        if self.mode == SelectionMode::Single {
            self.replace_current(Some(row));
        }
        changed
    }

    /// Flip membership of `row` without touching other rows or the anchor.
    ///
    /// In `Single` mode, adding a row still deselects the previous one.
    pub fn toggle<K>(&mut self, rows: &RowLayer<K>, row: RowId) -> bool {
        if self.mode == SelectionMode::None || !rows.is_visible(row) {
            return false;
        }
        if !self.selected.remove(&row) {
            if self.mode == SelectionMode::Single {
                self.selected.clear();
            }
            self.selected.insert(row);
            if self.mode == SelectionMode::Single {
                self.replace_current(Some(row));
            }
        }
        self.notify();
        true
    }

    /// Select exactly the visible rows between `anchor` and `target`,
    /// inclusive, in display order.
    ///
    /// `allow` is consulted per row. In `Single` mode only `target` is
    /// selected; in `None` mode this is a no-op.
    pub fn select_range<K>(
        &mut self,
        rows: &RowLayer<K>,
        anchor: RowId,
        target: RowId,
        allow: impl Fn(RowId) -> bool,
    ) -> bool {
        let next: HashSet<RowId> = match self.mode {
            SelectionMode::None => return false,
            SelectionMode::Single => {
                if !rows.is_visible(target) || !allow(target) {
                    return false;
                }
                HashSet::from([target])
            }
            SelectionMode::Multi | SelectionMode::MultiSameParent => {
                let Some(span) = rows.visible_between(anchor, target) else {
                    return false;
                };
                let parent = rows.parent(target);
                span.iter()
                    .copied()
                    .filter(|row| {
                        self.mode == SelectionMode::Multi || rows.parent(*row) == parent
                    })
                    .filter(|row| allow(*row))
                    .collect()
            }
        };
        if self.mode.is_multi() {
            self.anchor = Some(anchor);
        }
        if next == self.selected {
            if self.mode == SelectionMode::Single {
                self.replace_current(Some(target));
            }
            return false;
        }
        self.selected = next;
        self.notify();
        if self.mode == SelectionMode::Single {
            self.replace_current(Some(target));
        }
        true
    }

    /// Select every visible row that `allow` accepts. Multi modes only.
    pub fn select_all<K>(&mut self, rows: &RowLayer<K>, allow: impl Fn(RowId) -> bool) -> bool {
        if !self.mode.is_multi() {
            return false;
        }
        let mut changed = false;
        for row in rows.visible_rows() {
            if allow(*row) && self.selected.insert(*row) {
                changed = true;
            }
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Clear all selection and the anchor.
    pub fn clear(&mut self) -> bool {
        self.anchor = None;
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        self.notify();
        true
    }

    /// Set the anchor without changing the selection.
    pub fn set_anchor(&mut self, anchor: Option<RowId>) {
        self.anchor = anchor;
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Move focus to a visible row. Selection is not changed, except that
    /// `Single` mode drops a selected row that loses focus.
    pub fn set_current<K>(&mut self, rows: &RowLayer<K>, row: RowId) -> bool {
        if !rows.is_visible(row) || self.current == Some(row) {
            return false;
        }
        self.replace_current(Some(row));
        true
    }

    /// Move focus to `row` (or nowhere) without validation.
    ///
    /// In `Single` mode the selection is the current row or nothing, so
    /// focusing any other row deselects.
    pub(crate) fn replace_current(&mut self, row: Option<RowId>) {
        let previous = self.current;
        if previous == row {
            return;
        }
        self.current = row;
        self.notices.push(SelectionNotice::CurrentChanged {
            previous,
            current: row,
        });
        if self.mode == SelectionMode::Single
            && !self.selected.is_empty()
            && row.is_none_or(|row| !self.selected.contains(&row))
        {
            self.selected.clear();
            self.notify();
        }
    }

    // -------------------------------------------------------------------------
    // Row lifecycle
    // -------------------------------------------------------------------------

    /// Drop rows that left the flat list from the selected set and anchor.
    ///
    /// The current row is left alone; the owner decides where focus goes.
    pub fn forget(&mut self, gone: &[RowId]) -> bool {
        let mut changed = false;
        for row in gone {
            changed |= self.selected.remove(row);
            if self.anchor == Some(*row) {
                self.anchor = None;
            }
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Forget everything, including focus. Used when the model is replaced.
    pub fn reset(&mut self) {
        self.clear();
        self.replace_current(None);
    }

    // -------------------------------------------------------------------------
    // Notification batching
    // -------------------------------------------------------------------------

    /// Start collecting selection changes into one notice.
    pub fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(self.selected.clone());
        }
        self.batch_depth += 1;
    }

    /// Finish a batch. The outermost batch emits one `SelectionChanged` if the
    /// selected set differs from when the batch began.
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0
            && let Some(snapshot) = self.batch_snapshot.take()
            && snapshot != self.selected
        {
            self.notices.push(SelectionNotice::SelectionChanged);
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Take pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<SelectionNotice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self) {
        if self.batch_depth == 0 {
            self.notices.push(SelectionNotice::SelectionChanged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemoryModel;

    /// Five top-level rows under a hidden root.
    fn flat_rows() -> RowLayer<crate::model::NodeKey> {
        let model = MemoryModel::new("root");
        for label in ["a", "b", "c", "d", "e"] {
            model.add_child(MemoryModel::ROOT, label);
        }
        let mut rows = RowLayer::new(false, false);
        rows.attach(&model);
        rows
    }

    fn changes(selection: &mut Selection) -> usize {
        selection
            .take_notices()
            .into_iter()
            .filter(|n| *n == SelectionNotice::SelectionChanged)
            .count()
    }

    #[test]
    fn test_single_mode_keeps_at_most_one() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Single);
        for index in [0, 3, 1, 1, 4] {
            selection.select(&rows, rows.row_at(index).unwrap());
            assert!(selection.len() <= 1);
        }
        assert!(selection.is_selected(rows.row_at(4).unwrap()));

        selection.toggle(&rows, rows.row_at(2).unwrap());
        assert_eq!(selection.len(), 1);
        assert!(selection.is_selected(rows.row_at(2).unwrap()));
    }

    #[test]
    fn test_single_mode_tracks_current() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Single);
        let a = rows.row_at(0).unwrap();
        let b = rows.row_at(1).unwrap();
        selection.set_current(&rows, a);
        selection.select(&rows, b);
        assert_eq!(selection.current(), Some(b));

        selection.set_current(&rows, a);
        assert!(selection.is_empty());
        assert_eq!(selection.current(), Some(a));
    }

    #[test]
    fn test_none_mode_records_nothing() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::None);
        let a = rows.row_at(0).unwrap();
        let c = rows.row_at(2).unwrap();
        assert!(!selection.select(&rows, a));
        assert!(!selection.toggle(&rows, a));
        assert!(!selection.select_range(&rows, a, c, |_| true));
        assert!(selection.is_empty());
        assert!(selection.take_notices().is_empty());
    }

    #[test]
    fn test_range_is_inclusive_in_either_direction() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        let b = rows.row_at(1).unwrap();
        let d = rows.row_at(3).unwrap();

        selection.select_range(&rows, d, b, |_| true);
        assert_eq!(selection.selected_rows(&rows), rows.visible_rows()[1..=3].to_vec());

        selection.select_range(&rows, b, d, |_| true);
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.anchor(), Some(b));
    }

    #[test]
    fn test_range_respects_allow_filter() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        let c = rows.row_at(2).unwrap();
        selection.select_range(&rows, rows.row_at(0).unwrap(), rows.row_at(4).unwrap(), |r| {
            r != c
        });
        assert_eq!(selection.len(), 4);
        assert!(!selection.is_selected(c));
    }

    #[test]
    fn test_toggle_keeps_anchor() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        let a = rows.row_at(0).unwrap();
        let c = rows.row_at(2).unwrap();
        selection.select(&rows, a);
        selection.toggle(&rows, c);
        assert_eq!(selection.anchor(), Some(a));
        assert_eq!(selection.len(), 2);
        selection.toggle(&rows, a);
        assert_eq!(selection.selected_rows(&rows), vec![c]);
    }

    #[test]
    fn test_clear_resets_anchor() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        selection.select(&rows, rows.row_at(1).unwrap());
        assert!(selection.clear());
        assert_eq!(selection.anchor(), None);
        assert!(!selection.clear());
    }

    #[test]
    fn test_batch_emits_one_notice() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        selection.begin_batch();
        for row in rows.visible_rows() {
            selection.toggle(&rows, *row);
        }
        assert_eq!(changes(&mut selection), 0);
        selection.end_batch();
        assert_eq!(changes(&mut selection), 1);
    }

    #[test]
    fn test_batch_with_no_net_change_is_silent() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        let a = rows.row_at(0).unwrap();
        selection.select(&rows, a);
        selection.take_notices();

        selection.begin_batch();
        selection.begin_batch();
        selection.toggle(&rows, a);
        selection.toggle(&rows, a);
        selection.end_batch();
        selection.end_batch();
        assert_eq!(changes(&mut selection), 0);
    }

    #[test]
    fn test_forget_drops_rows_and_anchor() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        let a = rows.row_at(0).unwrap();
        let b = rows.row_at(1).unwrap();
        selection.select(&rows, a);
        selection.toggle(&rows, b);
        selection.set_current(&rows, a);

        assert!(selection.forget(&[a]));
        assert_eq!(selection.anchor(), None);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.current(), Some(a));
    }

    #[test]
    fn test_switching_to_single_trims_selection() {
        let rows = flat_rows();
        let mut selection = Selection::new(SelectionMode::Multi);
        let a = rows.row_at(0).unwrap();
        let b = rows.row_at(1).unwrap();
        selection.select(&rows, a);
        selection.toggle(&rows, b);
        selection.set_current(&rows, b);

        selection.set_mode(SelectionMode::Single);
        assert_eq!(selection.selected_rows(&rows), vec![b]);
    }
}

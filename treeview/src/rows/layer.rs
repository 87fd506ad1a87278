//! Arena of materialized rows and the flat visible-row projection.
//!
//! Rows live in a dense slot arena and refer to each other by [`RowId`].
//! Every mutation patches only the affected stretch of the flat list and
//! re-indexes the rows after it, so `row_at` and `index_of` stay O(1) and
//! are correct as soon as a mutation returns.

use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::Range;

use log::{debug, warn};

use crate::model::{TreeModel, TreePath};

/// Handle to a materialized row.
///
/// Ids carry a generation, so a handle to a row that has since been removed
/// never aliases a newer row that reuses the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId {
    slot: u32,
    generation: u32,
}

#[cfg(test)]
impl RowId {
    pub(crate) fn fixture(slot: u32) -> Self {
        Self {
            slot,
            generation: 0,
        }
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row#{}.{}", self.slot, self.generation)
    }
}

/// Lazily populated child list.
#[derive(Debug)]
enum Children {
    /// The model has not been asked yet.
    Unfetched,
    Fetched(Vec<RowId>),
}

#[derive(Debug)]
struct Row<K> {
    /// `None` for the root.
    key: Option<K>,
    parent: Option<RowId>,
    children: Children,
    expanded: bool,
    leaf: bool,
    depth: usize,
    /// Position in the flat list while visible.
    index: Option<usize>,
}

impl<K> Row<K> {
    fn new(key: Option<K>, parent: Option<RowId>, depth: usize, leaf: bool) -> Self {
        Self {
            key,
            parent,
            children: Children::Unfetched,
            expanded: false,
            leaf,
            depth,
            index: None,
        }
    }

    fn fetched_children(&self) -> &[RowId] {
        match &self.children {
            Children::Fetched(children) => children,
            Children::Unfetched => &[],
        }
    }
}

#[derive(Debug)]
struct Slot<K> {
    generation: u32,
    row: Option<Row<K>>,
}

/// Outcome of applying a model notification to the rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RowPatch {
    /// Rows released from the arena. Their ids are stale from now on.
    pub removed: Vec<RowId>,
    /// Whether the flat visible list changed shape.
    pub reshaped: bool,
}

/// Materialized rows plus the flat list of visible rows.
#[derive(Debug)]
pub struct RowLayer<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
    visible: Vec<RowId>,
    root: Option<RowId>,
    show_root: bool,
    evict_on_collapse: bool,
}

impl<K> Default for RowLayer<K> {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl<K> RowLayer<K> {
    /// Create an empty layer. Call [`attach`](Self::attach) to build the root.
    pub fn new(show_root: bool, evict_on_collapse: bool) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            visible: Vec::new(),
            root: None,
            show_root,
            evict_on_collapse,
        }
    }

    // -------------------------------------------------------------------------
    // Arena
    // -------------------------------------------------------------------------

    fn get(&self, id: RowId) -> Option<&Row<K>> {
        self.slots
            .get(id.slot as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.row.as_ref())
    }

    fn get_mut(&mut self, id: RowId) -> Option<&mut Row<K>> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.row.as_mut())
    }

    fn alloc(&mut self, row: Row<K>) -> RowId {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.row = Some(row);
            return RowId {
                slot,
                generation: entry.generation,
            };
        }
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            row: Some(row),
        });
        RowId {
            slot,
            generation: 0,
        }
    }

    /// Free a row and everything below it. The rows must already be off the
    /// flat list.
    fn release_subtree(&mut self, id: RowId, released: &mut Vec<RowId>) {
        let Some(slot) = self.slots.get_mut(id.slot as usize) else {
            return;
        };
        if slot.generation != id.generation {
            return;
        }
        let Some(row) = slot.row.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        released.push(id);
        if let Children::Fetched(children) = row.children {
            for child in children {
                self.release_subtree(child, released);
            }
        }
    }

    /// Drop a row's children from the arena, leaving it unfetched.
    fn release_children(&mut self, id: RowId) -> Vec<RowId> {
        let children = match self.get_mut(id) {
            Some(row) => std::mem::replace(&mut row.children, Children::Unfetched),
            None => return Vec::new(),
        };
        let mut released = Vec::new();
        if let Children::Fetched(children) = children {
            for child in children {
                self.release_subtree(child, &mut released);
            }
        }
        released
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The visible rows in display order.
    pub fn visible_rows(&self) -> &[RowId] {
        &self.visible
    }

    /// The root row, if a model is attached.
    pub fn root(&self) -> Option<RowId> {
        self.root
    }

    /// Whether the root row is part of the visible list.
    pub fn shows_root(&self) -> bool {
        self.show_root
    }

    /// Row at a flat index.
    pub fn row_at(&self, index: usize) -> Option<RowId> {
        self.visible.get(index).copied()
    }

    /// Flat index of a row, `None` if it is hidden or stale.
    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.get(id).and_then(|row| row.index)
    }

    /// Whether the id refers to a live row (visible or not).
    pub fn contains(&self, id: RowId) -> bool {
        self.get(id).is_some()
    }

    /// Whether the row is on the flat list.
    pub fn is_visible(&self, id: RowId) -> bool {
        self.index_of(id).is_some()
    }

    /// Model key of a row, `None` for the root or a stale id.
    pub fn key(&self, id: RowId) -> Option<&K> {
        self.get(id).and_then(|row| row.key.as_ref())
    }

    pub fn parent(&self, id: RowId) -> Option<RowId> {
        self.get(id).and_then(|row| row.parent)
    }

    /// Materialized children of a row (empty until first expanded).
    pub fn children(&self, id: RowId) -> &[RowId] {
        self.get(id).map(Row::fetched_children).unwrap_or(&[])
    }

    pub fn is_expanded(&self, id: RowId) -> bool {
        self.get(id).is_some_and(|row| row.expanded)
    }

    pub fn is_leaf(&self, id: RowId) -> bool {
        self.get(id).is_some_and(|row| row.leaf)
    }

    /// Whether the row's children have been fetched from the model.
    pub fn is_fetched(&self, id: RowId) -> bool {
        self.get(id)
            .is_some_and(|row| matches!(row.children, Children::Fetched(_)))
    }

    /// Distance from the root (the root is 0).
    pub fn depth(&self, id: RowId) -> Option<usize> {
        self.get(id).map(|row| row.depth)
    }

    /// Indentation level for display: depth, minus one when the root is hidden.
    pub fn level(&self, id: RowId) -> Option<usize> {
        let depth = self.depth(id)?;
        Some(if self.show_root {
            depth
        } else {
            depth.saturating_sub(1)
        })
    }

    /// Whether `ancestor` lies strictly above `id`.
    pub fn is_ancestor(&self, ancestor: RowId, id: RowId) -> bool {
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Number of rows displayed below `id` because of its expansion state.
    pub fn visible_descendant_count(&self, id: RowId) -> usize {
        let Some(row) = self.get(id) else {
            return 0;
        };
        if !row.expanded {
            return 0;
        }
        row.fetched_children()
            .iter()
            .map(|child| 1 + self.visible_descendant_count(*child))
            .sum()
    }

    /// The visible rows between two rows, inclusive, in display order
    /// regardless of argument order.
    pub fn visible_between(&self, a: RowId, b: RowId) -> Option<&[RowId]> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        Some(&self.visible[a.min(b)..=a.max(b)])
    }

    /// The flat range covering a row and its visible descendants.
    pub fn subtree_range(&self, id: RowId) -> Option<Range<usize>> {
        let start = self.descendants_start(id)?;
        let first = if self.is_visible(id) { start - 1 } else { start };
        Some(first..start + self.visible_descendant_count(id))
    }

    fn collect_visible_descendants(&self, id: RowId, out: &mut Vec<RowId>) {
        let Some(row) = self.get(id) else {
            return;
        };
        if !row.expanded {
            return;
        }
        for child in row.fetched_children() {
            out.push(*child);
            self.collect_visible_descendants(*child, out);
        }
    }

    /// Flat index where the row's visible descendants begin, if they are
    /// displayed at all.
    fn descendants_start(&self, id: RowId) -> Option<usize> {
        let row = self.get(id)?;
        match row.index {
            Some(index) => Some(index + 1),
            None if Some(id) == self.root && !self.show_root => Some(0),
            None => None,
        }
    }

    // -------------------------------------------------------------------------
    // Flat list maintenance
    // -------------------------------------------------------------------------

    fn reindex_from(&mut self, start: usize) {
        for index in start..self.visible.len() {
            let id = self.visible[index];
            if let Some(row) = self.get_mut(id) {
                row.index = Some(index);
            }
        }
    }

    /// Take a row's currently displayed descendants off the flat list.
    fn detach_visible_descendants(&mut self, id: RowId) -> Vec<RowId> {
        let Some(start) = self.descendants_start(id) else {
            return Vec::new();
        };
        let count = self.visible_descendant_count(id);
        if count == 0 {
            return Vec::new();
        }
        let detached: Vec<RowId> = self.visible.drain(start..start + count).collect();
        for row in &detached {
            if let Some(row) = self.get_mut(*row) {
                row.index = None;
            }
        }
        self.reindex_from(start);
        detached
    }

    /// Put a row's displayable descendants onto the flat list.
    fn attach_visible_descendants(&mut self, id: RowId) -> usize {
        let Some(start) = self.descendants_start(id) else {
            return 0;
        };
        let mut rows = Vec::new();
        self.collect_visible_descendants(id, &mut rows);
        let count = rows.len();
        if count > 0 {
            self.visible.splice(start..start, rows);
            self.reindex_from(start);
        }
        count
    }

    /// Detach every row, leaving the layer without a root.
    pub fn clear(&mut self) -> Vec<RowId> {
        self.visible.clear();
        let mut released = Vec::new();
        if let Some(root) = self.root.take() {
            self.release_subtree(root, &mut released);
        }
        released
    }
}

impl<K: Clone + Eq + std::hash::Hash + std::fmt::Debug> RowLayer<K> {
    /// Path of a row from the model root.
    pub fn path(&self, id: RowId) -> Option<TreePath<K>> {
        let mut keys = Vec::new();
        let mut current = self.get(id)?;
        while let Some(parent) = current.parent {
            keys.push(current.key.clone()?);
            current = self.get(parent)?;
        }
        keys.reverse();
        Some(TreePath::from(keys))
    }

    /// Materialized row addressed by `path`.
    ///
    /// Walks fetched children from the root; returns `None` as soon as a step
    /// has not been materialized.
    pub fn find(&self, path: &TreePath<K>) -> Option<RowId> {
        let mut id = self.root?;
        for key in path.keys() {
            let row = self.get(id)?;
            id = row
                .fetched_children()
                .iter()
                .copied()
                .find(|child| self.key(*child) == Some(key))?;
        }
        Some(id)
    }

    /// Paths of expanded rows at or below `id`.
    fn expanded_paths(&self, id: RowId, path: &TreePath<K>, out: &mut HashSet<TreePath<K>>) {
        let Some(row) = self.get(id) else {
            return;
        };
        if !row.expanded {
            return;
        }
        out.insert(path.clone());
        for child in row.fetched_children() {
            if let Some(key) = self.key(*child) {
                self.expanded_paths(*child, &path.child(key.clone()), out);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Model queries
    // -------------------------------------------------------------------------

    fn fetch<M>(&mut self, model: &M, id: RowId, path: &TreePath<K>)
    where
        M: TreeModel<Key = K>,
    {
        let Some(row) = self.get(id) else {
            return;
        };
        if matches!(row.children, Children::Fetched(_)) {
            return;
        }
        let depth = row.depth + 1;
        let keys = model.children(path);
        debug!("fetched {} children for {:?}", keys.len(), path);
        let ids: Vec<RowId> = keys
            .into_iter()
            .map(|key| {
                let leaf = model.is_leaf(&path.child(key.clone()));
                self.alloc(Row::new(Some(key), Some(id), depth, leaf))
            })
            .collect();
        if let Some(row) = self.get_mut(id) {
            row.children = Children::Fetched(ids);
        }
    }

    /// Fetch and mark a row expanded, recursing into children that `reopen`
    /// selects. Does not touch the flat list.
    fn open<M>(
        &mut self,
        model: &M,
        id: RowId,
        path: &TreePath<K>,
        reopen: &dyn Fn(&TreePath<K>) -> bool,
    ) where
        M: TreeModel<Key = K>,
    {
        self.fetch(model, id, path);
        let children = match self.get(id) {
            Some(row) => row.fetched_children().to_vec(),
            None => return,
        };
        let Some(row) = self.get_mut(id) else {
            return;
        };
        if children.is_empty() {
            // Nothing to show: render as a leaf from now on.
            row.leaf = true;
            row.expanded = false;
            return;
        }
        row.expanded = true;
        for child in children {
            let Some(key) = self.key(child).cloned() else {
                continue;
            };
            let child_path = path.child(key);
            if !self.is_leaf(child) && reopen(&child_path) {
                self.open(model, child, &child_path, reopen);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Build the root row for `model`, discarding any previous rows.
    ///
    /// Returns the released rows.
    pub fn attach<M>(&mut self, model: &M) -> Vec<RowId>
    where
        M: TreeModel<Key = K>,
    {
        let released = self.clear();
        let root_path = TreePath::root();
        let leaf = model.is_leaf(&root_path);
        let root = self.alloc(Row::new(None, None, 0, leaf));
        self.root = Some(root);
        if self.show_root {
            self.visible.push(root);
            self.reindex_from(0);
        } else {
            self.open(model, root, &root_path, &|_| false);
            if let Some(row) = self.get_mut(root) {
                row.expanded = true;
            }
            self.attach_visible_descendants(root);
        }
        debug!("row layer attached ({} visible rows)", self.visible.len());
        released
    }

    /// Expand a row, fetching its children on first use.
    ///
    /// Returns `false` if the row was already expanded, is a leaf, is stale,
    /// or turned out to have no children.
    pub fn expand<M>(&mut self, model: &M, id: RowId) -> bool
    where
        M: TreeModel<Key = K>,
    {
        let Some(row) = self.get(id) else {
            return false;
        };
        if row.expanded || row.leaf {
            return false;
        }
        let Some(path) = self.path(id) else {
            return false;
        };
        self.open(model, id, &path, &|_| false);
        if !self.is_expanded(id) {
            return false;
        }
        let shown = self.attach_visible_descendants(id);
        debug!("expanded {:?} ({} rows shown)", path, shown);
        true
    }

    /// Expand a row and every row below it.
    pub fn expand_all<M>(&mut self, model: &M, id: RowId) -> bool
    where
        M: TreeModel<Key = K>,
    {
        if self.is_leaf(id) {
            return false;
        }
        let Some(path) = self.path(id) else {
            return false;
        };
        let before = self.visible.len();
        self.detach_visible_descendants(id);
        self.open(model, id, &path, &|_| true);
        self.attach_visible_descendants(id);
        debug!("expanded all below {:?}", path);
        self.visible.len() != before || self.is_expanded(id)
    }

    /// Collapse a row.
    ///
    /// Returns the rows that left the flat list (or, when evicting, every
    /// released descendant), or `None` if nothing changed.
    pub fn collapse(&mut self, id: RowId) -> Option<Vec<RowId>> {
        let row = self.get(id)?;
        if !row.expanded || (Some(id) == self.root && !self.show_root) {
            return None;
        }
        let mut gone = self.detach_visible_descendants(id);
        if let Some(row) = self.get_mut(id) {
            row.expanded = false;
        }
        if self.evict_on_collapse {
            gone = self.release_children(id);
        }
        debug!("collapsed {} ({} rows gone)", id, gone.len());
        Some(gone)
    }

    /// Collapse a row and reset the expansion state of everything below it.
    pub fn collapse_all(&mut self, id: RowId) -> Option<Vec<RowId>> {
        if Some(id) == self.root && !self.show_root {
            let mut gone = Vec::new();
            let mut changed = false;
            for child in self.children(id).to_vec() {
                if let Some(hidden) = self.collapse_all(child) {
                    changed = true;
                    gone.extend(hidden);
                }
            }
            return changed.then_some(gone);
        }
        let mut changed = false;
        let mut gone = Vec::new();
        if let Some(hidden) = self.collapse(id) {
            changed = true;
            gone = hidden;
        }
        let mut stack = self.children(id).to_vec();
        while let Some(row) = stack.pop() {
            if let Some(row) = self.get_mut(row)
                && row.expanded
            {
                row.expanded = false;
                changed = true;
            }
            stack.extend_from_slice(self.children(row));
        }
        changed.then_some(gone)
    }

    // -------------------------------------------------------------------------
    // Model notifications
    // -------------------------------------------------------------------------

    /// Apply an insertion of `count` children at `start` under `parent`.
    ///
    /// Notifications are applied after the fact, so the children are matched
    /// against what the model holds now rather than spliced in by index.
    pub fn nodes_inserted<M>(
        &mut self,
        model: &M,
        parent: &TreePath<K>,
        start: usize,
        count: usize,
    ) -> RowPatch
    where
        M: TreeModel<Key = K>,
    {
        let Some(parent_id) = self.find(parent) else {
            return RowPatch::default();
        };
        if count == 0 {
            return RowPatch::default();
        }
        debug!("{} children inserted under {:?} at {}", count, parent, start);
        self.reconcile(model, parent_id, parent)
    }

    /// Apply a removal of `count` children at `start` under `parent`.
    pub fn nodes_removed<M>(
        &mut self,
        model: &M,
        parent: &TreePath<K>,
        start: usize,
        count: usize,
    ) -> RowPatch
    where
        M: TreeModel<Key = K>,
    {
        let Some(parent_id) = self.find(parent) else {
            return RowPatch::default();
        };
        if count == 0 {
            return RowPatch::default();
        }
        debug!("{} children removed under {:?} at {}", count, parent, start);
        self.reconcile(model, parent_id, parent)
    }

    /// Bring the fetched children of `parent_id` in line with the model's
    /// current children of `parent`.
    ///
    /// Rows whose key is still present keep their id, expansion state and
    /// subtree; new keys get fresh rows and the rest are released. Only the
    /// parent's own stretch of the flat list is rebuilt.
    fn reconcile<M>(&mut self, model: &M, parent_id: RowId, parent: &TreePath<K>) -> RowPatch
    where
        M: TreeModel<Key = K>,
    {
        let mut patch = RowPatch::default();
        let Some(row) = self.get(parent_id) else {
            return patch;
        };
        if !matches!(row.children, Children::Fetched(_)) {
            let leaf = model.is_leaf(parent);
            if let Some(row) = self.get_mut(parent_id) {
                row.leaf = leaf;
            }
            return patch;
        }
        let depth = row.depth + 1;
        let old = row.fetched_children().to_vec();
        let keys = model.children(parent);
        if old.len() == keys.len()
            && old
                .iter()
                .zip(&keys)
                .all(|(id, key)| self.key(*id) == Some(key))
        {
            return patch;
        }

        patch.reshaped = !self.detach_visible_descendants(parent_id).is_empty();

        let mut existing: HashMap<K, VecDeque<RowId>> = HashMap::new();
        for id in &old {
            if let Some(key) = self.key(*id) {
                existing.entry(key.clone()).or_default().push_back(*id);
            }
        }
        let mut children = Vec::with_capacity(keys.len());
        let mut seen = HashSet::new();
        for key in keys {
            if !seen.insert(key.clone()) {
                warn!("duplicate child {:?} under {:?}", key, parent);
            }
            let id = match existing.get_mut(&key).and_then(VecDeque::pop_front) {
                Some(id) => id,
                None => {
                    let leaf = model.is_leaf(&parent.child(key.clone()));
                    self.alloc(Row::new(Some(key), Some(parent_id), depth, leaf))
                }
            };
            children.push(id);
        }
        for id in existing.into_values().flatten() {
            self.release_subtree(id, &mut patch.removed);
        }

        let hidden_root = Some(parent_id) == self.root && !self.show_root;
        let leaf = children.is_empty() && model.is_leaf(parent);
        if let Some(row) = self.get_mut(parent_id) {
            row.children = Children::Fetched(children);
            row.leaf = leaf;
            if leaf && !hidden_root {
                row.expanded = false;
            }
        }
        if self.attach_visible_descendants(parent_id) > 0 {
            patch.reshaped = true;
        }
        debug!(
            "reconciled children of {:?} ({} rows released)",
            parent,
            patch.removed.len()
        );
        patch
    }

    /// Drop and re-fetch the subtree at `path`, restoring the expansion
    /// state of descendants that still exist under the same path.
    pub fn structure_changed<M>(&mut self, model: &M, path: &TreePath<K>) -> RowPatch
    where
        M: TreeModel<Key = K>,
    {
        let Some(id) = self.find(path) else {
            return RowPatch::default();
        };
        let mut restore = HashSet::new();
        self.expanded_paths(id, path, &mut restore);
        let was_expanded = self.is_expanded(id);

        let mut patch = RowPatch {
            reshaped: !self.detach_visible_descendants(id).is_empty(),
            ..Default::default()
        };
        patch.removed = self.release_children(id);
        let leaf = model.is_leaf(path);
        if let Some(row) = self.get_mut(id) {
            row.expanded = false;
            row.leaf = leaf;
        }

        let hidden_root = Some(id) == self.root && !self.show_root;
        if (was_expanded && !leaf) || hidden_root {
            self.open(model, id, path, &|p| restore.contains(p));
            if hidden_root && let Some(row) = self.get_mut(id) {
                row.expanded = true;
            }
            if self.attach_visible_descendants(id) > 0 {
                patch.reshaped = true;
            }
        }
        debug!(
            "reloaded {:?} ({} rows released, {} expansions restored)",
            path,
            patch.removed.len(),
            restore.len()
        );
        patch
    }

    /// Flat range whose display is affected by a content change at `path`.
    pub fn nodes_changed(&self, path: &TreePath<K>) -> Option<Range<usize>> {
        let id = self.find(path)?;
        self.subtree_range(id).filter(|range| !range.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemoryModel, NodeKey};

    fn sample() -> (MemoryModel, NodeKey, NodeKey, NodeKey, NodeKey) {
        let model = MemoryModel::new("root");
        let a = model.add_child(MemoryModel::ROOT, "A").unwrap();
        let b = model.add_child(MemoryModel::ROOT, "B").unwrap();
        let a1 = model.add_child(a, "A1").unwrap();
        let a2 = model.add_child(a, "A2").unwrap();
        (model, a, b, a1, a2)
    }

    fn keys(layer: &RowLayer<NodeKey>) -> Vec<Option<NodeKey>> {
        layer
            .visible_rows()
            .iter()
            .map(|id| layer.key(*id).copied())
            .collect()
    }

    fn assert_indices(layer: &RowLayer<NodeKey>) {
        for (index, id) in layer.visible_rows().iter().enumerate() {
            assert_eq!(layer.index_of(*id), Some(index));
        }
    }

    #[test]
    fn test_expand_inserts_after_row() {
        let (model, a, b, a1, a2) = sample();
        let mut layer = RowLayer::new(true, false);
        layer.attach(&model);
        let root = layer.root().unwrap();

        assert!(layer.expand(&model, root));
        assert_eq!(keys(&layer), vec![None, Some(a), Some(b)]);

        let row_a = layer.row_at(1).unwrap();
        assert!(layer.expand(&model, row_a));
        assert_eq!(keys(&layer), vec![None, Some(a), Some(a1), Some(a2), Some(b)]);
        assert_indices(&layer);

        assert!(!layer.expand(&model, row_a));
    }

    #[test]
    fn test_collapse_retains_children_by_default() {
        let (model, a, b, _, _) = sample();
        let mut layer = RowLayer::new(true, false);
        layer.attach(&model);
        let root = layer.root().unwrap();
        layer.expand(&model, root);
        let row_a = layer.row_at(1).unwrap();
        layer.expand(&model, row_a);

        let hidden = layer.collapse(row_a).unwrap();
        assert_eq!(hidden.len(), 2);
        assert!(hidden.iter().all(|id| layer.contains(*id)));
        assert_eq!(keys(&layer), vec![None, Some(a), Some(b)]);
        assert_indices(&layer);
        assert!(layer.collapse(row_a).is_none());
    }

    #[test]
    fn test_collapse_with_eviction_releases_rows() {
        let (model, _, _, _, _) = sample();
        let mut layer = RowLayer::new(true, true);
        layer.attach(&model);
        let root = layer.root().unwrap();
        layer.expand(&model, root);
        let row_a = layer.row_at(1).unwrap();
        layer.expand(&model, row_a);
        let a1 = layer.row_at(2).unwrap();

        let gone = layer.collapse(row_a).unwrap();
        assert!(gone.contains(&a1));
        assert!(!layer.contains(a1));
        assert!(!layer.is_fetched(row_a));

        layer.expand(&model, row_a);
        assert_eq!(layer.len(), 5);
        assert_ne!(layer.row_at(2), Some(a1));
    }

    #[test]
    fn test_hidden_root_shows_children_at_level_zero() {
        let (model, a, b, _, _) = sample();
        let mut layer = RowLayer::new(false, false);
        layer.attach(&model);
        assert_eq!(keys(&layer), vec![Some(a), Some(b)]);
        let row_a = layer.row_at(0).unwrap();
        assert_eq!(layer.level(row_a), Some(0));
        assert!(layer.collapse(layer.root().unwrap()).is_none());
    }

    #[test]
    fn test_stale_ids_do_not_alias_reused_slots() {
        let (model, a, _, _, _) = sample();
        let mut layer = RowLayer::new(true, true);
        layer.attach(&model);
        let root = layer.root().unwrap();
        layer.expand(&model, root);
        let row_a = layer.row_at(1).unwrap();
        layer.expand(&model, row_a);
        let old_child = layer.row_at(2).unwrap();
        layer.collapse(row_a);
        layer.expand(&model, row_a);

        assert!(!layer.contains(old_child));
        assert_eq!(layer.index_of(old_child), None);
        assert_eq!(layer.key(row_a), Some(&a));
    }
}

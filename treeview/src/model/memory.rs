//! An in-memory tree model with labeled nodes.

use std::collections::HashMap;
use std::sync::RwLock;

use log::warn;

use super::events::{ModelEvent, ModelEvents};
use super::path::TreePath;
use super::TreeModel;

/// Identity of a node in a [`MemoryModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    /// Raw numeric value of the key.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug)]
struct MemoryNode {
    label: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    /// Children not known yet; the node answers "not a leaf" until some arrive.
    deferred: bool,
}

#[derive(Debug)]
struct MemoryInner {
    next_key: u64,
    nodes: HashMap<NodeKey, MemoryNode>,
}

impl MemoryInner {
    fn path_of(&self, mut key: NodeKey) -> Option<TreePath<NodeKey>> {
        let mut keys = Vec::new();
        while key != MemoryModel::ROOT {
            let node = self.nodes.get(&key)?;
            keys.push(key);
            key = node.parent?;
        }
        keys.reverse();
        Some(TreePath::from(keys))
    }

    fn node_at(&self, path: &TreePath<NodeKey>) -> Option<&MemoryNode> {
        let key = path.last().copied().unwrap_or(MemoryModel::ROOT);
        self.nodes.get(&key)
    }

    fn allocate(&mut self, parent: NodeKey, label: String, deferred: bool) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes.insert(
            key,
            MemoryNode {
                label,
                parent: Some(parent),
                children: Vec::new(),
                deferred,
            },
        );
        key
    }

    fn forget_subtree(&mut self, key: NodeKey) {
        if let Some(node) = self.nodes.remove(&key) {
            for child in node.children {
                self.forget_subtree(child);
            }
        }
    }
}

/// A thread-safe tree of labeled nodes that reports every mutation.
///
/// Share it with a [`TreeView`](crate::TreeView) through an `Arc` and keep
/// mutating it from the host; the view picks the notifications up on its
/// next synchronization.
///
/// # Example
///
/// ```
/// use treeview::model::{MemoryModel, TreeModel, TreePath};
///
/// let model = MemoryModel::new("report");
/// let hw = model.add_child(MemoryModel::ROOT, "Hardware").unwrap();
/// let cpu = model.add_child(hw, "CPU").unwrap();
///
/// assert_eq!(model.children(&TreePath::root()), vec![hw]);
/// assert_eq!(model.path_of(cpu), Some(TreePath::from(vec![hw, cpu])));
/// assert!(model.is_leaf(&TreePath::from(vec![hw, cpu])));
/// ```
#[derive(Debug)]
pub struct MemoryModel {
    inner: RwLock<MemoryInner>,
    events: ModelEvents<NodeKey>,
}

impl MemoryModel {
    /// Key of the root node.
    pub const ROOT: NodeKey = NodeKey(0);

    /// Create a model holding only a root node.
    pub fn new(root_label: impl Into<String>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            Self::ROOT,
            MemoryNode {
                label: root_label.into(),
                parent: None,
                children: Vec::new(),
                deferred: false,
            },
        );
        Self {
            inner: RwLock::new(MemoryInner { next_key: 1, nodes }),
            events: ModelEvents::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Label of a node.
    pub fn label(&self, key: NodeKey) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.nodes.get(&key).map(|n| n.label.clone()))
    }

    /// Label of the node at `path`.
    pub fn label_at(&self, path: &TreePath<NodeKey>) -> Option<String> {
        self.label(path.last().copied().unwrap_or(Self::ROOT))
    }

    /// Path from the root to a node.
    pub fn path_of(&self, key: NodeKey) -> Option<TreePath<NodeKey>> {
        self.inner.read().ok().and_then(|g| g.path_of(key))
    }

    /// Children of a node, by key.
    pub fn children_of(&self, key: NodeKey) -> Vec<NodeKey> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.nodes.get(&key).map(|n| n.children.clone()))
            .unwrap_or_default()
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.nodes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Append a child. Returns `None` if `parent` does not exist.
    pub fn add_child(&self, parent: NodeKey, label: impl Into<String>) -> Option<NodeKey> {
        let index = self.children_of(parent).len();
        self.insert_child(parent, index, label)
    }

    /// Append a child whose own children are not known yet.
    ///
    /// The node reports "not a leaf" until children are added or it is
    /// expanded and found empty.
    pub fn add_deferred(&self, parent: NodeKey, label: impl Into<String>) -> Option<NodeKey> {
        let index = self.children_of(parent).len();
        self.insert_with(parent, index, label.into(), true)
    }

    /// Insert a child at `index` (clamped to the child count).
    pub fn insert_child(
        &self,
        parent: NodeKey,
        index: usize,
        label: impl Into<String>,
    ) -> Option<NodeKey> {
        self.insert_with(parent, index, label.into(), false)
    }

    fn insert_with(
        &self,
        parent: NodeKey,
        index: usize,
        label: String,
        deferred: bool,
    ) -> Option<NodeKey> {
        let (key, parent_path, start) = {
            let mut guard = self.inner.write().ok()?;
            let parent_path = guard.path_of(parent)?;
            let key = guard.allocate(parent, label, deferred);
            let node = guard.nodes.get_mut(&parent)?;
            let start = index.min(node.children.len());
            node.children.insert(start, key);
            node.deferred = false;
            (key, parent_path, start)
        };
        self.events.emit(ModelEvent::NodesInserted {
            parent: parent_path,
            start,
            count: 1,
        });
        Some(key)
    }

    /// Remove a node and its subtree. The root cannot be removed.
    pub fn remove(&self, key: NodeKey) -> bool {
        if key == Self::ROOT {
            warn!("MemoryModel::remove called on the root node");
            return false;
        }
        let removed = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            let Some(parent) = guard.nodes.get(&key).and_then(|n| n.parent) else {
                return false;
            };
            let Some(parent_path) = guard.path_of(parent) else {
                return false;
            };
            let Some(index) = guard
                .nodes
                .get(&parent)
                .and_then(|n| n.children.iter().position(|c| *c == key))
            else {
                return false;
            };
            if let Some(node) = guard.nodes.get_mut(&parent) {
                node.children.remove(index);
            }
            guard.forget_subtree(key);
            (parent_path, index)
        };
        self.events.emit(ModelEvent::NodesRemoved {
            parent: removed.0,
            start: removed.1,
            count: 1,
        });
        true
    }

    /// Change a node's label.
    pub fn set_label(&self, key: NodeKey, label: impl Into<String>) -> bool {
        let path = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            let Some(node) = guard.nodes.get_mut(&key) else {
                return false;
            };
            node.label = label.into();
            guard.path_of(key)
        };
        if let Some(path) = path {
            self.events.emit(ModelEvent::NodesChanged { path });
        }
        true
    }

    /// Replace every child of `parent` with fresh nodes.
    ///
    /// Reported as a structure change of `parent`.
    pub fn set_children<I, S>(&self, parent: NodeKey, labels: I) -> Vec<NodeKey>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (keys, path) = {
            let Ok(mut guard) = self.inner.write() else {
                return Vec::new();
            };
            let Some(path) = guard.path_of(parent) else {
                return Vec::new();
            };
            let old = guard
                .nodes
                .get_mut(&parent)
                .map(|n| std::mem::take(&mut n.children))
                .unwrap_or_default();
            for child in old {
                guard.forget_subtree(child);
            }
            let keys: Vec<_> = labels
                .into_iter()
                .map(|label| guard.allocate(parent, label.into(), false))
                .collect();
            if let Some(node) = guard.nodes.get_mut(&parent) {
                node.children = keys.clone();
                node.deferred = false;
            }
            (keys, path)
        };
        self.events.emit(ModelEvent::StructureChanged { path });
        keys
    }
}

impl TreeModel for MemoryModel {
    type Key = NodeKey;

    fn children(&self, path: &TreePath<NodeKey>) -> Vec<NodeKey> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.node_at(path).map(|n| n.children.clone()))
            .unwrap_or_default()
    }

    fn is_leaf(&self, path: &TreePath<NodeKey>) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.node_at(path).map(|n| n.children.is_empty() && !n.deferred))
            .unwrap_or(true)
    }

    fn events(&self) -> &ModelEvents<NodeKey> {
        &self.events
    }
}

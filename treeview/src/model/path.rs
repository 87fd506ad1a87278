//! Model-level addresses of tree nodes.

use std::fmt;

/// An ordered sequence of node keys from the model root.
///
/// The empty path addresses the root. Paths are plain addresses: they do not
/// own or cache children, and two paths are equal when their keys are equal
/// element-wise.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath<K> {
    keys: Vec<K>,
}

impl<K> TreePath<K> {
    /// The path of the model root.
    pub fn root() -> Self {
        Self { keys: Vec::new() }
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys (the root has length 0).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The keys from the root down to this node.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The key of the addressed node, `None` for the root.
    pub fn last(&self) -> Option<&K> {
        self.keys.last()
    }

    /// Whether `self` equals `ancestor` or lies below it.
    pub fn starts_with(&self, ancestor: &TreePath<K>) -> bool
    where
        K: PartialEq,
    {
        self.keys.starts_with(&ancestor.keys)
    }
}

impl<K: Clone> TreePath<K> {
    /// The path of a child of this node.
    pub fn child(&self, key: K) -> Self {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend_from_slice(&self.keys);
        keys.push(key);
        Self { keys }
    }

    /// The path of the parent node, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.keys.is_empty() {
            return None;
        }
        Some(Self {
            keys: self.keys[..self.keys.len() - 1].to_vec(),
        })
    }
}

impl<K> Default for TreePath<K> {
    fn default() -> Self {
        Self::root()
    }
}

impl<K> From<Vec<K>> for TreePath<K> {
    fn from(keys: Vec<K>) -> Self {
        Self { keys }
    }
}

impl<K> FromIterator<K> for TreePath<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for TreePath<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{:?}", key)?;
        }
        Ok(())
    }
}

//! The contract a data source satisfies to be displayed in a tree.

mod events;
mod memory;
mod path;

use std::fmt::Debug;
use std::hash::Hash;

pub use events::{ModelEvent, ModelEvents, Subscription};
pub use memory::{MemoryModel, NodeKey};
pub use path::TreePath;

/// A hierarchical data source.
///
/// Children are addressed by [`TreePath`]s built from the keys the model
/// itself hands out. Answers must stay stable until the model emits a
/// change event for the affected path through [`events`](Self::events).
///
/// # Example
///
/// ```ignore
/// struct Dirs { events: ModelEvents<String> }
///
/// impl TreeModel for Dirs {
///     type Key = String;
///
///     fn children(&self, path: &TreePath<String>) -> Vec<String> {
///         list_dir(path.keys())
///     }
///
///     fn is_leaf(&self, path: &TreePath<String>) -> bool {
///         !is_dir(path.keys())
///     }
///
///     fn events(&self) -> &ModelEvents<String> {
///         &self.events
///     }
/// }
/// ```
pub trait TreeModel {
    /// Opaque node identity. Equality decides path equality.
    type Key: Clone + Eq + Hash + Debug;

    /// Child keys of the node at `path`, in display order.
    fn children(&self, path: &TreePath<Self::Key>) -> Vec<Self::Key>;

    /// Whether the node at `path` can never have children.
    ///
    /// Consulted before an expand affordance is offered. When unsure, answer
    /// `false`: a node that turns out to have no children is shown as a leaf
    /// once expanded.
    fn is_leaf(&self, path: &TreePath<Self::Key>) -> bool;

    /// The hub this model emits change notifications into.
    fn events(&self) -> &ModelEvents<Self::Key>;
}

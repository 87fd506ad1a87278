//! Model-driven tree view engine.
//!
//! `treeview` is the data, selection and input core of a virtualized tree
//! control. A host supplies a [`TreeModel`](model::TreeModel), feeds raw input
//! into a [`TreeView`](view::TreeView), and paints whatever the node-control
//! pipeline reports for the rows inside the viewport.
//!
//! ```
//! use std::sync::Arc;
//! use treeview::prelude::*;
//!
//! let model = Arc::new(MemoryModel::new("report"));
//! let hardware = model.add_child(MemoryModel::ROOT, "Hardware").unwrap();
//! model.add_child(hardware, "CPU");
//!
//! let mut tree = TreeView::with_model(model.clone(), TreeConfig::default());
//! let labels = model.clone();
//! tree.add_control(TextControl::new(move |row: &RowInfo<NodeKey>| {
//!     labels.label_at(&row.path).unwrap_or_default()
//! }));
//!
//! let root = tree.rows().root().unwrap();
//! tree.expand(root);
//! tree.key_down(&KeyInput::new(Key::Down));
//! for event in tree.drain_events() {
//!     println!("{event:?}");
//! }
//! for row in tree.render_rows() {
//!     println!("{:?}", row.cells);
//! }
//! ```

pub mod config;
pub mod controls;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod model;
pub mod rows;
pub mod selection;
pub mod view;

pub use config::TreeConfig;
pub use error::{Result, TreeError};
pub use events::TreeEvent;
pub use view::TreeView;

pub mod prelude {
    pub use crate::config::TreeConfig;
    pub use crate::controls::{
        Alignment, CellLayout, DrawContext, DrawSelectionMode, NodeControl, NodeControls,
        RenderCell, RenderRow, RowInfo, RowLayout, TextControl, ToolTipProvider, TreeColumn,
    };
    pub use crate::error::TreeError;
    pub use crate::events::{DropPosition, DropTarget, TreeEvent};
    pub use crate::geometry::{Rect, Size};
    pub use crate::input::{
        InputSession, InputStateKind, Key, KeyInput, Modifiers, MouseButton, MouseInput,
        PointerEvent, RowHit,
    };
    pub use crate::model::{
        MemoryModel, ModelEvent, ModelEvents, NodeKey, Subscription, TreeModel, TreePath,
    };
    pub use crate::rows::{RowId, RowLayer, Viewport};
    pub use crate::selection::{Selection, SelectionMode};
    pub use crate::view::TreeView;
}

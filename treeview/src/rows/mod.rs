//! Row materialization: the arena of rows built from the model and the flat,
//! expand-aware list of visible rows derived from it.

mod layer;
mod viewport;

pub use layer::{RowId, RowLayer, RowPatch};
pub use viewport::Viewport;

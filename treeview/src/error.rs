//! Error types for checked tree operations.
//!
//! Gesture and selection operations never fail: stale rows and mode misuse
//! are no-ops. The checked lookups and `try_*` selection calls exist for
//! hosts that want to know why nothing happened.

use crate::rows::RowId;

/// Errors reported by checked tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The row was removed from the tree (collapse eviction or model removal).
    #[error("Row {0} is no longer part of the tree")]
    StaleRow(RowId),

    /// A flat row index past the end of the visible rows.
    #[error("Row index {index} out of range ({len} visible rows)")]
    RowIndexOutOfRange { index: usize, len: usize },

    /// No materialized row exists for the path.
    #[error("No row for path {0}")]
    PathNotFound(String),

    /// The row has no editable node control at the requested position.
    #[error("Row {0} has no editable node control")]
    NotEditable(RowId),

    /// Commit or cancel was requested with no label edit in progress.
    #[error("No label edit in progress")]
    NoEditSession,

    /// The view is in `SelectionMode::None`.
    #[error("Selection is disabled")]
    SelectionDisabled,
}

/// Result alias for checked tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

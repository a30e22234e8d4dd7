//! Errors returned by [`OrderedTree`][crate::linked::OrderedTree] operations that can fail.
//!
//! Lookups that may simply come up empty (`find`, `replace`, `successor`, `predecessor`) return
//! an `Option` instead.

use thiserror::Error;

/// Result type for fallible tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors that can occur when operating on a tree.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The requested item is not stored in the tree.
    #[error("item not found in tree")]
    NotFound,

    /// The argument is not something the operation can work with, e.g. a node handle taken from
    /// a different tree.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

//! Error types for the symbolic tree.
//!
//! Everything here is an invariant failure of the tree itself, not a user
//! data problem: user-facing failures (bad type specs, non-numeric data)
//! are reported as diagnostics by the bridge layer and never reach these
//! variants.

use thiserror::Error;

/// Failure inside the node layer.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum NodeError {
    /// Attempt to reassign the fixed head of a list node.
    #[error("cannot reassign the head of a list node to `{attempted}`")]
    HeadReassignment { attempted: String },

    /// A lazy node's materialization re-entered itself. Detected, never a
    /// silent loop.
    #[error("re-entrant materialization of a lazy list node")]
    ReentrantMaterialization,

    /// The buffer's element category has no promotion rule; raised at
    /// construction of the lazy node, not deferred to first access.
    #[error("buffer elements of kind {kind} have no promotion rule")]
    UnsupportedElementType { kind: &'static str },

    /// A trusted literal cache disagreed with the elements it covers.
    #[error("literal cache contract breach: {detail}")]
    LiteralCacheBreach { detail: String },
}

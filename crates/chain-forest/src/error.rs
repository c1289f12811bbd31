//! Contract-violation faults.

use thiserror::Error;

/// Errors reported by the insertion entry points when a [`NodeRef`]
/// argument does not resolve.
///
/// Search misses and removal of an unregistered node are not errors; those
/// paths report absence with `None` instead.
///
/// [`NodeRef`]: crate::NodeRef
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The reference belongs to a different tree instance.
    #[error("node reference belongs to a different tree")]
    Foreign,
    /// The referenced slot was retired or never handed out.
    #[error("node reference is stale")]
    Stale,
    /// The node to insert is already linked into the tree.
    #[error("node is already linked into the tree")]
    AlreadyLinked,
    /// The `insert_after` anchor is not linked into the tree.
    #[error("anchor node is not linked into the tree")]
    NotLinked,
}

//! Tree assembly errors

use beanwalk_reflect::ReflectError;

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Tree assembly and sorting errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Field resolution or access failed
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    /// A node's id slot holds `None`
    #[error("Node at position {index} has no id")]
    MissingId {
        /// Position in the input list
        index: usize,
    },

    /// Two nodes share an id under `DuplicatePolicy::Reject`
    #[error("Duplicate node id {id} at positions {first} and {second}")]
    DuplicateId {
        /// Debug rendering of the id
        id: String,
        /// Position of the first node
        first: usize,
        /// Position of the second node
        second: usize,
    },

    /// A node's parent id matches no node, under `OrphanPolicy::Reject`
    #[error("Node {id} references missing parent {parent}")]
    OrphanNode {
        /// Debug rendering of the node id
        id: String,
        /// Debug rendering of the missing parent id
        parent: String,
    },

    /// A node's parent chain never reaches a root, under `OrphanPolicy::Reject`
    #[error("Node {id} is not reachable from any root (parent cycle)")]
    Unreachable {
        /// Debug rendering of the node id
        id: String,
    },

    /// `assemble_single` found zero or several roots
    #[error("Expected exactly one root, found {found}")]
    RootCount {
        /// Number of roots found
        found: usize,
    },
}

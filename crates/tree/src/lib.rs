//! Live output tree for the reconciler.
//!
//! The tree is the mutable, already-attached side of reconciliation: patch
//! application rewrites it in place, node by node. Nodes live in an arena and
//! are addressed by [`NodeKey`]; a node is owned by its parent's child list,
//! and detaching it from that list is the only destruction the tree itself
//! performs (resource reclamation is the caller's concern, so detached nodes
//! stay addressable for the rest of the pass).

mod tree;
mod types;

pub use crate::tree::{Tree, TreeError};
pub use crate::types::NodeKey;

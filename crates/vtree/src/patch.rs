//! Patch records emitted by a differ and consumed by the applier.
//!
//! Notes:
//! - Each record pairs the old virtual node it replaces with a kind-specific
//!   payload; the applier receives the matching live node separately.
//! - The patch model may grow, so the enum is `#[non_exhaustive]`; appliers
//!   carry a pass-through arm for kinds they do not recognize.
//!
//! Invariants:
//! - Patches for one pass are applied in an order that keeps every target
//!   node reachable when it is visited (parent before child; a container's
//!   `Reorder` before its sibling `Remove`s).
//! - [`ReorderIndex`] indices are all within `[0, len)`, and `len` equals the
//!   container's live child count at the moment the reorder runs.
//! - Property order in [`PropsDelta`] is preserved; appliers must not dedupe.

use crate::vnode::{PropList, VNode};
use crate::widget::Widget;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One mutation step for a single live node.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum Patch {
    /// Detach the target node. `vnode` is the old virtual node it rendered
    /// from (consulted for widget teardown).
    Remove { vnode: VNode },
    /// Render `new_node` and append it to the target container.
    Insert { new_node: VNode },
    /// Replace the target's character payload (in place when the target is a
    /// text node, otherwise render-and-replace).
    Text { vnode: VNode, text: String },
    /// Update the target's widget in place when possible, else replace it.
    Widget {
        vnode: VNode,
        widget: Arc<dyn Widget>,
    },
    /// Unconditionally replace the target with a rendering of `new_node`.
    Replace { vnode: VNode, new_node: VNode },
    /// Permute the target container's children.
    Reorder { index: ReorderIndex },
    /// Reconcile the target's properties against the old virtual node's
    /// property list as baseline.
    Props { vnode: VNode, delta: PropsDelta },
    /// Resolve a deferred subtree: the payload patches run against the
    /// target, and the result may replace the target as the subtree root.
    Thunk { vnode: VNode, patches: Vec<Patch> },
}

/// Property changes for one node: removals first, then ordered upserts.
#[derive(Clone, Debug, Default)]
pub struct PropsDelta {
    pub set: PropList,
    pub remove: Vec<Arc<str>>,
}

/// Permutation-plus-removal descriptor for one container's children.
///
/// Built once by the differ, consumed read-only by the reorder engine. Slot
/// `i` either keeps its current child (no entry in `moves`) or is filled from
/// original index `moves[i]`. `reverse` is the inverse mapping, and `removes`
/// marks slots whose children arrive as separate `Remove` patches after the
/// reorder; the engine only accounts for them when computing anchors.
#[derive(Clone, Debug, Default)]
pub struct ReorderIndex {
    len: usize,
    moves: HashMap<usize, usize>,
    removes: HashSet<usize>,
    reverse: HashMap<usize, usize>,
}

impl ReorderIndex {
    /// Descriptor for a container currently holding `len` children.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    /// Pre-removal child count the descriptor was built against.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record that `slot` is filled from original index `from`. Keeps the
    /// inverse mapping in sync.
    pub fn record_move(&mut self, slot: usize, from: usize) {
        debug_assert!(slot < self.len, "move slot out of range");
        debug_assert!(from < self.len, "move source out of range");
        self.moves.insert(slot, from);
        self.reverse.insert(from, slot);
    }

    /// Record that the child at `slot` leaves as a separate `Remove` patch.
    pub fn record_remove(&mut self, slot: usize) {
        debug_assert!(slot < self.len, "remove slot out of range");
        self.removes.insert(slot);
    }

    /// Original index feeding `slot`, if the slot changes at all.
    pub fn move_from(&self, slot: usize) -> Option<usize> {
        self.moves.get(&slot).copied()
    }

    /// Slot the child at original index `from` will be pulled into.
    pub fn pulled_to(&self, from: usize) -> Option<usize> {
        self.reverse.get(&from).copied()
    }

    pub fn is_removed(&self, slot: usize) -> bool {
        self.removes.contains(&slot)
    }
}

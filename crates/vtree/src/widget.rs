use crate::vnode::VNode;
use std::fmt;
use tree::{NodeKey, Tree};

/// Stateful external behavior owned by a virtual node.
///
/// Widgets build their own live node and may update it in place across
/// reconciliation passes. The reconciler consults these capabilities but
/// never implements them.
pub trait Widget: fmt::Debug {
    /// Stable tag compared by [`should_update`]: two widgets with the same
    /// kind are updated in place, different kinds are replaced.
    fn kind(&self) -> &str;

    /// Build a fresh, detached live node for this widget.
    fn create(&self, tree: &mut Tree) -> NodeKey;

    /// Update the node produced by `previous` in place. `None` means the
    /// node is unchanged.
    fn update(&self, previous: &VNode, tree: &mut Tree, node: NodeKey) -> Option<NodeKey> {
        let _ = (previous, tree, node);
        None
    }

    /// Release widget-owned resources tied to `node`. Runs when the widget's
    /// live node is removed or replaced.
    fn destroy(&self, tree: &mut Tree, node: NodeKey) {
        let _ = (tree, node);
    }
}

/// Deferred virtual subtree, resolved lazily by the renderer.
pub trait Thunk: fmt::Debug {
    fn resolve(&self) -> VNode;
}

/// Whether `next` may update `previous`'s live node in place rather than
/// replacing it. True only when `previous` is a widget of the same kind.
pub fn should_update(previous: &VNode, next: &dyn Widget) -> bool {
    match previous {
        VNode::Widget(prev) => prev.kind() == next.kind(),
        _ => false,
    }
}

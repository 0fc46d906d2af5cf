//! External capabilities consumed by the applier.

use crate::apply::{ApplyError, apply_patch};
use crate::{props, render};
use std::sync::Arc;
use tree::{NodeKey, Tree};
use vtree::{Patch, PropsDelta, VNode};

/// Capability surface the patch dispatcher calls out to.
///
/// The dispatcher never renders, reconciles properties, or resolves thunks
/// itself; it asks the host. Any failure a host raises is fatal to the
/// current patch pass.
pub trait PatchHost {
    /// Produce a fresh, detached live node for `vnode`. Must not touch
    /// existing tree structure.
    fn render(&mut self, tree: &mut Tree, vnode: &VNode) -> Result<NodeKey, ApplyError>;

    /// Reconcile properties on one node, with the old virtual node's
    /// property list as baseline.
    fn apply_properties(
        &mut self,
        tree: &mut Tree,
        node: NodeKey,
        delta: &PropsDelta,
        previous: &[(Arc<str>, Option<String>)],
    ) -> Result<(), ApplyError>;

    /// Resolve a deferred subtree: apply `patches` against `root` in order
    /// and return the node that ends up as the subtree's root.
    fn sub_patch(
        &mut self,
        tree: &mut Tree,
        root: NodeKey,
        patches: &[Patch],
    ) -> Result<Option<NodeKey>, ApplyError>;

    /// True when `container`'s live children are only a partial view of the
    /// full output (siblings added out of band). Inserts into such a
    /// container are reported relative to the current last child, since a
    /// plain append would be ambiguous there.
    fn is_partial_container(&self, tree: &Tree, container: NodeKey) -> bool {
        let _ = (tree, container);
        false
    }

    /// Observer hook invoked alongside each structural change. Diagnostic
    /// only; the default does nothing.
    fn on_mutation(&mut self, mutation: &Mutation) {
        let _ = mutation;
    }
}

/// Description of one structural change, for [`PatchHost::on_mutation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Removed {
        parent: NodeKey,
        node: NodeKey,
    },
    Appended {
        parent: NodeKey,
        node: NodeKey,
    },
    /// Insert into a partial container, anchored on its last child.
    InsertedAfter {
        sibling: NodeKey,
        node: NodeKey,
    },
    Replaced {
        parent: NodeKey,
        old: NodeKey,
        new: NodeKey,
    },
    TextChanged {
        node: NodeKey,
    },
    Moved {
        container: NodeKey,
        node: NodeKey,
        before: Option<NodeKey>,
    },
}

/// Host wiring the built-in renderer and property reconciler, with no
/// partial containers and no observer.
#[derive(Debug, Default)]
pub struct BasicHost;

impl PatchHost for BasicHost {
    fn render(&mut self, tree: &mut Tree, vnode: &VNode) -> Result<NodeKey, ApplyError> {
        render::render_vnode(tree, vnode)
    }

    fn apply_properties(
        &mut self,
        tree: &mut Tree,
        node: NodeKey,
        delta: &PropsDelta,
        previous: &[(Arc<str>, Option<String>)],
    ) -> Result<(), ApplyError> {
        props::apply_props(tree, node, delta, previous)
    }

    fn sub_patch(
        &mut self,
        tree: &mut Tree,
        root: NodeKey,
        patches: &[Patch],
    ) -> Result<Option<NodeKey>, ApplyError> {
        let mut node = Some(root);
        for patch in patches {
            node = apply_patch(tree, patch, node, self)?;
        }
        Ok(node)
    }
}

//! Patch dispatch: translate one diff record into live-tree mutations.
//!
//! `apply_patch` returns the node that now occupies the position the input
//! node occupied: a fresh node after a replacement, the same node after an
//! in-place change, `None` after a removal. Handlers never fail on a missing
//! parent or container; an ancestor patch already handled that subtree, so
//! the mutation that would have happened there is skipped.

use crate::host::{Mutation, PatchHost};
use crate::reorder::reorder_children;
use std::sync::Arc;
use tree::{NodeKey, Tree, TreeError};
use vtree::{Patch, VNode, Widget, should_update};

#[derive(Debug)]
pub enum ApplyError {
    Tree(TreeError),
    /// Reorder descriptor length disagrees with the container's live child
    /// count.
    ChildCountMismatch {
        container: NodeKey,
        children: usize,
        descriptor: usize,
    },
    /// Failure raised by an external capability (render, property
    /// reconciliation, sub-patch). Fatal to the current pass.
    Host(String),
}

impl From<TreeError> for ApplyError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

/// Apply one patch record against the live node at its target position.
pub fn apply_patch(
    tree: &mut Tree,
    patch: &Patch,
    node: Option<NodeKey>,
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    log::trace!(target: "reconcile.apply", "apply patch={patch:?} node={node:?}");
    match patch {
        Patch::Remove { vnode } => remove_node(tree, node, vnode, host),
        Patch::Insert { new_node } => insert_node(tree, node, new_node, host),
        Patch::Text { vnode, text } => text_patch(tree, node, vnode, text, host),
        Patch::Widget { vnode, widget } => widget_patch(tree, node, vnode, widget, host),
        Patch::Replace { vnode, new_node } => replace_patch(tree, node, vnode, new_node, host),
        Patch::Reorder { index } => {
            if let Some(container) = node {
                reorder_children(tree, container, index, host)?;
            }
            Ok(node)
        }
        Patch::Props { vnode, delta } => {
            if let Some(target) = node {
                host.apply_properties(tree, target, delta, vnode.properties())?;
            }
            Ok(node)
        }
        Patch::Thunk { patches, .. } => thunk_patch(tree, node, patches, host),
        // Forward compatibility: kinds this applier does not recognize leave
        // the tree untouched.
        _ => Ok(node),
    }
}

fn remove_node(
    tree: &mut Tree,
    node: Option<NodeKey>,
    vnode: &VNode,
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    let Some(node) = node else {
        return Ok(None);
    };
    if let Some(parent) = tree.parent(node) {
        tree.detach(node)?;
        host.on_mutation(&Mutation::Removed { parent, node });
    }
    destroy_widget(tree, node, vnode);
    Ok(None)
}

fn insert_node(
    tree: &mut Tree,
    container: Option<NodeKey>,
    vnode: &VNode,
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    let fresh = host.render(tree, vnode)?;
    let Some(container) = container else {
        return Ok(None);
    };
    let after = tree
        .children(container)
        .last()
        .copied()
        .filter(|_| host.is_partial_container(tree, container));
    tree.append_child(container, fresh)?;
    match after {
        Some(sibling) => host.on_mutation(&Mutation::InsertedAfter {
            sibling,
            node: fresh,
        }),
        None => host.on_mutation(&Mutation::Appended {
            parent: container,
            node: fresh,
        }),
    }
    // Insertion is a side effect; the container keeps its position.
    Ok(Some(container))
}

fn text_patch(
    tree: &mut Tree,
    node: Option<NodeKey>,
    old_vnode: &VNode,
    text: &str,
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    let Some(node) = node else {
        return Ok(None);
    };
    let current = if tree.is_text(node) {
        tree.set_text(node, text)?;
        host.on_mutation(&Mutation::TextChanged { node });
        node
    } else {
        let fresh = host.render(tree, &VNode::text(text))?;
        replace_node(tree, node, fresh, host)?;
        fresh
    };
    destroy_widget(tree, node, old_vnode);
    Ok(Some(current))
}

fn widget_patch(
    tree: &mut Tree,
    node: Option<NodeKey>,
    old_vnode: &VNode,
    widget: &Arc<dyn Widget>,
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    let Some(node) = node else {
        return Ok(None);
    };
    if should_update(old_vnode, widget.as_ref()) {
        let updated = widget.update(old_vnode, tree, node);
        return Ok(Some(updated.unwrap_or(node)));
    }
    let fresh = host.render(tree, &VNode::Widget(Arc::clone(widget)))?;
    replace_node(tree, node, fresh, host)?;
    destroy_widget(tree, node, old_vnode);
    Ok(Some(fresh))
}

fn replace_patch(
    tree: &mut Tree,
    node: Option<NodeKey>,
    old_vnode: &VNode,
    new_vnode: &VNode,
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    let Some(node) = node else {
        return Ok(None);
    };
    let fresh = host.render(tree, new_vnode)?;
    replace_node(tree, node, fresh, host)?;
    destroy_widget(tree, node, old_vnode);
    Ok(Some(fresh))
}

fn thunk_patch(
    tree: &mut Tree,
    node: Option<NodeKey>,
    patches: &[Patch],
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    let Some(root) = node else {
        return Ok(None);
    };
    let new_root = host.sub_patch(tree, root, patches)?;
    replace_root(tree, Some(root), new_root, host)
}

/// Swap `old` for `new` under `old`'s parent. No-op when `old` is detached.
fn replace_node(
    tree: &mut Tree,
    old: NodeKey,
    new: NodeKey,
    host: &mut dyn PatchHost,
) -> Result<(), ApplyError> {
    if let Some(parent) = tree.parent(old) {
        tree.replace_child(parent, old, new)?;
        host.on_mutation(&Mutation::Replaced { parent, old, new });
    }
    Ok(())
}

/// Root swap for thunk resolution: the only path by which the root of the
/// patched tree itself can change identity. Replaces only when both roots
/// exist, differ, and the old root is still attached; the new root passes
/// through unchanged either way.
fn replace_root(
    tree: &mut Tree,
    old: Option<NodeKey>,
    new: Option<NodeKey>,
    host: &mut dyn PatchHost,
) -> Result<Option<NodeKey>, ApplyError> {
    if let (Some(old), Some(new)) = (old, new) {
        if old != new {
            replace_node(tree, old, new, host)?;
        }
    }
    Ok(new)
}

/// Widget teardown guard. Safe to call with any virtual-node variant; only a
/// widget's own destroy capability ever runs.
fn destroy_widget(tree: &mut Tree, node: NodeKey, vnode: &VNode) {
    if let VNode::Widget(widget) = vnode {
        widget.destroy(tree, node);
    }
}

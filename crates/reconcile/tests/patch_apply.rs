use reconcile::{
    ApplyError, BasicHost, Mutation, PatchHost, apply_patch, apply_props, render_vnode,
};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use tree::{NodeKey, Tree};
use vtree::{Patch, PropsDelta, ReorderIndex, VNode, Widget};

/// Widget whose lifecycle calls are observable from the outside.
#[derive(Clone, Debug)]
struct Counter {
    kind: &'static str,
    label: &'static str,
    updates: Rc<Cell<usize>>,
    destroys: Rc<Cell<usize>>,
}

impl Counter {
    fn new(kind: &'static str, label: &'static str) -> Self {
        Self {
            kind,
            label,
            updates: Rc::new(Cell::new(0)),
            destroys: Rc::new(Cell::new(0)),
        }
    }

    fn vnode(&self) -> VNode {
        VNode::Widget(Arc::new(self.clone()))
    }
}

impl Widget for Counter {
    fn kind(&self) -> &str {
        self.kind
    }

    fn create(&self, tree: &mut Tree) -> NodeKey {
        tree.create_text(self.label)
    }

    fn update(&self, _previous: &VNode, tree: &mut Tree, node: NodeKey) -> Option<NodeKey> {
        self.updates.set(self.updates.get() + 1);
        tree.set_text(node, self.label).ok()?;
        Some(node)
    }

    fn destroy(&self, _tree: &mut Tree, _node: NodeKey) {
        self.destroys.set(self.destroys.get() + 1);
    }
}

/// Host that records every mutation description and lets tests mark
/// containers as partial views.
#[derive(Debug, Default)]
struct RecordingHost {
    partial: Vec<NodeKey>,
    mutations: Vec<Mutation>,
}

impl PatchHost for RecordingHost {
    fn render(&mut self, tree: &mut Tree, vnode: &VNode) -> Result<NodeKey, ApplyError> {
        render_vnode(tree, vnode)
    }

    fn apply_properties(
        &mut self,
        tree: &mut Tree,
        node: NodeKey,
        delta: &PropsDelta,
        previous: &[(Arc<str>, Option<String>)],
    ) -> Result<(), ApplyError> {
        apply_props(tree, node, delta, previous)
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

    fn is_partial_container(&self, _tree: &Tree, container: NodeKey) -> bool {
        self.partial.contains(&container)
    }

    fn on_mutation(&mut self, mutation: &Mutation) {
        self.mutations.push(*mutation);
    }
}

/// Host whose sub-patch capability hands back a pre-made root, the way an
/// external thunk resolver would.
struct RootSwapHost {
    replacement: NodeKey,
}

impl PatchHost for RootSwapHost {
    fn render(&mut self, tree: &mut Tree, vnode: &VNode) -> Result<NodeKey, ApplyError> {
        render_vnode(tree, vnode)
    }

    fn apply_properties(
        &mut self,
        tree: &mut Tree,
        node: NodeKey,
        delta: &PropsDelta,
        previous: &[(Arc<str>, Option<String>)],
    ) -> Result<(), ApplyError> {
        apply_props(tree, node, delta, previous)
    }

    fn sub_patch(
        &mut self,
        _tree: &mut Tree,
        _root: NodeKey,
        _patches: &[Patch],
    ) -> Result<Option<NodeKey>, ApplyError> {
        Ok(Some(self.replacement))
    }
}

fn attach_text(tree: &mut Tree, parent: NodeKey, text: &str) -> NodeKey {
    let node = tree.create_text(text);
    tree.append_child(parent, node).unwrap();
    node
}

#[test]
fn remove_detaches_node_and_destroys_widget_once() {
    let mut tree = Tree::new();
    let parent = tree.create_element("div", Vec::new());
    let widget = Counter::new("gauge", "50%");
    let node = render_vnode(&mut tree, &widget.vnode()).unwrap();
    tree.append_child(parent, node).unwrap();

    let result = apply_patch(
        &mut tree,
        &Patch::Remove {
            vnode: widget.vnode(),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    assert_eq!(result, None);
    assert!(tree.children(parent).is_empty());
    assert_eq!(widget.destroys.get(), 1);
}

#[test]
fn remove_of_detached_node_still_runs_widget_teardown() {
    let mut tree = Tree::new();
    let widget = Counter::new("gauge", "50%");
    let node = render_vnode(&mut tree, &widget.vnode()).unwrap();

    let result = apply_patch(
        &mut tree,
        &Patch::Remove {
            vnode: widget.vnode(),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    assert_eq!(result, None);
    assert_eq!(widget.destroys.get(), 1);
}

#[test]
fn insert_appends_rendered_subtree_and_returns_container() {
    let mut tree = Tree::new();
    let container = tree.create_element("ul", Vec::new());

    let result = apply_patch(
        &mut tree,
        &Patch::Insert {
            new_node: VNode::element("li", Vec::new(), vec![VNode::text("item")]),
        },
        Some(container),
        &mut BasicHost,
    )
    .unwrap();

    assert_eq!(result, Some(container));
    let children = tree.children(container);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.name(children[0]), Some("li"));
}

#[test]
fn insert_without_container_attaches_nothing() {
    let mut tree = Tree::new();
    let result = apply_patch(
        &mut tree,
        &Patch::Insert {
            new_node: VNode::text("orphan"),
        },
        None,
        &mut BasicHost,
    )
    .unwrap();
    assert_eq!(result, None);
}

#[test]
fn text_patch_rewrites_text_node_in_place() {
    let mut tree = Tree::new();
    let parent = tree.create_element("p", Vec::new());
    let node = attach_text(&mut tree, parent, "before");

    let result = apply_patch(
        &mut tree,
        &Patch::Text {
            vnode: VNode::text("before"),
            text: "after".to_string(),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    // Same node object, same sibling count, new payload.
    assert_eq!(result, Some(node));
    assert_eq!(tree.children(parent), &[node]);
    assert_eq!(tree.text(node), Some("after"));
}

#[test]
fn text_patch_runs_widget_teardown_on_old_vnode() {
    let mut tree = Tree::new();
    let parent = tree.create_element("div", Vec::new());
    let widget = Counter::new("gauge", "before");
    let node = render_vnode(&mut tree, &widget.vnode()).unwrap();
    tree.append_child(parent, node).unwrap();

    let result = apply_patch(
        &mut tree,
        &Patch::Text {
            vnode: widget.vnode(),
            text: "after".to_string(),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    // In-place rewrite, but the old widget still tears down.
    assert_eq!(result, Some(node));
    assert_eq!(tree.text(node), Some("after"));
    assert_eq!(widget.destroys.get(), 1);
}

#[test]
fn text_patch_replaces_non_text_node() {
    let mut tree = Tree::new();
    let parent = tree.create_element("p", Vec::new());
    let node = tree.create_element("span", Vec::new());
    tree.append_child(parent, node).unwrap();

    let result = apply_patch(
        &mut tree,
        &Patch::Text {
            vnode: VNode::element("span", Vec::new(), Vec::new()),
            text: "plain".to_string(),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    let fresh = result.unwrap();
    assert_ne!(fresh, node);
    assert_eq!(tree.children(parent), &[fresh]);
    assert_eq!(tree.text(fresh), Some("plain"));
    assert_eq!(tree.parent(node), None);
}

#[test]
fn widget_patch_updates_matching_kind_in_place() {
    let mut tree = Tree::new();
    let parent = tree.create_element("div", Vec::new());
    let old = Counter::new("gauge", "50%");
    let node = render_vnode(&mut tree, &old.vnode()).unwrap();
    tree.append_child(parent, node).unwrap();

    let new = Counter::new("gauge", "75%");
    let result = apply_patch(
        &mut tree,
        &Patch::Widget {
            vnode: old.vnode(),
            widget: Arc::new(new.clone()),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    assert_eq!(result, Some(node));
    assert_eq!(tree.text(node), Some("75%"));
    assert_eq!(new.updates.get(), 1);
    assert_eq!(old.destroys.get(), 0);
}

#[test]
fn widget_patch_replaces_on_kind_change_and_destroys_old() {
    let mut tree = Tree::new();
    let parent = tree.create_element("div", Vec::new());
    let old = Counter::new("gauge", "50%");
    let node = render_vnode(&mut tree, &old.vnode()).unwrap();
    tree.append_child(parent, node).unwrap();

    let new = Counter::new("spinner", "...");
    let result = apply_patch(
        &mut tree,
        &Patch::Widget {
            vnode: old.vnode(),
            widget: Arc::new(new.clone()),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    let fresh = result.unwrap();
    assert_ne!(fresh, node);
    assert_eq!(tree.children(parent), &[fresh]);
    assert_eq!(tree.text(fresh), Some("..."));
    assert_eq!(old.destroys.get(), 1);
    assert_eq!(new.updates.get(), 0);
}

#[test]
fn replace_patch_always_swaps_node() {
    let mut tree = Tree::new();
    let parent = tree.create_element("div", Vec::new());
    let node = attach_text(&mut tree, parent, "old");

    let result = apply_patch(
        &mut tree,
        &Patch::Replace {
            vnode: VNode::text("old"),
            new_node: VNode::element("section", Vec::new(), Vec::new()),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    let fresh = result.unwrap();
    assert_ne!(fresh, node);
    assert_eq!(tree.children(parent), &[fresh]);
    assert_eq!(tree.name(fresh), Some("section"));
}

#[test]
fn replace_of_detached_node_returns_fresh_without_attaching() {
    let mut tree = Tree::new();
    let node = tree.create_text("old");

    let result = apply_patch(
        &mut tree,
        &Patch::Replace {
            vnode: VNode::text("old"),
            new_node: VNode::text("new"),
        },
        Some(node),
        &mut BasicHost,
    )
    .unwrap();

    let fresh = result.unwrap();
    assert_ne!(fresh, node);
    assert_eq!(tree.parent(fresh), None);
}

#[test]
fn reorder_patch_keeps_container_identity() {
    let mut tree = Tree::new();
    let container = tree.create_element("div", Vec::new());
    let a = attach_text(&mut tree, container, "a");
    let b = attach_text(&mut tree, container, "b");

    let mut index = ReorderIndex::new(2);
    index.record_move(0, 1);
    index.record_move(1, 0);

    let result = apply_patch(
        &mut tree,
        &Patch::Reorder { index },
        Some(container),
        &mut BasicHost,
    )
    .unwrap();

    assert_eq!(result, Some(container));
    assert_eq!(tree.children(container), &[b, a]);
}

#[test]
fn reorder_anticipates_sibling_removals() {
    let mut tree = Tree::new();
    let container = tree.create_element("div", Vec::new());
    let a = attach_text(&mut tree, container, "a");
    let b = attach_text(&mut tree, container, "b");
    let c = attach_text(&mut tree, container, "c");

    // Diff outcome: B leaves, C takes slot 1. Reorder runs first, then the
    // Remove patch for B, as the batch contract requires.
    let mut index = ReorderIndex::new(3);
    index.record_remove(1);
    index.record_move(1, 2);

    apply_patch(
        &mut tree,
        &Patch::Reorder { index },
        Some(container),
        &mut BasicHost,
    )
    .unwrap();
    apply_patch(
        &mut tree,
        &Patch::Remove {
            vnode: VNode::text("b"),
        },
        Some(b),
        &mut BasicHost,
    )
    .unwrap();

    assert_eq!(tree.children(container), &[a, c]);
}

#[test]
fn props_patch_is_idempotent() {
    let mut tree = Tree::new();
    let node = tree.create_element(
        "input",
        vec![(Arc::from("type"), Some("text".to_string()))],
    );
    let patch = Patch::Props {
        vnode: VNode::element(
            "input",
            vec![(Arc::from("type"), Some("text".to_string()))],
            Vec::new(),
        ),
        delta: PropsDelta {
            set: vec![(Arc::from("type"), Some("number".to_string()))],
            remove: Vec::new(),
        },
    };

    apply_patch(&mut tree, &patch, Some(node), &mut BasicHost).unwrap();
    let once = tree.attributes(node).to_vec();
    apply_patch(&mut tree, &patch, Some(node), &mut BasicHost).unwrap();
    assert_eq!(tree.attributes(node), once.as_slice());
}

#[test]
fn thunk_patch_swaps_root_under_parent() {
    let mut tree = Tree::new();
    let parent = tree.create_element("main", Vec::new());
    let old_root = tree.create_element("section", Vec::new());
    tree.append_child(parent, old_root).unwrap();
    let new_root = tree.create_element("article", Vec::new());

    let mut host = RootSwapHost {
        replacement: new_root,
    };
    let patch = Patch::Thunk {
        vnode: VNode::text("thunk"),
        patches: Vec::new(),
    };

    let result = apply_patch(&mut tree, &patch, Some(old_root), &mut host).unwrap();
    assert_eq!(result, Some(new_root));
    assert_eq!(tree.children(parent), &[new_root]);
    assert_eq!(tree.parent(old_root), None);

    // Resolving again to the same root is a no-op.
    let result = apply_patch(&mut tree, &patch, Some(new_root), &mut host).unwrap();
    assert_eq!(result, Some(new_root));
    assert_eq!(tree.children(parent), &[new_root]);
}

#[test]
fn thunk_patch_threads_payload_patches_through_the_root() {
    let mut tree = Tree::new();
    let parent = tree.create_element("main", Vec::new());
    let root = attach_text(&mut tree, parent, "stale");

    let patch = Patch::Thunk {
        vnode: VNode::text("thunk"),
        patches: vec![Patch::Replace {
            vnode: VNode::text("stale"),
            new_node: VNode::element("section", Vec::new(), Vec::new()),
        }],
    };

    let result = apply_patch(&mut tree, &patch, Some(root), &mut BasicHost).unwrap();
    let fresh = result.unwrap();
    assert_ne!(fresh, root);
    assert_eq!(tree.children(parent), &[fresh]);
    assert_eq!(tree.name(fresh), Some("section"));
}

#[test]
fn observer_distinguishes_append_from_partial_container_insert() {
    let mut tree = Tree::new();
    let container = tree.create_element("body", Vec::new());
    let mut host = RecordingHost::default();

    apply_patch(
        &mut tree,
        &Patch::Insert {
            new_node: VNode::text("first"),
        },
        Some(container),
        &mut host,
    )
    .unwrap();
    let first = tree.children(container)[0];
    assert_eq!(
        host.mutations.last(),
        Some(&Mutation::Appended {
            parent: container,
            node: first,
        })
    );

    // Once the container's live children are only a partial view, the same
    // insert is reported relative to the current last child.
    host.partial.push(container);
    apply_patch(
        &mut tree,
        &Patch::Insert {
            new_node: VNode::text("second"),
        },
        Some(container),
        &mut host,
    )
    .unwrap();
    let second = tree.children(container)[1];
    assert_eq!(
        host.mutations.last(),
        Some(&Mutation::InsertedAfter {
            sibling: first,
            node: second,
        })
    );
}

#[test]
fn observer_sees_removals_and_replacements() {
    let mut tree = Tree::new();
    let parent = tree.create_element("div", Vec::new());
    let node = attach_text(&mut tree, parent, "x");
    let mut host = RecordingHost::default();

    apply_patch(
        &mut tree,
        &Patch::Remove {
            vnode: VNode::text("x"),
        },
        Some(node),
        &mut host,
    )
    .unwrap();
    assert_eq!(host.mutations, vec![Mutation::Removed { parent, node }]);
}

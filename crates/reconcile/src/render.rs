//! Default renderer: virtual node to fresh, detached live subtree.

use crate::apply::ApplyError;
use tree::{NodeKey, Tree};
use vtree::VNode;

/// Build a detached live rendering of `vnode`. Elements render their
/// children recursively, widgets build their own node, thunks resolve first.
/// Existing tree structure is never touched.
pub fn render_vnode(tree: &mut Tree, vnode: &VNode) -> Result<NodeKey, ApplyError> {
    match vnode {
        VNode::Text(text) => Ok(tree.create_text(text.clone())),
        VNode::Element(element) => {
            let node = tree.create_element(element.name.clone(), element.properties.clone());
            for child in &element.children {
                let rendered = render_vnode(tree, child)?;
                tree.append_child(node, rendered)?;
            }
            Ok(node)
        }
        VNode::Widget(widget) => Ok(widget.create(tree)),
        VNode::Thunk(thunk) => render_vnode(tree, &thunk.resolve()),
    }
}

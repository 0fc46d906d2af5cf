//! Arena-backed mutable tree.
//!
//! Invariants:
//! - A node has at most one parent; structural ops must not create cycles.
//! - Child order is explicit and preserved exactly as mutated.
//! - Attribute order is preserved; `set_attribute` upserts in place.
//! - Detaching a node keeps it (and its subtree) addressable; only the
//!   parent/child links change.
//! - Text payloads exist only on text nodes; attributes only on elements.

use crate::types::NodeKey;
use std::sync::Arc;

#[derive(Debug)]
pub enum TreeError {
    MissingNode(NodeKey),
    NotAContainer(NodeKey),
    NotText(NodeKey),
    NotAnElement(NodeKey),
    AlreadyAttached(NodeKey),
    NotAChild { parent: NodeKey, child: NodeKey },
    CycleDetected { parent: NodeKey, child: NodeKey },
}

#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<NodeRecord>,
}

impl Tree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        (key.0 as usize) < self.nodes.len()
    }

    /// Create a detached element node.
    pub fn create_element(
        &mut self,
        name: impl Into<Arc<str>>,
        attributes: Vec<(Arc<str>, Option<String>)>,
    ) -> NodeKey {
        self.push_record(NodeKind::Element {
            name: name.into(),
            attributes,
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeKey {
        self.push_record(NodeKind::Text { text: text.into() })
    }

    fn push_record(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        key
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key.0 as usize).and_then(|record| record.parent)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key.0 as usize)
            .map(|record| record.children.as_slice())
            .unwrap_or_default()
    }

    pub fn is_element(&self, key: NodeKey) -> bool {
        matches!(
            self.nodes.get(key.0 as usize),
            Some(NodeRecord {
                kind: NodeKind::Element { .. },
                ..
            })
        )
    }

    pub fn is_text(&self, key: NodeKey) -> bool {
        matches!(
            self.nodes.get(key.0 as usize),
            Some(NodeRecord {
                kind: NodeKind::Text { .. },
                ..
            })
        )
    }

    pub fn name(&self, key: NodeKey) -> Option<&str> {
        match self.nodes.get(key.0 as usize)?.kind {
            NodeKind::Element { ref name, .. } => Some(name),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn text(&self, key: NodeKey) -> Option<&str> {
        match self.nodes.get(key.0 as usize)?.kind {
            NodeKind::Text { ref text } => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attributes(&self, key: NodeKey) -> &[(Arc<str>, Option<String>)] {
        match self.nodes.get(key.0 as usize).map(|record| &record.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, key: NodeKey, name: &str) -> Option<&Option<String>> {
        self.attributes(key)
            .iter()
            .find(|(attr, _)| attr.as_ref() == name)
            .map(|(_, value)| value)
    }

    /// Append `child` to the end of `parent`'s child list. `child` must be
    /// detached.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), TreeError> {
        self.check_attachable(parent, child)?;
        log::trace!(target: "tree.mutate", "append parent={parent:?} child={child:?}");
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Insert a detached `child` immediately before `before`, which must be a
    /// current child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: NodeKey,
    ) -> Result<(), TreeError> {
        self.check_attachable(parent, child)?;
        let pos = self.child_position(parent, before)?;
        log::trace!(target: "tree.mutate", "insert parent={parent:?} child={child:?} before={before:?}");
        self.record_mut(parent)?.children.insert(pos, child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Relocate `child` within `parent`'s child list so it sits immediately
    /// before `anchor` (or at the end when `anchor` is `None`). A single
    /// splice; the node is never detached from the tree's point of view.
    pub fn move_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        anchor: Option<NodeKey>,
    ) -> Result<(), TreeError> {
        if anchor == Some(child) {
            return Ok(());
        }
        let from = self.child_position(parent, child)?;
        let to = match anchor {
            Some(anchor) => {
                let mut pos = self.child_position(parent, anchor)?;
                if pos > from {
                    pos -= 1;
                }
                pos
            }
            None => self.record(parent)?.children.len() - 1,
        };
        log::trace!(target: "tree.mutate", "move parent={parent:?} child={child:?} anchor={anchor:?}");
        let children = &mut self.record_mut(parent)?.children;
        children.remove(from);
        children.insert(to, child);
        Ok(())
    }

    /// Unlink `node` from its parent. No-op when already detached.
    pub fn detach(&mut self, node: NodeKey) -> Result<(), TreeError> {
        let Some(parent) = self.record(node)?.parent else {
            return Ok(());
        };
        log::trace!(target: "tree.mutate", "detach node={node:?} parent={parent:?}");
        if let Ok(record) = self.record_mut(parent) {
            record.children.retain(|key| *key != node);
        }
        self.record_mut(node)?.parent = None;
        Ok(())
    }

    /// Swap `old` for the detached node `new` at `old`'s position under
    /// `parent`. `old` ends up detached.
    pub fn replace_child(
        &mut self,
        parent: NodeKey,
        old: NodeKey,
        new: NodeKey,
    ) -> Result<(), TreeError> {
        self.check_attachable(parent, new)?;
        let pos = self.child_position(parent, old)?;
        log::trace!(target: "tree.mutate", "replace parent={parent:?} old={old:?} new={new:?}");
        self.record_mut(parent)?.children[pos] = new;
        self.record_mut(old)?.parent = None;
        self.record_mut(new)?.parent = Some(parent);
        Ok(())
    }

    /// Overwrite a text node's character payload in place.
    pub fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), TreeError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Text { text: existing } => {
                existing.clear();
                existing.push_str(text);
                Ok(())
            }
            NodeKind::Element { .. } => {
                debug_assert!(false, "set_text target must be a text node");
                Err(TreeError::NotText(key))
            }
        }
    }

    /// Upsert one attribute on an element, preserving attribute order.
    pub fn set_attribute(
        &mut self,
        key: NodeKey,
        name: Arc<str>,
        value: Option<String>,
    ) -> Result<(), TreeError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(attr, _)| *attr == name) {
                    Some(slot) => slot.1 = value,
                    None => attributes.push((name, value)),
                }
                Ok(())
            }
            NodeKind::Text { .. } => {
                debug_assert!(false, "attribute target must be an element");
                Err(TreeError::NotAnElement(key))
            }
        }
    }

    /// Drop one attribute from an element. No-op when absent.
    pub fn remove_attribute(&mut self, key: NodeKey, name: &str) -> Result<(), TreeError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.retain(|(attr, _)| attr.as_ref() != name);
                Ok(())
            }
            NodeKind::Text { .. } => {
                debug_assert!(false, "attribute target must be an element");
                Err(TreeError::NotAnElement(key))
            }
        }
    }

    fn check_attachable(&self, parent: NodeKey, child: NodeKey) -> Result<(), TreeError> {
        if parent == child || self.is_descendant(child, parent) {
            debug_assert!(false, "cannot create cycle");
            return Err(TreeError::CycleDetected { parent, child });
        }
        if !self.record(parent)?.allows_children() {
            debug_assert!(false, "parent node cannot have children");
            return Err(TreeError::NotAContainer(parent));
        }
        if self.record(child)?.parent.is_some() {
            debug_assert!(false, "child already has a parent");
            return Err(TreeError::AlreadyAttached(child));
        }
        Ok(())
    }

    fn child_position(&self, parent: NodeKey, child: NodeKey) -> Result<usize, TreeError> {
        self.record(parent)?
            .children
            .iter()
            .position(|key| *key == child)
            .ok_or(TreeError::NotAChild { parent, child })
    }

    fn is_descendant(&self, ancestor: NodeKey, maybe_descendant: NodeKey) -> bool {
        let Some(record) = self.nodes.get(ancestor.0 as usize) else {
            return false;
        };
        let mut stack: Vec<NodeKey> = record.children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            stack.extend_from_slice(self.children(current));
        }
        false
    }

    fn record(&self, key: NodeKey) -> Result<&NodeRecord, TreeError> {
        self.nodes
            .get(key.0 as usize)
            .ok_or(TreeError::MissingNode(key))
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, TreeError> {
        self.nodes
            .get_mut(key.0 as usize)
            .ok_or(TreeError::MissingNode(key))
    }
}

#[derive(Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

#[derive(Debug)]
enum NodeKind {
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
    },
    Text {
        text: String,
    },
}

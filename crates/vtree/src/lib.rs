//! Virtual-tree protocol layer.
//!
//! This crate defines the immutable side of reconciliation: virtual nodes
//! ([`VNode`]), the widget and thunk capability traits, and the patch records
//! ([`Patch`]) a differ emits for one `old -> new` transition. The live tree
//! and the applier that consumes these records live in the `tree` and
//! `reconcile` crates.

mod patch;
mod vnode;
mod widget;

pub use crate::patch::{Patch, PropsDelta, ReorderIndex};
pub use crate::vnode::{PropList, VElement, VNode};
pub use crate::widget::{Thunk, Widget, should_update};

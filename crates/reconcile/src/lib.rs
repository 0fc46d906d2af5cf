//! Patch application for the virtual-tree reconciler.
//!
//! Given a live [`tree::Tree`], the patch records a differ produced for one
//! `old -> new` transition, and a [`PatchHost`] supplying the external
//! capabilities (rendering, property reconciliation, sub-patching,
//! observation), [`apply_patch`] performs the minimum tree mutations that
//! bring the live tree into agreement with the new virtual representation.
//!
//! Contract:
//! - One call per patch record; the caller walks the batch in an order that
//!   keeps each target node reachable when visited.
//! - Single-threaded and synchronous; the caller owns the tree exclusively
//!   for the whole pass.
//! - Missing parents/containers are expected conditions and skip silently;
//!   capability failures abort the pass as [`ApplyError`]s.

mod apply;
mod host;
mod props;
mod render;
mod reorder;

pub use crate::apply::{ApplyError, apply_patch};
pub use crate::host::{BasicHost, Mutation, PatchHost};
pub use crate::props::apply_props;
pub use crate::render::render_vnode;
pub use crate::reorder::reorder_children;

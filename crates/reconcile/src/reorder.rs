//! Child reordering: minimal in-place moves for a permutation descriptor.
//!
//! Contract:
//! - Single left-to-right pass over logical slots `0..len`, O(len) moves,
//!   each move one splice in the live child list (`Tree::move_before`).
//! - Children already in their final slot are never touched.
//! - Removals listed in the descriptor are NOT performed here; they arrive
//!   as separate `Remove` patches applied after this reorder in the same
//!   batch. Their slots only feed the anchor offset, so anchors land where
//!   they should once those removals execute. That relative order is part of
//!   the patch-batch contract, not an assumption.

use crate::apply::ApplyError;
use crate::host::{Mutation, PatchHost};
use tree::{NodeKey, Tree};
use vtree::ReorderIndex;

/// Bring `container`'s children into the order `index` describes.
///
/// Container identity never changes; only child positions do.
pub fn reorder_children(
    tree: &mut Tree,
    container: NodeKey,
    index: &ReorderIndex,
    host: &mut dyn PatchHost,
) -> Result<(), ApplyError> {
    // Snapshot the pre-mutation arrangement; moves below rewrite the live
    // list as the pass goes, but `moves[i]` indexes the original order.
    let before: Vec<NodeKey> = tree.children(container).to_vec();
    if before.len() != index.len() {
        debug_assert!(false, "reorder descriptor length must match child count");
        return Err(ApplyError::ChildCountMismatch {
            container,
            children: before.len(),
            descriptor: index.len(),
        });
    }

    // Cumulative drift between logical slot index and live slot index, from
    // moves already made, moves still pending, and scheduled removals.
    let mut insert_offset: isize = 0;

    for slot in 0..before.len() {
        if let Some(from) = index.move_from(slot) {
            if from != slot {
                // The child sitting at this slot moves again later, to a
                // position after it; its departure leaves a gap that must be
                // compensated now.
                if index.pulled_to(slot).is_some_and(|to| to > slot) {
                    insert_offset += 1;
                }

                let target = before[from];
                let anchor = anchor_at(tree.children(container), slot as isize + insert_offset);
                if anchor != Some(target) {
                    tree.move_before(container, target, anchor)?;
                    host.on_mutation(&Mutation::Moved {
                        container,
                        node: target,
                        before: anchor,
                    });
                }

                // Pulled from earlier in the original order; that slot is now
                // vacated and later indices shift left.
                if from < slot {
                    insert_offset -= 1;
                }
            }
        }

        // A pending `Remove` patch will shrink the list at this slot; anchors
        // computed past here must act as if it were already gone.
        if index.is_removed(slot) {
            insert_offset += 1;
        }
    }

    Ok(())
}

fn anchor_at(children: &[NodeKey], at: isize) -> Option<NodeKey> {
    usize::try_from(at)
        .ok()
        .and_then(|at| children.get(at).copied())
}

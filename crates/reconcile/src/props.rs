//! Default property reconciliation for one element.

use crate::apply::ApplyError;
use std::sync::Arc;
use tree::{NodeKey, Tree};
use vtree::PropsDelta;

/// Reconcile `delta` onto `node`, with `previous` (the old virtual node's
/// property list) as baseline. Removals run first, then ordered upserts;
/// an upsert whose value already matches both the baseline and the live
/// attribute is skipped. Deterministic and convergent: applying the same
/// delta twice ends in the same state as applying it once.
pub fn apply_props(
    tree: &mut Tree,
    node: NodeKey,
    delta: &PropsDelta,
    previous: &[(Arc<str>, Option<String>)],
) -> Result<(), ApplyError> {
    for name in &delta.remove {
        tree.remove_attribute(node, name)?;
    }
    for (name, value) in &delta.set {
        let unchanged = previous
            .iter()
            .any(|(prev_name, prev_value)| prev_name == name && prev_value == value)
            && tree.attribute(node, name) == Some(value);
        if !unchanged {
            tree.set_attribute(node, Arc::clone(name), value.clone())?;
        }
    }
    Ok(())
}

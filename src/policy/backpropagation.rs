//! Backpropagation of evaluation results
//!
//! A value is always the probability that the root player wins. Credit then
//! alternates by ply parity along the path: nodes where the root player is to
//! move (even depth) receive `value`, nodes where the opponent is to move (odd
//! depth) receive `1 - value`. A draw therefore credits 0.5 everywhere.

use crate::{
    tree::{NodePath, SearchTree},
    MCTSError, Result,
};

/// Credit for the player to move at `depth` plies below the root
pub fn credit_at_depth(depth: usize, value: f64) -> f64 {
    if depth % 2 == 0 {
        value
    } else {
        1.0 - value
    }
}

/// Applies one finished evaluation along `path`
///
/// Every node on the path gains exactly one visit and its parity credit. If the
/// path carries virtual loss, the provisional visit and penalty it charged are
/// removed in the same pass, so afterwards the statistics reflect only real
/// outcomes. Taking the path by value means a charge is settled once.
///
/// Nothing is modified unless the whole update is valid.
///
/// # Errors
///
/// - [`MCTSError::InvalidValue`] if `value` is NaN or outside `[0, 1]`
/// - [`MCTSError::InvalidPath`] if the path does not start at the root or does
///   not follow parent links
/// - [`MCTSError::CorruptedTree`] if the path carries virtual loss that some
///   node on it has no record of
pub fn backpropagate(tree: &mut SearchTree, path: NodePath, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MCTSError::InvalidValue(value));
    }
    tree.check_path(&path)?;

    if path.virtual_loss.is_some() {
        if let Some(&node) = path
            .nodes
            .iter()
            .find(|&&id| tree.node(id).virtual_visits == 0)
        {
            return Err(MCTSError::CorruptedTree { node });
        }
    }

    let arena = tree.arena_mut();
    for (depth, &id) in path.nodes.iter().enumerate() {
        let node = arena.get_mut(id);
        node.visit_count += 1;
        node.win_accumulator += credit_at_depth(depth, value);

        if let Some(penalty) = path.virtual_loss {
            node.virtual_visits -= 1;
            node.virtual_penalty -= penalty;
            if node.virtual_visits == 0 {
                node.virtual_penalty = 0.0;
            }
        }
    }

    log::trace!("backpropagated {:.3} along {}", value, path);
    Ok(())
}

//! Expansion materializes every legal child of a newly reached leaf.

use crate::{
    arena::NodeId,
    game_state::GameState,
    tree::SearchTree,
    MCTSError, Result,
};

/// Creates a child for every legal move at `node` that has no edge yet
///
/// Terminal positions are left untouched: they never gain children and are
/// never marked expanded. Otherwise the node is marked expanded once every
/// legal move has an edge, so calling this twice does no duplicate work.
///
/// Returns the number of nodes created.
///
/// # Errors
///
/// - [`MCTSError::CorruptedTree`] if `node` is not in the tree; nothing is
///   allocated
/// - [`MCTSError::CapacityExceeded`] if the arena fills up; the node then stays
///   unexpanded
pub fn expand<S: GameState>(tree: &mut SearchTree, node: NodeId, board: &S) -> Result<usize> {
    if tree.arena().try_get(node).is_none() {
        return Err(MCTSError::CorruptedTree { node });
    }
    if board.terminal_state().is_some() {
        return Ok(0);
    }

    let mut created = 0;
    for placement in board.legal_moves() {
        if tree.add_child(node, placement.column)?.is_some() {
            created += 1;
        }
    }

    let record = tree.arena_mut().get_mut(node);
    if !record.expanded {
        record.expanded = true;
        log::trace!("expanded node {} with {} new children", node, created);
    }

    Ok(created)
}

//! Selection policies for the MCTS algorithm
//!
//! Selection policies decide which existing child to descend into while
//! walking from the root to a leaf, balancing exploration and exploitation.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::{
    arena::{Node, NodeId, ROOT},
    game_state::{GameState, Outcome, Placement, Player},
    tree::{NodePath, SearchTree},
    utils::{self, UNVISITED_SCORE},
    MCTSError, Result,
};

/// Trait for policies that select nodes to explore
pub trait SelectionPolicy: Send + Sync {
    /// Scores one child
    ///
    /// `parent_visits` includes in-flight virtual visits. The child's
    /// `win_accumulator` is credit for the player to move at the child, that is
    /// the opponent of the player making this choice.
    fn score(&self, child: &Node, parent_visits: u64) -> f64;

    /// Selects among `candidates`, breaking ties uniformly at random
    ///
    /// Returns `None` only when `candidates` is empty.
    fn select_child(
        &self,
        tree: &SearchTree,
        parent: NodeId,
        candidates: &[NodeId],
        rng: &mut dyn RngCore,
    ) -> Option<NodeId> {
        let parent_visits = tree.node(parent).effective_visits();
        let scored: Vec<(NodeId, f64)> = candidates
            .iter()
            .map(|&id| (id, self.score(tree.node(id), parent_visits)))
            .collect();

        let best = scored
            .iter()
            .map(|&(_, score)| score)
            .fold(f64::NEG_INFINITY, f64::max);

        let tied: Vec<NodeId> = scored
            .iter()
            .filter(|&&(_, score)| utils::is_tied(score, best))
            .map(|&(id, _)| id)
            .collect();

        tied.choose(rng).copied()
    }
}

/// Upper Confidence bound applied to Trees (UCT)
///
/// ```text
/// UCT = wins / visits + exploration_constant * sqrt(ln(parent_visits) / visits)
/// ```
///
/// `wins` and `visits` are seen by the player choosing the child, with virtual
/// loss folded in: each in-flight selection adds a visit and subtracts its
/// penalty from the chooser's wins. Children with no visits at all score
/// [`UNVISITED_SCORE`].
#[derive(Debug, Clone)]
pub struct UctPolicy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    pub exploration_constant: f64,
}

impl UctPolicy {
    /// Creates a new UCT policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UctPolicy {
            exploration_constant,
        }
    }

    /// Wins credited to the player choosing `child`, net of virtual loss
    pub fn chooser_wins(child: &Node) -> f64 {
        child.visit_count as f64 - child.win_accumulator - child.virtual_penalty
    }
}

impl Default for UctPolicy {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl SelectionPolicy for UctPolicy {
    fn score(&self, child: &Node, parent_visits: u64) -> f64 {
        let visits = child.effective_visits();
        if visits == 0 {
            return UNVISITED_SCORE;
        }
        utils::uct_value(
            Self::chooser_wins(child),
            visits,
            parent_visits,
            self.exploration_constant,
        )
    }
}

/// The node reached at the end of one selection walk
#[derive(Debug, Clone)]
pub struct Leaf<S> {
    /// Id of the leaf node
    pub node: NodeId,

    /// Position at the leaf
    pub board: S,

    /// Player to move at the leaf
    pub to_move: Player,

    /// Nodes visited from the root to the leaf
    pub path: NodePath,

    /// Finished-game result at the leaf, if the game is over there
    pub outcome: Option<Outcome>,
}

impl<S> Leaf<S> {
    /// Returns true if the game is over at the leaf
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Walks from the root to a leaf
///
/// While the current node is expanded, the policy picks among the children
/// whose edges exist for the position's legal moves, the move is applied and
/// the player to move flips. The walk stops at an unexpanded node or at a
/// position with no legal moves.
///
/// # Errors
///
/// Returns [`MCTSError::CorruptedTree`] if an expanded node has legal moves but
/// none of them has an edge.
pub fn select_leaf<S: GameState>(
    tree: &SearchTree,
    policy: &dyn SelectionPolicy,
    root_board: &S,
    root_player: Player,
    rng: &mut dyn RngCore,
) -> Result<Leaf<S>> {
    let mut node = ROOT;
    let mut board = root_board.clone();
    let mut to_move = root_player;
    let mut path = NodePath::new();
    let mut last_move: Option<(Placement, Player)> = None;

    while tree.node(node).expanded {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }

        let candidates: Vec<(Placement, NodeId)> = moves
            .iter()
            .filter_map(|&placement| {
                tree.child(node, placement.column)
                    .map(|child| (placement, child))
            })
            .collect();

        let ids: Vec<NodeId> = candidates.iter().map(|&(_, id)| id).collect();
        let chosen = policy
            .select_child(tree, node, &ids, rng)
            .ok_or(MCTSError::CorruptedTree { node })?;
        let placement = candidates
            .iter()
            .find(|&&(_, id)| id == chosen)
            .map(|&(placement, _)| placement)
            .ok_or(MCTSError::CorruptedTree { node })?;

        board = board.apply_move(to_move, placement)?;
        last_move = Some((placement, to_move));
        to_move = to_move.opponent();
        node = chosen;
        path.push(node);
    }

    let outcome = match last_move {
        Some((placement, player)) => board.terminal_state_after(placement, player),
        None => board.terminal_state(),
    };

    log::trace!("selected leaf {} via {}", node, path);

    Ok(Leaf {
        node,
        board,
        to_move,
        path,
        outcome,
    })
}

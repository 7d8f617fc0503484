//! Root decision: turning root statistics into a move and a training target

use crate::{
    arena::{Node, ROOT},
    config::BestChildCriteria,
    game_state::Player,
    tree::SearchTree,
    utils,
};

/// Value and visit-distribution target for one searched position
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    /// Root win rate from the requested player's perspective, 0 if never visited
    pub value: f64,

    /// Visit share of each action, indexed by action id
    ///
    /// Sums to 1 when any root child was visited, otherwise all zeros.
    pub policy: Vec<f64>,
}

/// Win rate of a root child for the root player
///
/// The child's accumulator credits the opponent, who moves there.
pub fn root_player_value(child: &Node) -> f64 {
    if child.visit_count == 0 {
        return 0.0;
    }
    1.0 - child.value()
}

/// Picks the action to play from the root
///
/// Ties keep the lowest action id. Returns `None` if the root has no children.
pub fn best_action(tree: &SearchTree, criteria: BestChildCriteria) -> Option<usize> {
    let children = tree.children(ROOT);

    let key = |node: &Node| -> (f64, f64) {
        match criteria {
            BestChildCriteria::MostVisits => (node.visit_count as f64, root_player_value(node)),
            BestChildCriteria::HighestValue if node.visit_count == 0 => (f64::NEG_INFINITY, 0.0),
            BestChildCriteria::HighestValue => {
                (root_player_value(node), node.visit_count as f64)
            }
        }
    };

    let mut best: Option<(usize, (f64, f64))> = None;
    for (action, id) in children {
        let candidate = key(tree.node(id));
        let better = match best {
            None => true,
            Some((_, current)) => candidate > current,
        };
        if better {
            best = Some((action, candidate));
        }
    }
    best.map(|(action, _)| action)
}

/// Visit counts of the root children, normalized into a distribution
pub fn visit_distribution(tree: &SearchTree) -> Vec<f64> {
    let mut policy = vec![0.0; tree.num_actions()];
    for (action, id) in tree.children(ROOT) {
        policy[action] = tree.node(id).visit_count as f64;
    }

    let total: f64 = policy.iter().sum();
    if total > 0.0 {
        for share in &mut policy {
            *share /= total;
        }
    }
    policy
}

/// Root win rate from `perspective`, given the player to move at the root
pub fn root_value(tree: &SearchTree, root_player: Player, perspective: Player) -> f64 {
    let root = tree.root();
    if root.visit_count == 0 {
        return 0.0;
    }
    let value = utils::win_rate(root.win_accumulator, root.visit_count);
    if perspective == root_player {
        value
    } else {
        1.0 - value
    }
}

/// Builds the training target for the searched root position
pub fn training_sample(tree: &SearchTree, root_player: Player, perspective: Player) -> TrainingSample {
    TrainingSample {
        value: root_value(tree, root_player, perspective),
        policy: visit_distribution(tree),
    }
}

use std::collections::HashSet;

use connect4_mcts::{
    policy::{backpropagation::backpropagate, expansion::expand},
    Board, MCTSConfig, MCTSError, NodePath, Player, SearchTree, MCTS, ROOT,
};

fn search(iterations: usize, seed: u64) -> MCTS<Board> {
    let config = MCTSConfig::default()
        .with_max_iterations(iterations)
        .with_seed(seed);
    MCTS::new(Board::new(), Player::One, config).unwrap()
}

#[test]
fn test_virtual_loss_is_provisional() {
    let mut tree = SearchTree::new(64, 7);
    expand(&mut tree, ROOT, &Board::new()).unwrap();
    let child = tree.child(ROOT, 2).unwrap();

    let mut path = NodePath::from_nodes(vec![ROOT, child]);
    tree.apply_virtual_loss(&mut path, 0.1).unwrap();

    assert_eq!(path.virtual_loss, Some(0.1));
    for id in [ROOT, child] {
        let node = tree.node(id);
        assert_eq!(node.visit_count, 0, "completed visits must not change");
        assert_eq!(node.virtual_visits, 1);
        assert!((node.virtual_penalty - 0.1).abs() < 1e-12);
        assert_eq!(node.effective_visits(), 1);
    }
}

#[test]
fn test_backpropagation_settles_virtual_loss_exactly() {
    let mut tree = SearchTree::new(64, 7);
    expand(&mut tree, ROOT, &Board::new()).unwrap();
    let child = tree.child(ROOT, 2).unwrap();

    let mut path = NodePath::from_nodes(vec![ROOT, child]);
    tree.apply_virtual_loss(&mut path, 0.1).unwrap();
    backpropagate(&mut tree, path, 0.75).unwrap();

    let root = tree.root();
    assert_eq!(root.visit_count, 1);
    assert_eq!(root.win_accumulator, 0.75);
    assert!(root.is_settled());
    assert_eq!(root.virtual_penalty, 0.0);

    let child = tree.node(child);
    assert_eq!(child.visit_count, 1);
    assert!((child.win_accumulator - 0.25).abs() < 1e-12);
    assert!(child.is_settled());
}

#[test]
fn test_applying_twice_to_one_path_is_ignored() {
    let mut tree = SearchTree::new(8, 7);
    let mut path = NodePath::new();
    tree.apply_virtual_loss(&mut path, 0.1).unwrap();
    tree.apply_virtual_loss(&mut path, 0.1).unwrap();

    assert_eq!(tree.root().virtual_visits, 1);
}

#[test]
fn test_settling_a_charge_that_was_never_applied_is_fatal() {
    let mut tree = SearchTree::new(8, 7);
    let forged = NodePath {
        nodes: vec![ROOT],
        virtual_loss: Some(0.1),
    };

    let result = backpropagate(&mut tree, forged, 0.5);
    assert!(matches!(result, Err(MCTSError::CorruptedTree { node: ROOT })));
    assert_eq!(tree.root().visit_count, 0);
}

#[test]
fn test_batch_selections_spread_across_root_children() {
    let mut mcts = search(64, 9);

    // The first selection expands the root; the next seven must each pick a
    // different child because every in-flight child now carries a visit.
    let first = mcts.select_and_expand().unwrap();
    assert_eq!(first.node, ROOT);

    let leaves: Vec<_> = (0..7).map(|_| mcts.select_and_expand().unwrap()).collect();
    let distinct: HashSet<_> = leaves.iter().map(|leaf| leaf.node).collect();
    assert_eq!(distinct.len(), 7);
    assert_eq!(mcts.in_flight(), 8);

    mcts.backpropagate(first.path, 0.5).unwrap();
    for leaf in leaves {
        mcts.backpropagate(leaf.path, 0.5).unwrap();
    }

    assert_eq!(mcts.in_flight(), 0);
    assert_eq!(mcts.tree().root().visit_count, 8);
    for node in mcts.snapshot().nodes() {
        assert!(node.is_settled());
    }
}

#[test]
fn test_selection_matches_unbatched_statistics_after_settling() {
    let mut mcts = search(32, 10);
    let mut batch = Vec::new();
    for _ in 0..16 {
        batch.push(mcts.select_and_expand().unwrap());
    }
    for leaf in batch {
        mcts.backpropagate(leaf.path, 1.0).unwrap();
    }

    let root = mcts.tree().root();
    assert_eq!(root.visit_count, 16);
    assert_eq!(root.win_accumulator, 16.0);
    assert_eq!(root.virtual_visits, 0);
}

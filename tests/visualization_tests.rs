use connect4_mcts::{Board, MCTSConfig, Player, MCTS};

fn searched(iterations: usize) -> MCTS<Board> {
    let config = MCTSConfig::default()
        .with_max_iterations(iterations)
        .with_seed(21);
    let mut mcts = MCTS::new(Board::new(), Player::One, config).unwrap();
    mcts.run().unwrap();
    mcts
}

#[test]
fn test_tree_visualization() {
    let mcts = searched(20);
    let tree_vis = mcts.visualize_tree();

    assert!(tree_vis.starts_with("Root (visits: 20"));
    assert!(tree_vis.contains("value:"));

    // Root children are indented one level
    assert!(tree_vis.lines().skip(1).any(|line| line.starts_with("  ")));

    // Unvisited children are left out: one line per visited node
    let visited = mcts
        .snapshot()
        .nodes()
        .iter()
        .filter(|node| node.visit_count > 0)
        .count();
    assert_eq!(tree_vis.lines().count(), visited);
}

#[test]
fn test_unsearched_tree_shows_only_root() {
    let config = MCTSConfig::default().with_max_iterations(5);
    let mcts = MCTS::new(Board::new(), Player::One, config).unwrap();

    assert_eq!(mcts.visualize_tree(), "Root (visits: 0, value: 0.000)\n");
}

#[test]
fn test_snapshot_lists_every_node() {
    let mcts = searched(1);
    let snapshot = mcts.snapshot();

    assert_eq!(snapshot.len(), 8);
    assert_eq!(snapshot.root().visit_count, 1);
    assert_eq!(snapshot.root().parent, None);

    let actions: Vec<usize> = snapshot.root_children().map(|(action, _)| action).collect();
    assert_eq!(actions, vec![0, 1, 2, 3, 4, 5, 6]);

    let table = snapshot.to_string();
    assert_eq!(table.lines().count(), 1 + 8, "header plus one row per node");
}

#[test]
fn test_snapshot_is_independent_of_later_search() {
    let config = MCTSConfig::default().with_max_iterations(30).with_seed(22);
    let mut mcts = MCTS::new(Board::new(), Player::One, config).unwrap();
    for _ in 0..5 {
        mcts.step().unwrap();
    }

    let before = mcts.snapshot();
    mcts.run().unwrap();

    assert_eq!(before.root().visit_count, 5);
    assert_eq!(mcts.snapshot().root().visit_count, 30);
}

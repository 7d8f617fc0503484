use connect4_mcts::{
    policy::expansion::expand, Board, GameState, MCTSError, SearchTree, ROOT,
};

#[test]
fn test_expand_empty_board_creates_seven_children() {
    let mut tree = SearchTree::new(64, 7);
    let created = expand(&mut tree, ROOT, &Board::new()).unwrap();

    assert_eq!(created, 7);
    assert_eq!(tree.node_count(), 8);
    assert!(tree.root().expanded);

    let mut actions: Vec<usize> = tree
        .children(ROOT)
        .iter()
        .map(|&(_, id)| tree.node(id).action.unwrap())
        .collect();
    actions.sort_unstable();
    assert_eq!(actions, vec![0, 1, 2, 3, 4, 5, 6]);

    for (_, id) in tree.children(ROOT) {
        let child = tree.node(id);
        assert_eq!(child.visit_count, 0);
        assert_eq!(child.win_accumulator, 0.0);
        assert!(!child.expanded);
    }
}

#[test]
fn test_expand_is_idempotent() {
    let mut tree = SearchTree::new(64, 7);
    let board = Board::new();

    expand(&mut tree, ROOT, &board).unwrap();
    let created = expand(&mut tree, ROOT, &board).unwrap();

    assert_eq!(created, 0);
    assert_eq!(tree.node_count(), 8);
    assert_eq!(tree.edges().len(), 7);
}

#[test]
fn test_expand_terminal_board_is_noop() {
    let won: Board = ".......
                      .......
                      .......
                      .......
                      OOO....
                      XXXX..."
        .parse()
        .unwrap();
    assert!(won.terminal_state().is_some());
    assert!(!won.legal_moves().is_empty());

    let mut tree = SearchTree::new(64, 7);
    let created = expand(&mut tree, ROOT, &won).unwrap();

    assert_eq!(created, 0);
    assert_eq!(tree.node_count(), 1);
    assert!(tree.children(ROOT).is_empty());
    assert!(!tree.root().expanded);
}

#[test]
fn test_expand_skips_full_columns() {
    let board: Board = "X......
                        O......
                        X......
                        O......
                        X......
                        O......"
        .parse()
        .unwrap();

    let mut tree = SearchTree::new(64, 7);
    assert_eq!(expand(&mut tree, ROOT, &board).unwrap(), 6);
    assert_eq!(tree.child(ROOT, 0), None);
}

#[test]
fn test_expand_past_capacity_fails_and_leaves_node_unexpanded() {
    let mut tree = SearchTree::new(4, 7);
    let result = expand(&mut tree, ROOT, &Board::new());

    assert!(matches!(
        result,
        Err(MCTSError::CapacityExceeded { capacity: 4 })
    ));
    assert!(!tree.root().expanded);
    assert_eq!(tree.node_count(), 4);
}

#[test]
fn test_expand_unknown_node_fails_without_allocating() {
    let mut tree = SearchTree::new(64, 7);
    let result = expand(&mut tree, 999, &Board::new());

    assert!(matches!(
        result,
        Err(MCTSError::CorruptedTree { node: 999 })
    ));
    assert_eq!(tree.node_count(), 1);
    assert!(tree.edges().is_empty());
}

#[test]
fn test_driver_expand_rejects_unknown_node() {
    use connect4_mcts::{MCTSConfig, Player, MCTS};

    let config = MCTSConfig::default().with_max_iterations(10);
    let mut mcts = MCTS::new(Board::new(), Player::One, config).unwrap();

    assert!(matches!(
        mcts.expand(999, &Board::new()),
        Err(MCTSError::CorruptedTree { node: 999 })
    ));
    assert_eq!(mcts.node_count(), 1);
    assert!(mcts
        .snapshot()
        .nodes()
        .iter()
        .all(|node| node.parent.map_or(true, |parent| parent < mcts.node_count())));
}

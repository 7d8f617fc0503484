use connect4_mcts::{EdgeIndex, MCTSError, NodeArena, SearchTree, ROOT};

#[test]
fn test_new_arena_holds_only_the_root() {
    let arena = NodeArena::new(8);
    let root = arena.get(ROOT);

    assert_eq!(arena.len(), 1);
    assert_eq!(root.parent, None);
    assert_eq!(root.action, None);
    assert_eq!(root.visit_count, 0);
    assert_eq!(root.win_accumulator, 0.0);
    assert!(!root.expanded);
}

#[test]
fn test_allocate_returns_sequential_ids() {
    let mut arena = NodeArena::new(4);

    assert_eq!(arena.allocate(ROOT, 3).unwrap(), 1);
    assert_eq!(arena.allocate(ROOT, 5).unwrap(), 2);
    assert_eq!(arena.allocate(1, 0).unwrap(), 3);

    let node = arena.get(3);
    assert_eq!(node.parent, Some(1));
    assert_eq!(node.action, Some(0));
    assert_eq!(node.visit_count, 0);
    assert!(!node.expanded);
}

#[test]
fn test_allocate_past_capacity_fails() {
    let mut arena = NodeArena::new(2);
    arena.allocate(ROOT, 0).unwrap();

    let result = arena.allocate(ROOT, 1);
    assert!(matches!(
        result,
        Err(MCTSError::CapacityExceeded { capacity: 2 })
    ));
    assert_eq!(arena.len(), 2, "a failed allocation must not add a node");
}

#[test]
fn test_edge_index_rejects_duplicates() {
    let mut edges = EdgeIndex::default();

    assert!(edges.insert(0, 3, 1));
    assert!(!edges.insert(0, 3, 2));
    assert_eq!(edges.lookup(0, 3), Some(1));
    assert_eq!(edges.lookup(0, 4), None);
    assert_eq!(edges.len(), 1);
}

#[test]
fn test_tree_children_are_ordered_by_action() {
    let mut tree = SearchTree::new(16, 7);
    let board = connect4_mcts::Board::new();
    connect4_mcts::policy::expansion::expand(&mut tree, ROOT, &board).unwrap();

    let children = tree.children(ROOT);
    let actions: Vec<usize> = children.iter().map(|&(action, _)| action).collect();
    assert_eq!(actions, (0..7).collect::<Vec<_>>());

    for (action, id) in children {
        assert_eq!(tree.child(ROOT, action), Some(id));
        assert_eq!(tree.node(id).parent, Some(ROOT));
    }
}

#[test]
fn test_allocate_under_unknown_parent_fails() {
    let mut arena = NodeArena::new(8);

    assert!(matches!(
        arena.allocate(5, 0),
        Err(MCTSError::CorruptedTree { node: 5 })
    ));
    assert_eq!(arena.len(), 1);
}

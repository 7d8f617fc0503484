use connect4_mcts::{config::BestChildCriteria, Board, MCTSConfig, MCTSError, Player, MCTS};

#[test]
fn test_config_builder_methods() {
    // Test that all builder methods correctly set their respective values
    let config = MCTSConfig::default()
        .with_exploration_constant(2.0)
        .with_max_iterations(5000)
        .with_virtual_loss(0.5)
        .with_batch_size(32)
        .with_seed(99)
        .with_best_child_criteria(BestChildCriteria::HighestValue);

    assert_eq!(config.exploration_constant, 2.0);
    assert_eq!(config.max_iterations, 5000);
    assert_eq!(config.virtual_loss, 0.5);
    assert_eq!(config.batch_size, 32);
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.best_child_criteria, BestChildCriteria::HighestValue);
    assert!(config.is_batched());
}

#[test]
fn test_config_default_values() {
    let config = MCTSConfig::default();

    // Default exploration constant should be sqrt(2)
    assert!((config.exploration_constant - 1.414).abs() < 0.001);
    assert_eq!(config.max_iterations, 1_000);
    assert_eq!(config.virtual_loss, 0.1);
    assert_eq!(config.batch_size, 1);
    assert_eq!(config.seed, None);
    assert_eq!(config.best_child_criteria, BestChildCriteria::MostVisits);
    assert!(!config.is_batched());
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let bad = [
        MCTSConfig::default().with_exploration_constant(-1.0),
        MCTSConfig::default().with_exploration_constant(f64::NAN),
        MCTSConfig::default().with_virtual_loss(-0.1),
        MCTSConfig::default().with_virtual_loss(f64::INFINITY),
        MCTSConfig::default().with_batch_size(0),
    ];

    for config in bad {
        assert!(
            matches!(config.validate(), Err(MCTSError::InvalidConfiguration(_))),
            "{config:?} should be rejected"
        );
        assert!(MCTS::new(Board::new(), Player::One, config).is_err());
    }
}

#[test]
fn test_zero_exploration_and_zero_virtual_loss_are_allowed() {
    let config = MCTSConfig::default()
        .with_exploration_constant(0.0)
        .with_virtual_loss(0.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_arena_is_sized_from_iteration_budget() {
    let config = MCTSConfig::default().with_max_iterations(100);
    let mcts = MCTS::new(Board::new(), Player::One, config).unwrap();

    assert_eq!(mcts.tree().capacity(), 1 + 100 * 7);
    assert_eq!(mcts.node_count(), 1);
}

#[test]
fn test_iteration_budget_overflow_is_rejected() {
    let config = MCTSConfig::default().with_max_iterations(usize::MAX);
    assert!(matches!(
        MCTS::new(Board::new(), Player::One, config),
        Err(MCTSError::InvalidConfiguration(_))
    ));
}

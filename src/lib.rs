//! # connect4-mcts
//!
//! Monte Carlo Tree Search for Connect Four, built on a flat node arena with
//! batched leaf evaluation.
//!
//! Nodes live in a fixed-capacity arena addressed by integer id, and children
//! are found through an edge index keyed by `(parent, action)`. Because the
//! tree never stores positions or pointers, it can be walked, expanded and
//! updated without any shared ownership.
//!
//! ## Features
//!
//! - UCT selection with random tie-breaking
//! - Full expansion of every legal child at a leaf
//! - Virtual loss, so many leaves can be selected before any is evaluated
//! - Pluggable evaluators: random rollouts or any batch scoring function
//! - Root decision by visit count or win rate, plus training targets
//!
//! ## Basic Usage
//!
//! ```
//! use connect4_mcts::{Board, MCTS, MCTSConfig, Player};
//!
//! fn main() -> Result<(), connect4_mcts::MCTSError> {
//!     let config = MCTSConfig::default()
//!         .with_max_iterations(200)
//!         .with_seed(7);
//!
//!     let mut mcts = MCTS::new(Board::new(), Player::One, config)?;
//!     let column = mcts.search()?;
//!
//!     assert!(column < 7);
//!     println!("{}", mcts.get_statistics().summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Batched evaluation
//!
//! Selection and expansion are cheap; evaluation may not be. The batched
//! primitives let a caller gather many leaves and score them together:
//!
//! ```
//! use connect4_mcts::{Board, MCTS, MCTSConfig, Player};
//!
//! fn main() -> Result<(), connect4_mcts::MCTSError> {
//!     let config = MCTSConfig::default().with_max_iterations(64).with_seed(3);
//!     let mut mcts = MCTS::new(Board::new(), Player::One, config)?;
//!
//!     for _ in 0..8 {
//!         let batch: Vec<_> = (0..8)
//!             .map(|_| mcts.select_and_expand())
//!             .collect::<Result<_, _>>()?;
//!
//!         // Any scorer works here; every position is a coin flip.
//!         for leaf in batch {
//!             mcts.backpropagate(leaf.path, 0.5)?;
//!         }
//!     }
//!
//!     assert_eq!(mcts.tree().root().visit_count, 64);
//!     assert_eq!(mcts.in_flight(), 0);
//!     Ok(())
//! }
//! ```
//!
//! ## Value convention
//!
//! Every value handed to backpropagation is the probability that the root
//! player wins. A node's `win_accumulator` holds the credit of the player to
//! move at that node, so the root accumulates the root player's wins and its
//! children accumulate the opponent's.

pub mod arena;
pub mod board;
pub mod config;
pub mod edges;
pub mod evaluator;
pub mod game_state;
pub mod mcts;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;

pub use arena::{Node, NodeArena, NodeId, ROOT};
pub use board::Board;
pub use config::{BestChildCriteria, MCTSConfig};
pub use edges::EdgeIndex;
pub use evaluator::{Evaluator, Position, RolloutEvaluator, ValueFnEvaluator};
pub use game_state::{GameState, Outcome, Placement, Player};
pub use mcts::MCTS;
pub use policy::{Leaf, SelectionPolicy, TrainingSample, UctPolicy};
pub use stats::SearchStatistics;
pub use tree::{NodePath, SearchTree, TreeSnapshot};

/// Error types for the MCTS algorithm
#[derive(thiserror::Error, Debug)]
pub enum MCTSError {
    /// A node was requested beyond the arena's fixed capacity
    #[error("Node arena is full ({capacity} nodes)")]
    CapacityExceeded {
        /// Capacity the arena was built with
        capacity: usize,
    },

    /// The tree's nodes and edges disagree
    #[error("Corrupted tree at node {node}")]
    CorruptedTree {
        /// Node where the inconsistency was found
        node: NodeId,
    },

    /// A path handed to backpropagation does not describe a root-to-leaf walk
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A board that cannot occur in play
    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    /// A move the rules do not allow
    #[error("Illegal move in column {column}")]
    IllegalMove {
        /// Column that was played
        column: usize,
    },

    /// A value outside `[0, 1]`
    #[error("Value {0} is not a probability")]
    InvalidValue(f64),

    /// An evaluator returned the wrong number of values
    #[error("Evaluator returned {actual} values for {expected} positions")]
    EvaluatorMismatch {
        /// Positions submitted
        expected: usize,
        /// Values returned
        actual: usize,
    },

    /// No legal actions are available from the root position
    #[error("No legal actions available from current state")]
    NoLegalActions,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MCTSError>;

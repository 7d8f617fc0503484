//! Configuration options for the MCTS algorithm
//!
//! This module defines the configuration parameters that control the
//! behavior of the search: its iteration budget, UCT exploration, virtual loss
//! and batching, and how the final move is chosen.

use crate::{MCTSError, Result};

/// Criteria for selecting the best child after search is complete
///
/// This determines how the final action is selected after the iteration budget
/// is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestChildCriteria {
    /// Select the child with the most visits
    ///
    /// Visit counts under UCT track confidence and are less noisy than value
    /// estimates at low sample counts. This is the default.
    MostVisits,

    /// Select the child with the highest win rate for the root player
    ///
    /// More aggressive: a rarely visited child with a lucky streak can win.
    HighestValue,
}

/// Configuration for the MCTS algorithm
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use connect4_mcts::{MCTSConfig, config::BestChildCriteria};
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_max_iterations(2_000)
///     .with_batch_size(32)
///     .with_best_child_criteria(BestChildCriteria::MostVisits);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MCTSConfig {
    /// Exploration constant for UCT
    ///
    /// Higher values favor exploration of less-visited nodes.
    /// The standard value is sqrt(2).
    pub exploration_constant: f64,

    /// Number of iterations to run per move decision
    ///
    /// Also sizes the node arena, so it cannot be raised once a tree exists.
    pub max_iterations: usize,

    /// Penalty applied to every node on a path whose evaluation is deferred
    pub virtual_loss: f64,

    /// Leaves gathered before the evaluator is called
    ///
    /// 1 runs the unbatched driver; larger values select and expand that many
    /// leaves under virtual loss, evaluate them together and then backpropagate.
    pub batch_size: usize,

    /// Criteria for selecting the best child after search
    pub best_child_criteria: BestChildCriteria,

    /// Seed for tie-breaking and the default rollout evaluator
    ///
    /// `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: std::f64::consts::SQRT_2,
            max_iterations: 1_000,
            virtual_loss: 0.1,
            batch_size: 1,
            best_child_criteria: BestChildCriteria::MostVisits,
            seed: None,
        }
    }
}

impl MCTSConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the number of iterations
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the virtual loss penalty
    pub fn with_virtual_loss(mut self, penalty: f64) -> Self {
        self.virtual_loss = penalty;
        self
    }

    /// Sets how many leaves are evaluated together
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the criteria for selecting the best child
    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Fixes the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns true when leaves are evaluated in batches
    pub fn is_batched(&self) -> bool {
        self.batch_size > 1
    }

    /// Checks that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MCTSError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if !self.virtual_loss.is_finite() || self.virtual_loss < 0.0 {
            return Err(MCTSError::InvalidConfiguration(format!(
                "virtual loss must be finite and non-negative, got {}",
                self.virtual_loss
            )));
        }
        if self.batch_size == 0 {
            return Err(MCTSError::InvalidConfiguration(
                "batch size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

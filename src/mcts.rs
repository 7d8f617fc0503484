//! Main implementation of the Monte Carlo Tree Search driver
//!
//! This module orchestrates selection, expansion, evaluation and
//! backpropagation over one search tree. Two modes share the same primitives:
//!
//! - unbatched: [`MCTS::step`] runs one full iteration and evaluates its leaf
//!   on its own;
//! - batched: [`MCTS::select_and_expand`] charges virtual loss to each selected
//!   path so later selections spread out, the caller scores many leaves at
//!   once, then [`MCTS::backpropagate`] settles each path.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{
    arena::NodeId,
    config::MCTSConfig,
    evaluator::{Evaluator, Position, RolloutEvaluator},
    game_state::{GameState, Player},
    policy::{
        backpropagation, decision, expansion,
        selection::{self, Leaf, SelectionPolicy, UctPolicy},
        TrainingSample,
    },
    stats::SearchStatistics,
    tree::{NodePath, SearchTree, TreeSnapshot},
    MCTSError, Result,
};

/// The main Monte Carlo Tree Search implementation
///
/// One instance searches one root position. The tree is sized from the
/// iteration budget when the instance is built and discarded with it.
pub struct MCTS<S: GameState> {
    /// Position the search starts from
    root_state: S,

    /// Player to move at the root; evaluator values are this player's win odds
    root_player: Player,

    /// Node arena and edge index
    tree: SearchTree,

    /// Configuration for the search
    config: MCTSConfig,

    /// Statistics gathered during search
    statistics: SearchStatistics,

    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy>,

    /// Scores leaves that are not finished games
    evaluator: Box<dyn Evaluator<S>>,

    /// Random source for tie-breaking
    rng: StdRng,

    /// Leaves handed out by `select_and_expand` and not yet backpropagated
    in_flight: usize,
}

impl<S: GameState + 'static> MCTS<S> {
    /// Creates a new search for `root_state` with `root_player` to move
    ///
    /// The arena holds the root plus `ACTIONS` nodes per iteration, since each
    /// iteration expands at most one node.
    pub fn new(root_state: S, root_player: Player, config: MCTSConfig) -> Result<Self> {
        config.validate()?;

        let capacity = config
            .max_iterations
            .checked_mul(S::ACTIONS)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                MCTSError::InvalidConfiguration(format!(
                    "{} iterations overflow the node arena",
                    config.max_iterations
                ))
            })?;

        let (rng, evaluator) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                RolloutEvaluator::with_seed(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), RolloutEvaluator::new()),
        };

        Ok(MCTS {
            root_state,
            root_player,
            tree: SearchTree::new(capacity, S::ACTIONS),
            selection_policy: Box::new(UctPolicy::new(config.exploration_constant)),
            evaluator: Box::new(evaluator),
            config,
            statistics: SearchStatistics::new(),
            rng,
            in_flight: 0,
        })
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the evaluator used for non-terminal leaves
    pub fn with_evaluator<E: Evaluator<S> + 'static>(mut self, evaluator: E) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Position the search starts from
    pub fn root_state(&self) -> &S {
        &self.root_state
    }

    /// Player to move at the root
    pub fn root_player(&self) -> Player {
        self.root_player
    }

    /// The search tree
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// The configuration this search was built with
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    /// Leaves selected under virtual loss and not yet backpropagated
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Returns the search statistics
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Walks from the root to a leaf without changing the tree
    pub fn select(&mut self) -> Result<Leaf<S>> {
        let leaf = selection::select_leaf(
            &self.tree,
            &*self.selection_policy,
            &self.root_state,
            self.root_player,
            &mut self.rng,
        )?;
        self.statistics.max_depth = self.statistics.max_depth.max(leaf.path.depth());
        Ok(leaf)
    }

    /// Creates every legal child of `node`, whose position is `board`
    ///
    /// Returns the number of nodes created; 0 for terminal positions and
    /// already expanded nodes.
    pub fn expand(&mut self, node: NodeId, board: &S) -> Result<usize> {
        let created = expansion::expand(&mut self.tree, node, board)?;
        self.statistics.tree_size = self.tree.node_count();
        Ok(created)
    }

    /// Runs one full unbatched iteration
    ///
    /// Select a leaf, expand it, score it (exactly if the game is over there,
    /// otherwise with the evaluator) and backpropagate the score.
    pub fn step(&mut self) -> Result<()> {
        let leaf = self.select()?;
        self.expand(leaf.node, &leaf.board)?;
        let values = self.evaluate(std::slice::from_ref(&leaf))?;
        self.backpropagate(leaf.path, values[0])
    }

    /// Selects and expands one leaf whose evaluation will be deferred
    ///
    /// Virtual loss is charged to every node on the returned path until it is
    /// passed to [`MCTS::backpropagate`].
    pub fn select_and_expand(&mut self) -> Result<Leaf<S>> {
        let mut leaf = self.select()?;
        self.expand(leaf.node, &leaf.board)?;
        self.tree
            .apply_virtual_loss(&mut leaf.path, self.config.virtual_loss)?;
        self.in_flight += 1;
        Ok(leaf)
    }

    /// Credits `value`, the root player's win probability, along `path`
    ///
    /// Any virtual loss carried by the path is settled in the same pass.
    pub fn backpropagate(&mut self, path: NodePath, value: f64) -> Result<()> {
        let settles = path.virtual_loss.is_some();
        backpropagation::backpropagate(&mut self.tree, path, value)?;
        if settles {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        self.statistics.iterations += 1;
        Ok(())
    }

    /// Scores leaves for the root player
    ///
    /// Finished games get their exact result. All other leaves go to the
    /// evaluator in a single call.
    pub fn evaluate(&mut self, leaves: &[Leaf<S>]) -> Result<Vec<f64>> {
        let mut values = vec![0.0; leaves.len()];
        let mut pending = Vec::new();
        let mut batch = Vec::new();

        for (i, leaf) in leaves.iter().enumerate() {
            match leaf.outcome {
                Some(outcome) => {
                    values[i] = outcome.value_for(self.root_player);
                    self.statistics.terminal_leaves += 1;
                }
                None => {
                    pending.push(i);
                    batch.push(Position::new(leaf.board.clone(), leaf.to_move));
                }
            }
        }

        if batch.is_empty() {
            return Ok(values);
        }

        let scores = self.evaluator.score(&batch, self.root_player)?;
        if scores.len() != batch.len() {
            return Err(MCTSError::EvaluatorMismatch {
                expected: batch.len(),
                actual: scores.len(),
            });
        }

        for (i, score) in pending.into_iter().zip(scores) {
            if score.is_nan() {
                return Err(MCTSError::InvalidValue(score));
            }
            if !(0.0..=1.0).contains(&score) {
                log::warn!(
                    "{} returned {} outside [0, 1], clamping",
                    self.evaluator.name(),
                    score
                );
            }
            values[i] = score.clamp(0.0, 1.0);
        }

        self.statistics.batches += 1;
        self.statistics.evaluated_positions += batch.len();
        Ok(values)
    }

    /// Evaluates a batch of deferred leaves and backpropagates each of them
    ///
    /// An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// If evaluation or backpropagation fails, the leaves not yet settled keep
    /// their virtual loss and stay counted in [`MCTS::in_flight`]. The tree is
    /// then inconsistent and the search must be discarded.
    pub fn flush(&mut self, batch: Vec<Leaf<S>>) -> Result<()> {
        if batch.is_empty() {
            log::warn!("flush called with an empty batch");
            return Ok(());
        }

        let values = self.evaluate(&batch)?;
        log::debug!("flushing batch of {} leaves", batch.len());
        for (leaf, value) in batch.into_iter().zip(values) {
            self.backpropagate(leaf.path, value)?;
        }
        Ok(())
    }

    /// Runs the rest of the iteration budget
    ///
    /// Uses the batched driver when the configured batch size exceeds 1. The
    /// final partial batch is always flushed.
    pub fn run(&mut self) -> Result<()> {
        let start_time = Instant::now();
        let remaining = self
            .config
            .max_iterations
            .saturating_sub(self.statistics.iterations + self.in_flight);

        log::debug!(
            "running {} iterations ({}) from root player {}",
            remaining,
            if self.config.is_batched() {
                "batched"
            } else {
                "unbatched"
            },
            self.root_player
        );

        if self.config.is_batched() {
            let mut batch = Vec::with_capacity(self.config.batch_size);
            for _ in 0..remaining {
                batch.push(self.select_and_expand()?);
                if batch.len() >= self.config.batch_size {
                    self.flush(std::mem::take(&mut batch))?;
                }
            }
            if !batch.is_empty() {
                self.flush(batch)?;
            }
        } else {
            for _ in 0..remaining {
                self.step()?;
            }
        }

        self.statistics.total_time += start_time.elapsed();
        self.statistics.tree_size = self.tree.node_count();
        log::debug!("{}", self.statistics.summary());
        Ok(())
    }

    /// Runs the search algorithm and returns the best action
    pub fn search(&mut self) -> Result<usize> {
        self.run()?;
        self.best_move()
    }

    /// Selects the best action based on configured criteria
    ///
    /// Before any iteration has expanded the root, this falls back to the
    /// first legal move.
    ///
    /// # Errors
    ///
    /// [`MCTSError::NoLegalActions`] if the game is already over at the root.
    pub fn best_move(&self) -> Result<usize> {
        if self.root_state.terminal_state().is_some() {
            return Err(MCTSError::NoLegalActions);
        }
        if let Some(action) = decision::best_action(&self.tree, self.config.best_child_criteria)
        {
            return Ok(action);
        }
        self.root_state
            .legal_moves()
            .first()
            .map(|placement| placement.column)
            .ok_or(MCTSError::NoLegalActions)
    }

    /// Visit share of every root action
    pub fn visit_distribution(&self) -> Vec<f64> {
        decision::visit_distribution(&self.tree)
    }

    /// Root value and visit distribution, with the value seen by `perspective`
    pub fn training_sample(&self, perspective: Player) -> TrainingSample {
        decision::training_sample(&self.tree, self.root_player, perspective)
    }

    /// Copies the full node table
    pub fn snapshot(&self) -> TreeSnapshot {
        self.tree.snapshot()
    }

    /// Returns a visualization of the search tree
    ///
    /// Only visited nodes are shown. Values are win rates for the player who
    /// chose the move.
    pub fn visualize_tree(&self) -> String {
        let mut result = String::new();
        self.visualize_node(crate::arena::ROOT, 0, &mut result);
        result
    }

    /// Helper method to visualize a node and its children
    fn visualize_node(&self, id: NodeId, depth: usize, output: &mut String) {
        let node = self.tree.node(id);
        let indent = "  ".repeat(depth);
        let (label, value) = match node.action {
            Some(action) => (format!("{}", action), decision::root_player_value(node)),
            None => ("Root".to_string(), node.value()),
        };

        output.push_str(&format!(
            "{}{} (visits: {}, value: {:.3})\n",
            indent, label, node.visit_count, value
        ));

        for (_, child) in self.tree.children(id) {
            if self.tree.node(child).visit_count > 0 {
                self.visualize_node(child, depth + 1, output);
            }
        }
    }
}

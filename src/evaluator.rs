//! Position evaluators
//!
//! An evaluator turns a batch of leaf positions into win probabilities for a
//! given player. The search calls it once per batch, so a costly scorer (a
//! learned value function, say) can process many boards together.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::game_state::{GameState, Outcome, Player};
use crate::Result;

/// A board together with the player to move on it
#[derive(Debug, Clone, PartialEq)]
pub struct Position<S> {
    /// The board
    pub board: S,
    /// Player to move
    pub to_move: Player,
}

impl<S> Position<S> {
    /// Creates a new position
    pub fn new(board: S, to_move: Player) -> Self {
        Position { board, to_move }
    }
}

/// Trait for batch position scorers
pub trait Evaluator<S: GameState>: Send {
    /// Scores every position in `batch`
    ///
    /// Returns one value per position, in the same order, each the probability
    /// in `[0, 1]` that `perspective` wins from there.
    fn score(&mut self, batch: &[Position<S>], perspective: Player) -> Result<Vec<f64>>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "evaluator"
    }
}

/// Random rollout evaluator
///
/// Plays uniformly random legal moves until the game ends and reports the
/// actual result.
#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    rng: StdRng,
}

impl RolloutEvaluator {
    /// Creates a rollout evaluator seeded from system entropy
    pub fn new() -> Self {
        RolloutEvaluator {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a rollout evaluator with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        RolloutEvaluator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Plays one random game from `position` to the end
    pub fn rollout<S: GameState>(&mut self, position: &Position<S>) -> Result<Outcome> {
        if let Some(outcome) = position.board.terminal_state() {
            return Ok(outcome);
        }

        let mut board = position.board.clone();
        let mut player = position.to_move;
        loop {
            let moves = board.legal_moves();
            let Some(&placement) = moves.choose(&mut self.rng) else {
                return Ok(Outcome::Draw);
            };
            board = board.apply_move(player, placement)?;
            if let Some(outcome) = board.terminal_state_after(placement, player) {
                return Ok(outcome);
            }
            player = player.opponent();
        }
    }
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> Evaluator<S> for RolloutEvaluator {
    fn score(&mut self, batch: &[Position<S>], perspective: Player) -> Result<Vec<f64>> {
        batch
            .iter()
            .map(|position| Ok(self.rollout(position)?.value_for(perspective)))
            .collect()
    }

    fn name(&self) -> &str {
        "rollout"
    }
}

/// Evaluator backed by a batch scoring function
///
/// Wraps anything that maps a batch of positions to win probabilities, such as
/// a learned value network.
pub struct ValueFnEvaluator<F> {
    score_fn: F,
}

impl<F> ValueFnEvaluator<F> {
    /// Creates a new evaluator around the given function
    pub fn new(score_fn: F) -> Self {
        ValueFnEvaluator { score_fn }
    }
}

impl<F> std::fmt::Debug for ValueFnEvaluator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueFnEvaluator").finish_non_exhaustive()
    }
}

impl<S, F> Evaluator<S> for ValueFnEvaluator<F>
where
    S: GameState,
    F: FnMut(&[Position<S>], Player) -> Vec<f64> + Send,
{
    fn score(&mut self, batch: &[Position<S>], perspective: Player) -> Result<Vec<f64>> {
        Ok((self.score_fn)(batch, perspective))
    }

    fn name(&self) -> &str {
        "value-fn"
    }
}

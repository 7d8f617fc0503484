//! Traits defining the rules engine the search depends on.
//!
//! The search tree never inspects a board directly. Everything it needs to know
//! about the game (legal moves, move application, terminal detection) goes
//! through the [`GameState`] trait, which [`Board`](crate::board::Board)
//! implements for Connect Four.

use std::fmt::{self, Debug};

use crate::Result;

/// One of the two players in a zero-sum, alternating-move game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// The player who moves first from an empty board (`+1` on the board)
    One,
    /// The player who moves second (`-1` on the board)
    Two,
}

impl Player {
    /// Returns the other player
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Returns the cell value used to mark this player's pieces
    pub fn sign(self) -> i8 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }

    /// Maps a non-zero cell value back to the player owning it
    pub fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            1 => Some(Player::One),
            -1 => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "X"),
            Player::Two => write!(f, "O"),
        }
    }
}

/// Where a piece lands when a column is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Landing row (0 is the top row)
    pub row: usize,
    /// Column played; this is the action id stored in the search tree
    pub column: usize,
}

impl Placement {
    /// Creates a new placement
    pub fn new(row: usize, column: usize) -> Self {
        Placement { row, column }
    }
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The given player completed a line
    Win(Player),
    /// The board filled up with no winner
    Draw,
}

impl Outcome {
    /// Returns the result from the perspective of the given player
    ///
    /// 1.0 is a win, 0.0 a loss and 0.5 a draw.
    pub fn value_for(self, player: Player) -> f64 {
        match self {
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => 0.0,
            Outcome::Draw => 0.5,
        }
    }
}

/// Trait defining the rules engine interface required for MCTS
///
/// Implementations are value types: `apply_move` returns a new state and never
/// mutates `self`, so the search can keep a parent position while it explores
/// a child.
pub trait GameState: Clone + Debug + Send + Sync {
    /// Maximum number of distinct actions at any position
    ///
    /// Action ids are in `0..ACTIONS`. This also bounds how many children a
    /// single expansion can create, which sizes the node arena.
    const ACTIONS: usize;

    /// Returns every legal placement, ordered by column
    ///
    /// An empty list means no move can be made (terminal by exhaustion).
    fn legal_moves(&self) -> Vec<Placement>;

    /// Returns the state after `player` occupies `placement`
    fn apply_move(&self, player: Player, placement: Placement) -> Result<Self>;

    /// Scans the whole position for a finished game
    fn terminal_state(&self) -> Option<Outcome>;

    /// Checks only what the last placement can have changed
    ///
    /// Only valid when the position before `placement` was not terminal.
    fn terminal_state_after(&self, placement: Placement, player: Player) -> Option<Outcome>;

    /// Returns the landing row for `column`, if that column is playable
    fn placement_for(&self, column: usize) -> Option<Placement> {
        self.legal_moves()
            .into_iter()
            .find(|placement| placement.column == column)
    }
}

//! Utility functions for the MCTS algorithm
//!
//! This module contains the UCT arithmetic shared by the selection policy and
//! the root decision.

/// Score given to a child that has never been visited
///
/// Larger than any finite UCT value, so unvisited children always win.
pub const UNVISITED_SCORE: f64 = f64::INFINITY;

/// Two scores closer than this are treated as tied
pub const TIE_EPSILON: f64 = 1e-9;

/// Calculates the exploitation term for UCT
///
/// This is simply the average credit per visit.
pub fn exploitation_term(wins: f64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    wins / visits as f64
}

/// Calculates the exploration term for UCT
///
/// This is the term that encourages exploration of less-visited nodes.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return UNVISITED_SCORE;
    }

    // ln(0) is undefined; a parent with no visits contributes no exploration
    let parent_visits = parent_visits.max(1) as f64;
    exploration_constant * (parent_visits.ln() / child_visits as f64).sqrt()
}

/// Calculates the UCT value for a child
///
/// `wins` must already be expressed from the perspective of the player
/// choosing between the children.
pub fn uct_value(wins: f64, visits: u64, parent_visits: u64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return UNVISITED_SCORE;
    }

    exploitation_term(wins, visits) + exploration_term(parent_visits, visits, exploration_constant)
}

/// Safely calculates the win rate from accumulated credit and visits
///
/// Returns 0.0 if no visits have occurred.
pub fn win_rate(wins: f64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    wins / visits as f64
}

/// Returns true if `score` ties with `best` within [`TIE_EPSILON`]
pub fn is_tied(score: f64, best: f64) -> bool {
    if best == UNVISITED_SCORE {
        return score == UNVISITED_SCORE;
    }
    (best - score).abs() <= TIE_EPSILON
}

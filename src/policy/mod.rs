//! Policies for the different phases of the MCTS algorithm
//!
//! - Selection: walk from the root to a leaf using UCT with virtual loss
//! - Expansion: create every legal child of a leaf
//! - Backpropagation: credit a result along a path and settle virtual loss
//! - Decision: turn root statistics into a move and a training target

pub mod backpropagation;
pub mod decision;
pub mod expansion;
pub mod selection;

pub use decision::TrainingSample;
pub use selection::{Leaf, SelectionPolicy, UctPolicy};

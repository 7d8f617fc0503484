//! Self-play data generation
//!
//! Plays a few games of the search against itself using batched evaluation and
//! prints one training sample per move: the root value for the player to move
//! and the visit distribution over columns.
//!
//! The evaluator here is a cheap stand-in for a value network: it scores a
//! position by how central the mover's pieces are.

use connect4_mcts::{
    board::{COLS, ROWS},
    Board, GameState, MCTSConfig, Player, Position, TrainingSample, ValueFnEvaluator, MCTS,
};
use log::info;

const GAMES: usize = 2;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MCTSConfig::default()
        .with_max_iterations(4_000)
        .with_batch_size(32)
        .with_virtual_loss(0.1);

    for game_index in 0..GAMES {
        let config = config.clone().with_seed(game_index as u64);
        match play_game(config) {
            Ok(samples) => {
                info!("game {} produced {} samples", game_index, samples.len());
                for (ply, (player, sample)) in samples.iter().enumerate() {
                    let policy: Vec<String> =
                        sample.policy.iter().map(|p| format!("{:.2}", p)).collect();
                    println!(
                        "game {} ply {:>2} {}: value {:.3} policy [{}]",
                        game_index,
                        ply,
                        player,
                        sample.value,
                        policy.join(" ")
                    );
                }
            }
            Err(e) => {
                eprintln!("game {} failed: {}", game_index, e);
                return;
            }
        }
    }
}

/// Plays one game and returns the sample recorded before each move
fn play_game(config: MCTSConfig) -> connect4_mcts::Result<Vec<(Player, TrainingSample)>> {
    let mut board = Board::new();
    let mut to_move = Player::One;
    let mut samples = Vec::new();

    while board.terminal_state().is_none() {
        let mut mcts =
            MCTS::new(board, to_move, config.clone())?.with_evaluator(centrality_evaluator());
        let column = mcts.search()?;
        samples.push((to_move, mcts.training_sample(to_move)));

        let placement = board
            .placement_for(column)
            .ok_or(connect4_mcts::MCTSError::IllegalMove { column })?;
        board = board.apply_move(to_move, placement)?;
        to_move = to_move.opponent();
    }

    println!("{}", board);
    info!("final position: {:?}", board.terminal_state());
    Ok(samples)
}

/// Scores a batch by piece centrality, squashed into a win probability
fn centrality_evaluator(
) -> ValueFnEvaluator<impl FnMut(&[Position<Board>], Player) -> Vec<f64> + Send> {
    ValueFnEvaluator::new(|batch: &[Position<Board>], perspective: Player| {
        batch
            .iter()
            .map(|position| {
                let mut score = 0.0;
                for row in 0..ROWS {
                    for column in 0..COLS {
                        if let Some(owner) = position.board.get(row, column) {
                            let weight = 3.0 - (column as f64 - 3.0).abs();
                            score += if owner == perspective { weight } else { -weight };
                        }
                    }
                }
                1.0 / (1.0 + (-score / 8.0).exp())
            })
            .collect()
    })
}

//! Connect Four example for the MCTS algorithm
//!
//! Play against the search from a terminal. You are X and move first.
//! Run with `RUST_LOG=debug` to see per-search statistics.

use std::io::{self, BufRead, Write};

use connect4_mcts::{board::COLS, Board, GameState, MCTSConfig, Outcome, Player, MCTS};

const HUMAN: Player = Player::One;

fn main() {
    // Initialize logging
    env_logger::init();

    println!("MCTS Connect Four Example");
    println!("=========================");
    println!();

    // Set up a new game
    let mut game = Board::new();
    let mut to_move = Player::One;

    // Create MCTS configuration
    let config = MCTSConfig::default()
        .with_exploration_constant(1.414)
        .with_max_iterations(20_000)
        .with_batch_size(16);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    // Main game loop
    let outcome = loop {
        if let Some(outcome) = game.terminal_state() {
            break outcome;
        }

        // Display the board
        print_board(&game);

        let column = if to_move == HUMAN {
            print!("Your move (enter column 0-{}): ", COLS - 1);
            let _ = io::stdout().flush();

            let Some(Ok(input)) = lines.next() else {
                println!("No more input, quitting.");
                return;
            };

            match input.trim().parse::<usize>() {
                Ok(column) if column < COLS => column,
                _ => {
                    println!("Invalid column! Please enter a number between 0 and {}.", COLS - 1);
                    continue;
                }
            }
        } else {
            println!("AI is thinking...");

            let mut mcts = match MCTS::new(game, to_move, config.clone()) {
                Ok(mcts) => mcts,
                Err(e) => {
                    println!("Error: {}", e);
                    return;
                }
            };

            // Find the best move
            match mcts.search() {
                Ok(column) => {
                    println!("AI chooses column: {}", column);
                    println!("{}", mcts.get_statistics().summary());
                    column
                }
                Err(e) => {
                    println!("Error: {}", e);
                    return;
                }
            }
        };

        let Some(placement) = game.placement_for(column) else {
            println!("Column {} is full! Choose another column.", column);
            continue;
        };

        game = match game.apply_move(to_move, placement) {
            Ok(next) => next,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };
        to_move = to_move.opponent();
    };

    // Display final state
    print_board(&game);

    // Report the result
    match outcome {
        Outcome::Win(player) if player == HUMAN => println!("You win!"),
        Outcome::Win(_) => println!("AI wins!"),
        Outcome::Draw => println!("The game is a draw!"),
    }
}

/// Prints the board framed, with column numbers on top
fn print_board(board: &Board) {
    print!(" ");
    for column in 0..COLS {
        print!(" {}", column);
    }
    println!();

    for row in board.to_string().lines() {
        print!("|");
        for symbol in row.chars() {
            let symbol = if symbol == '.' { ' ' } else { symbol };
            print!("{}|", symbol);
        }
        println!();
    }

    print!("+");
    for _ in 0..COLS {
        print!("-+");
    }
    println!();
    println!();
}

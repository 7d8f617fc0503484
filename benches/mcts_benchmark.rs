#[macro_use]
extern crate criterion;

use connect4_mcts::{Board, MCTSConfig, Player, Position, ValueFnEvaluator, MCTS};
use criterion::{black_box, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;

/// Mid-game positions shared by every benchmark
fn positions() -> Vec<(Board, Player)> {
    let mut rng = StdRng::seed_from_u64(0xC4);
    (0..8)
        .map(|_| {
            let board = Board::new().random_position(10, &mut rng);
            (board, board.player_to_move())
        })
        .collect()
}

fn bench_mcts_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search");
    group.measurement_time(Duration::from_secs(10));

    let positions = positions();

    // Rollout evaluation at different iteration counts
    for &iter_count in &[100, 1000, 5000] {
        let config = MCTSConfig::default()
            .with_max_iterations(iter_count)
            .with_seed(1);

        group.bench_with_input(
            BenchmarkId::new("rollouts/iterations", iter_count),
            &iter_count,
            |b, &_| {
                b.iter(|| {
                    for &(board, player) in &positions {
                        let mut mcts = MCTS::new(board, player, config.clone()).unwrap();
                        black_box(mcts.search().ok());
                    }
                })
            },
        );
    }

    // Tree bookkeeping only: a constant evaluator isolates selection,
    // expansion, virtual loss and backpropagation
    for &batch_size in &[1, 8, 64] {
        let config = MCTSConfig::default()
            .with_max_iterations(2000)
            .with_batch_size(batch_size)
            .with_seed(2);

        group.bench_with_input(
            BenchmarkId::new("constant_eval/batch_size", batch_size),
            &batch_size,
            |b, &_| {
                b.iter(|| {
                    for &(board, player) in &positions {
                        let evaluator = ValueFnEvaluator::new(
                            |batch: &[Position<Board>], _perspective: Player| {
                                vec![0.5; batch.len()]
                            },
                        );
                        let mut mcts = MCTS::new(board, player, config.clone())
                            .unwrap()
                            .with_evaluator(evaluator);
                        black_box(mcts.search().ok());
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_mcts_search);
criterion_main!(benches);

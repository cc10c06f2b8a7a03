// Search properties checked against reference minimax implementations
//
// Covers:
// - Alpha-beta returns the same score and line as plain minimax
// - The explored-path counter follows the windowed recursion exactly
// - Parallel fan-out returns the same score and line as sequential search
// - The principal variation replays to the reported score
// - Scores stay within the board size

use filler_solver::config::Config;
use filler_solver::game::{GameState, Grid, StandardGame};
use filler_solver::grid::{grid_from_rows, random_grid};
use filler_solver::movegen::generate_moves;
use filler_solver::search::{search, search_with, Score, SearchOptions};
use filler_solver::types::Player;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Result of a reference search: score, explored-path counter, line
type Reference = (Score, u64, Vec<u8>);

fn prefers(maximising: bool, score: Score, best: &Option<Reference>) -> bool {
    match best {
        None => true,
        Some((incumbent, _, _)) if maximising => score > *incumbent,
        Some((incumbent, _, _)) => score < *incumbent,
    }
}

/// Plain minimax over the same candidates and tie-break, no pruning
fn reference_minimax<const R: usize, const C: usize, const K: usize>(
    state: &GameState<R, C, K>,
    depth: u8,
    max_depth: u8,
) -> Reference {
    reference_alpha_beta(state, depth, max_depth, Score::MIN, Score::MAX, false)
}

/// Single-threaded recursion with an alpha-beta window
///
/// Every visited child adds its own counter plus one; the winning child's
/// counter is then replaced by that sum. With `prune` off the window is
/// still narrowed but never cuts, which gives plain minimax.
fn reference_alpha_beta<const R: usize, const C: usize, const K: usize>(
    state: &GameState<R, C, K>,
    depth: u8,
    max_depth: u8,
    mut alpha: Score,
    mut beta: Score,
    prune: bool,
) -> Reference {
    if depth >= max_depth || state.is_full() {
        return (state.score(), 0, Vec::new());
    }
    let actions = generate_moves(state);
    if actions.is_empty() {
        return (state.score(), 0, Vec::new());
    }

    let maximising = state.current_player() == Player::First;
    let mut best: Option<Reference> = None;
    let mut reachable = 0u64;

    for action in &actions {
        let (score, child_reachable, mut line) = if prune {
            reference_alpha_beta(&action.result, depth + 1, max_depth, alpha, beta, true)
        } else {
            reference_alpha_beta(
                &action.result,
                depth + 1,
                max_depth,
                Score::MIN,
                Score::MAX,
                false,
            )
        };
        reachable += child_reachable + 1;

        if maximising {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }

        if prefers(maximising, score, &best) {
            line.insert(0, action.color);
            best = Some((score, child_reachable, line));
        }

        if prune && beta <= alpha {
            break;
        }
    }

    match best {
        Some((score, _, line)) => (score, reachable, line),
        None => (state.score(), 0, Vec::new()),
    }
}

/// The sample board with PURPLE in both start corners
const SHARED_START_FIELD: Grid<7, 8> = [
    [2, 4, 1, 0, 2, 0, 2, 4],
    [4, 2, 5, 3, 4, 2, 5, 1],
    [3, 1, 2, 1, 2, 3, 4, 3],
    [4, 5, 3, 5, 0, 5, 0, 2],
    [5, 0, 2, 3, 1, 3, 2, 3],
    [1, 3, 1, 0, 3, 2, 5, 1],
    [4, 2, 0, 2, 4, 1, 0, 5],
];

fn random_game<const R: usize, const C: usize, const K: usize>(
    seed: u64,
    second_player_starts: bool,
) -> GameState<R, C, K> {
    let mut rng = StdRng::seed_from_u64(seed);
    let grid: Grid<R, C> = random_grid(&mut rng, K as u8);
    GameState::new(&grid, second_player_starts).expect("random boards use palette colors")
}

#[test]
fn test_alpha_beta_matches_reference_on_small_boards() {
    for seed in 0..40 {
        let game = random_game::<4, 4, 4>(seed, seed % 2 == 1);
        let (score, _, line) = reference_minimax(&game, 0, 16);
        let outcome = search(&game, 16);

        assert_eq!(outcome.score, score, "score differs for seed {}", seed);
        assert_eq!(outcome.trace, line, "line differs for seed {}", seed);
    }
}

#[test]
fn test_alpha_beta_matches_reference_on_standard_board() {
    for seed in 0..4 {
        let game = random_game::<7, 8, 6>(seed, false);
        let (score, _, line) = reference_minimax(&game, 0, 4);
        let outcome = search(&game, 4);

        assert_eq!(outcome.score, score, "score differs for seed {}", seed);
        assert_eq!(outcome.trace, line, "line differs for seed {}", seed);
    }
}

#[test]
fn test_parallel_fan_out_matches_sequential() {
    for seed in 0..10 {
        let game = random_game::<4, 5, 5>(seed, false);
        let sequential = search(&game, 10);

        for parallel_depth in [1, 2, 3] {
            let parallel = search_with(
                &game,
                &SearchOptions {
                    max_depth: 10,
                    parallel_depth,
                },
            );
            assert_eq!(parallel.score, sequential.score, "seed {}", seed);
            assert_eq!(parallel.trace, sequential.trace, "seed {}", seed);
        }
    }
}

#[test]
fn test_trace_replays_to_reported_score() {
    for seed in 0..20 {
        let game = random_game::<5, 5, 5>(seed, seed % 3 == 0);
        let outcome = search(&game, 8);

        assert!(outcome.trace.len() <= 8);
        let end = game
            .simulate_sequence(&outcome.trace)
            .expect("principal variation is legal");
        assert_eq!(end.score(), outcome.score, "seed {}", seed);
    }
}

#[test]
fn test_search_is_deterministic() {
    let game = random_game::<7, 8, 6>(99, false);
    let first = search(&game, 5);
    let second = search(&game, 5);
    assert_eq!(first, second);
}

#[test]
fn test_depth_one_visits_every_candidate() {
    for seed in 0..20 {
        let game = random_game::<7, 8, 6>(seed, false);
        let candidates = generate_moves(&game).len() as u64;
        let outcome = search(&game, 1);
        assert_eq!(outcome.reachable, candidates, "seed {}", seed);
    }
}

#[test]
fn test_score_bounded_by_board_size() {
    for seed in 0..20 {
        let game = random_game::<4, 4, 3>(seed, false);
        let outcome = search(&game, 16);
        assert!(outcome.score.abs() <= 16, "seed {}: {}", seed, outcome.score);
    }
}

#[test]
fn test_reachable_matches_windowed_reference() {
    for seed in 0..30 {
        let game = random_game::<5, 5, 5>(seed, seed % 2 == 1);

        for depth in [2, 3, 5, 8] {
            let expected =
                reference_alpha_beta(&game, 0, depth, Score::MIN, Score::MAX, true);
            let outcome = search(&game, depth);

            assert_eq!(outcome.score, expected.0, "score, seed {} depth {}", seed, depth);
            assert_eq!(outcome.reachable, expected.1, "reachable, seed {} depth {}", seed, depth);
            assert_eq!(outcome.trace, expected.2, "line, seed {} depth {}", seed, depth);
        }
    }
}

#[test]
fn test_cutoffs_shrink_the_explored_path() {
    // The windowed counter must fall below the unpruned one somewhere,
    // otherwise the comparison above never exercised a cutoff
    let mut pruned_somewhere = false;

    for seed in 0..30 {
        let game = random_game::<5, 5, 5>(seed, false);
        let pruned = search(&game, 5);
        let (score, unpruned_reachable, _) = reference_minimax(&game, 0, 5);

        assert_eq!(pruned.score, score);
        assert!(pruned.reachable <= unpruned_reachable, "seed {}", seed);
        pruned_somewhere |= pruned.reachable < unpruned_reachable;
    }

    assert!(pruned_somewhere);
}

#[test]
fn test_reachable_two_plies_on_default_board() {
    // Player 1 has GREEN and YELLOW; each leaves player 2 a single reply.
    // The YELLOW branch is cut after its reply, still one visit each.
    let grid: Grid<7, 8> =
        grid_from_rows(Config::default_hardcoded().game.board.as_slice()).unwrap();
    let game = StandardGame::new(&grid, false).unwrap();

    let outcome = search(&game, 2);
    assert_eq!(outcome.trace, vec![1, 2]);
    assert_eq!(outcome.score, 0);
    assert_eq!(outcome.reachable, 4);
}

#[test]
fn test_shared_start_board_is_searchable() {
    let game = StandardGame::new(&SHARED_START_FIELD, true).unwrap();
    assert_eq!(
        game.player_color(Player::First),
        game.player_color(Player::Second)
    );

    for depth in [1, 4, 6] {
        let expected = reference_alpha_beta(&game, 0, depth, Score::MIN, Score::MAX, true);
        let outcome = search(&game, depth);
        assert_eq!(outcome.score, expected.0, "depth {}", depth);
        assert_eq!(outcome.reachable, expected.1, "depth {}", depth);
        assert_eq!(outcome.trace, expected.2, "depth {}", depth);

        let end = game
            .simulate_sequence(&outcome.trace)
            .expect("principal variation is legal");
        assert_eq!(end.score(), outcome.score);
    }

    // Player 2 opens; PURPLE belongs to both players so it is never offered
    let opening = search(&game, 1);
    assert_eq!(opening.best_move(), Some(1));
    assert!(generate_moves(&game).iter().all(|a| a.color != 4));
}

// Minimax search with alpha-beta pruning and parallel fan-out at shallow plies
//
// Player 1 maximises the territory differential, player 2 minimises it.
// Plies shallower than `parallel_depth` search every candidate on the rayon
// pool with its own full window; deeper plies are sequential with pruning.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::GameState;
use crate::movegen::generate_moves;
use crate::simple_profiler;
use crate::types::Player;

/// Territory differential; positive favours player 1
pub type Score = i32;

/// Search limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Plies to look ahead before scoring statically
    pub max_depth: u8,
    /// Plies below this depth fan out across worker threads (0 = sequential)
    pub parallel_depth: u8,
}

impl SearchOptions {
    pub fn sequential(max_depth: u8) -> Self {
        SearchOptions {
            max_depth,
            parallel_depth: 0,
        }
    }
}

/// Result of searching a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Minimax value of the position
    pub score: Score,
    /// Principal variation, the color to play now first
    pub trace: Vec<u8>,
    /// Explored-path counter: children visited at each node along the
    /// principal variation, summed with their own explored-path counters.
    /// Siblings of the chosen line only contribute one each, so this is
    /// not the total search size; the profiler reports that.
    pub reachable: u64,
}

impl SearchOutcome {
    /// The color to claim now, if any claim makes progress
    pub fn best_move(&self) -> Option<u8> {
        self.trace.first().copied()
    }
}

/// Subtree result while the recursion unwinds; the trace is built leaf-first
#[derive(Debug)]
struct Line {
    score: Score,
    reachable: u64,
    reversed_trace: Vec<u8>,
}

impl Line {
    fn leaf(score: Score) -> Self {
        simple_profiler::record_leaf();
        Line {
            score,
            reachable: 0,
            reversed_trace: Vec::new(),
        }
    }

    fn into_outcome(self) -> SearchOutcome {
        let mut trace = self.reversed_trace;
        trace.reverse();
        SearchOutcome {
            score: self.score,
            trace,
            reachable: self.reachable,
        }
    }
}

/// Sequential search to `max_depth` plies with a full window
pub fn search<const ROWS: usize, const COLS: usize, const COLORS: usize>(
    state: &GameState<ROWS, COLS, COLORS>,
    max_depth: u8,
) -> SearchOutcome {
    search_with(state, &SearchOptions::sequential(max_depth))
}

/// Search with explicit options, fanning out below `options.parallel_depth`
pub fn search_with<const ROWS: usize, const COLS: usize, const COLORS: usize>(
    state: &GameState<ROWS, COLS, COLORS>,
    options: &SearchOptions,
) -> SearchOutcome {
    let line = minimax(state, 0, options, Score::MIN, Score::MAX);
    simple_profiler::merge_thread_local();
    line.into_outcome()
}

fn minimax<const ROWS: usize, const COLS: usize, const COLORS: usize>(
    state: &GameState<ROWS, COLS, COLORS>,
    depth: u8,
    options: &SearchOptions,
    mut alpha: Score,
    mut beta: Score,
) -> Line {
    crate::profile!("search", {
        if depth >= options.max_depth || state.is_full() {
            return Line::leaf(state.score());
        }

        let actions = generate_moves(state);
        if actions.is_empty() {
            return Line::leaf(state.score());
        }

        let maximising = state.current_player() == Player::First;

        // Fan-out children arrive in candidate order and are merged below
        let mut fanned_out = if depth < options.parallel_depth && actions.len() > 1 {
            debug!(
                "Fanning out {} candidates at depth {}",
                actions.len(),
                depth
            );
            let children: Vec<Line> = actions
                .par_iter()
                .map(|action| {
                    let child = minimax(&action.result, depth + 1, options, Score::MIN, Score::MAX);
                    simple_profiler::merge_thread_local();
                    child
                })
                .collect();
            Some(children.into_iter())
        } else {
            None
        };

        let mut best: Option<(u8, Line)> = None;
        let mut reachable = 0u64;

        for action in &actions {
            let child = match fanned_out.as_mut().and_then(Iterator::next) {
                Some(child) => child,
                None => minimax(&action.result, depth + 1, options, alpha, beta),
            };

            reachable += child.reachable + 1;

            if maximising {
                alpha = alpha.max(child.score);
            } else {
                beta = beta.min(child.score);
            }

            let improves = match &best {
                None => true,
                Some((_, incumbent)) if maximising => child.score > incumbent.score,
                Some((_, incumbent)) => child.score < incumbent.score,
            };
            if improves {
                best = Some((action.color, child));
            }

            if beta <= alpha {
                simple_profiler::record_cutoff();
                break;
            }
        }

        match best {
            Some((color, mut line)) => {
                line.reversed_trace.push(color);
                line.reachable = reachable;
                line
            }
            None => Line::leaf(state.score()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Grid;

    #[test]
    fn test_separated_two_color_board_is_static() {
        let grid: Grid<2, 2> = [[0, 1], [0, 1]];
        let game = GameState::<2, 2, 2>::new(&grid, false).unwrap();

        for depth in [0, 1, 5, 56] {
            let outcome = search(&game, depth);
            assert_eq!(outcome.score, game.score());
            assert!(outcome.trace.is_empty());
            assert_eq!(outcome.reachable, 0);
            assert_eq!(outcome.best_move(), None);
        }
    }

    #[test]
    fn test_single_candidate_at_depth_one() {
        let grid: Grid<2, 2> = [[2, 1], [0, 2]];
        let game = GameState::<2, 2, 3>::new(&grid, false).unwrap();

        let outcome = search(&game, 1);
        assert_eq!(outcome.trace, vec![2]);
        assert_eq!(outcome.score, game.simulate(2).unwrap().score());
        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.reachable, 1);
    }

    #[test]
    fn test_full_board_returns_immediately() {
        let grid: Grid<2, 2> = [[2, 1], [0, 2]];
        let full = GameState::<2, 2, 3>::new(&grid, false)
            .unwrap()
            .simulate(2)
            .unwrap();

        for depth in [0, 1, 10] {
            let outcome = search(&full, depth);
            assert_eq!(outcome.reachable, 0);
            assert!(outcome.trace.is_empty());
            assert_eq!(outcome.score, 2);
        }
    }

    #[test]
    fn test_depth_zero_is_static_score() {
        let grid: Grid<2, 2> = [[2, 1], [0, 2]];
        let game = GameState::<2, 2, 3>::new(&grid, true).unwrap();
        let outcome = search(&game, 0);
        assert_eq!(outcome.score, 0);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_minimising_player_picks_lowest_score() {
        // Player 2 to move at (0, 1) on color 1; color 2 takes both free cells
        let grid: Grid<2, 2> = [[2, 1], [0, 2]];
        let game = GameState::<2, 2, 3>::new(&grid, true).unwrap();
        let outcome = search(&game, 3);
        assert_eq!(outcome.trace, vec![2]);
        assert_eq!(outcome.score, -2);
    }

    #[test]
    fn test_parallel_options_match_sequential_on_small_board() {
        let grid: Grid<3, 3> = [
            [1, 4, 1],
            [3, 2, 0],
            [0, 3, 2],
        ];
        let game = GameState::<3, 3, 5>::new(&grid, false).unwrap();
        let sequential = search(&game, 9);
        let parallel = search_with(
            &game,
            &SearchOptions {
                max_depth: 9,
                parallel_depth: 2,
            },
        );
        assert_eq!(parallel.score, sequential.score);
        assert_eq!(parallel.trace, sequential.trace);
    }
}

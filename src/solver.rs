// Solver: turns the configuration into search options and runs the search
//
// The blocking entry point is used by the replay tool and tests; the async
// entry point moves the search onto a blocking worker so the caller can
// report progress on long solves.

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::GameError;
use crate::game::GameState;
use crate::search::{search_with, SearchOptions, SearchOutcome};
use crate::simple_profiler;
use crate::types::color_name;

/// Execution strategy based on configuration and hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Single-threaded alpha-beta at every ply
    Sequential,
    /// One worker per candidate at the shallow plies, sequential below
    ParallelFanOut,
}

/// Filler solver with static configuration
#[derive(Debug, Clone)]
pub struct Solver {
    config: Config,
}

impl Solver {
    /// Creates a new Solver instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the solver's lifetime
    pub fn new(config: Config) -> Self {
        Solver { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Strategy for the current rayon pool
    pub fn strategy(&self) -> ExecutionStrategy {
        Self::determine_strategy(rayon::current_num_threads(), &self.config)
    }

    /// Determines the execution strategy based on configuration and hardware
    fn determine_strategy(num_cpus: usize, config: &Config) -> ExecutionStrategy {
        if config.search.parallel_depth > 0 && num_cpus >= config.search.min_cpus_for_parallel {
            ExecutionStrategy::ParallelFanOut
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Search options for a given depth under the selected strategy
    pub fn search_options(&self, max_depth: u8) -> SearchOptions {
        match self.strategy() {
            ExecutionStrategy::ParallelFanOut => SearchOptions {
                max_depth,
                ..self.config.search.options()
            },
            ExecutionStrategy::Sequential => SearchOptions::sequential(max_depth),
        }
    }

    /// Solves a position to the configured depth
    pub fn solve<const ROWS: usize, const COLS: usize, const COLORS: usize>(
        &self,
        state: &GameState<ROWS, COLS, COLORS>,
    ) -> SearchOutcome {
        self.solve_to_depth(state, self.config.search.max_depth)
    }

    /// Solves a position to `max_depth` plies, logging the result
    pub fn solve_to_depth<const ROWS: usize, const COLS: usize, const COLORS: usize>(
        &self,
        state: &GameState<ROWS, COLS, COLORS>,
        max_depth: u8,
    ) -> SearchOutcome {
        let start_time = Instant::now();
        let options = self.search_options(max_depth);

        info!(
            "Solving for {} ({:?}, depth {}, {} tiles occupied)",
            state.current_player(),
            self.strategy(),
            options.max_depth,
            state.tiles_occupied()
        );

        simple_profiler::reset();
        let outcome = search_with(state, &options);
        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Search complete. Best move: {}, Score: {:+}, Line: {} plies, Explored path: {} nodes, Time: {}ms",
            outcome
                .best_move()
                .map(color_name)
                .unwrap_or_else(|| "none".to_string()),
            outcome.score,
            outcome.trace.len(),
            outcome.reachable,
            elapsed_ms
        );
        if simple_profiler::is_profiling_enabled() {
            debug!("Profiled search nodes: {}", simple_profiler::nodes_visited());
        }
        simple_profiler::print_report(elapsed_ms);

        outcome
    }

    /// Solves on a blocking worker, logging a heartbeat every polling interval
    ///
    /// The search always runs to completion; the heartbeat only reports it.
    pub async fn solve_with_progress<const ROWS: usize, const COLS: usize, const COLORS: usize>(
        &self,
        state: GameState<ROWS, COLS, COLORS>,
    ) -> Result<SearchOutcome, GameError> {
        let start_time = Instant::now();
        let polling_interval = Duration::from_millis(self.config.search.polling_interval_ms.max(1));

        let solver = self.clone();
        let mut handle = tokio::task::spawn_blocking(move || solver.solve(&state));

        loop {
            match tokio::time::timeout(polling_interval, &mut handle).await {
                Ok(joined) => return joined.map_err(|e| GameError::SearchTask(e.to_string())),
                Err(_) => info!(
                    "Still searching... {:.1}s elapsed",
                    start_time.elapsed().as_secs_f64()
                ),
            }
        }
    }
}

// Library exports for the Filler solver
// This allows the CLI, the replay tool and the integration tests to share the engine

#[macro_use]
pub mod simple_profiler;

pub mod bitboard;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod game;
pub mod grid;
pub mod movegen;
pub mod replay;
pub mod search;
pub mod solver;
pub mod types;

pub use error::GameError;
pub use game::{GameState, Grid, StandardGame};
pub use search::{search, search_with, Score, SearchOptions, SearchOutcome};

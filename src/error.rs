// Error types for board construction, move simulation and input parsing

use thiserror::Error;

use crate::types::Player;

/// Everything that can go wrong when building or advancing a game
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A grid cell holds a color index outside the palette
    #[error("Invalid color index {color} at ({row}, {col})")]
    InvalidColorIndex { row: usize, col: usize, color: u8 },

    /// The requested color does not exist on this board
    #[error("Color {color} is out of range")]
    ColorOutOfRange { color: u8 },

    /// The requested color is held by one of the players
    #[error("Player {} cannot claim color {color}", .player.number())]
    InvalidMove { player: Player, color: u8 },

    /// No color plane contains the cell (corrupted state)
    #[error("No color found at ({row}, {col})")]
    NoColorAt { row: usize, col: usize },

    /// Board text could not be parsed into the expected shape
    #[error("Malformed board: {0}")]
    MalformedGrid(String),

    /// A color name or index could not be parsed
    #[error("Unknown color \"{0}\"")]
    UnknownColor(String),

    /// The blocking search task did not complete
    #[error("Search task failed: {0}")]
    SearchTask(String),
}

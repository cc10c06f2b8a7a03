// Shared game vocabulary: players and the named color palette

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GameError;

/// One of the two players
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Starts in the bottom-left corner; maximises the score
    First,
    /// Starts in the top-right corner; minimises the score
    Second,
}

impl Player {
    /// Index into per-player arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    /// Human-facing player number (1 or 2)
    pub fn number(self) -> usize {
        self.index() + 1
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// The six tile colors of the standard game, in palette order
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Gray,
}

impl Color {
    /// Returns all colors in palette order
    pub fn all() -> [Color; 6] {
        [
            Color::Red,
            Color::Green,
            Color::Yellow,
            Color::Blue,
            Color::Purple,
            Color::Gray,
        ]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Color> {
        Color::all().get(index as usize).copied()
    }

    /// Converts color to the upper-case name used in prompts and traces
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Yellow => "YELLOW",
            Color::Blue => "BLUE",
            Color::Purple => "PURPLE",
            Color::Gray => "GRAY",
        }
    }
}

/// Parses a color given by name (any case) or by palette index
///
/// Names only cover the six standard colors; larger palettes use indices.
pub fn parse_color(s: &str) -> Result<u8, GameError> {
    let trimmed = s.trim();
    if let Ok(index) = trimmed.parse::<u8>() {
        return Ok(index);
    }
    Color::all()
        .iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
        .map(|c| c.index())
        .ok_or_else(|| GameError::UnknownColor(trimmed.to_string()))
}

/// Display name for a color index: the palette name when there is one
pub fn color_name(index: u8) -> String {
    match Color::from_index(index) {
        Some(color) => color.as_str().to_string(),
        None => index.to_string(),
    }
}

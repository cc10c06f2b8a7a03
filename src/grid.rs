// Board input: text grids of color digits and random boards

use rand::Rng;
use std::fs;
use std::path::Path;

use crate::error::GameError;
use crate::game::Grid;

/// Builds a grid from one string of color digits per row
///
/// Whitespace inside a row is ignored, so "2 4 1 0" and "2410" are the same row.
pub fn grid_from_rows<const ROWS: usize, const COLS: usize, S: AsRef<str>>(
    rows: &[S],
) -> Result<Grid<ROWS, COLS>, GameError> {
    if rows.len() != ROWS {
        return Err(GameError::MalformedGrid(format!(
            "expected {} rows, found {}",
            ROWS,
            rows.len()
        )));
    }

    let mut grid = [[0u8; COLS]; ROWS];
    for (row, line) in rows.iter().enumerate() {
        let digits: Vec<char> = line
            .as_ref()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if digits.len() != COLS {
            return Err(GameError::MalformedGrid(format!(
                "row {} has {} cells, expected {}",
                row,
                digits.len(),
                COLS
            )));
        }
        for (col, c) in digits.into_iter().enumerate() {
            grid[row][col] = c.to_digit(10).ok_or_else(|| {
                GameError::MalformedGrid(format!("'{}' at ({}, {}) is not a color digit", c, row, col))
            })? as u8;
        }
    }
    Ok(grid)
}

/// Parses board text: one row per line, blank lines and `#` comments skipped
pub fn parse_grid<const ROWS: usize, const COLS: usize>(
    text: &str,
) -> Result<Grid<ROWS, COLS>, GameError> {
    let rows: Vec<&str> = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .collect();
    grid_from_rows(rows.as_slice())
}

/// Reads and parses a board file
pub fn load_grid<const ROWS: usize, const COLS: usize, P: AsRef<Path>>(
    path: P,
) -> Result<Grid<ROWS, COLS>, String> {
    let text = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read board file: {}", e))?;
    parse_grid(&text).map_err(|e| format!("Failed to parse board file: {}", e))
}

/// Formats a grid as one string of digits per row (the inverse of `grid_from_rows`)
pub fn grid_to_rows<const ROWS: usize, const COLS: usize>(grid: &Grid<ROWS, COLS>) -> Vec<String> {
    grid.iter()
        .map(|row| row.iter().map(|color| color.to_string()).collect())
        .collect()
}

/// Random board; the top-right corner is re-rolled until the two start
/// cells show different colors, so generated games open asymmetrically.
/// Boards with a shared start color are still valid input to `GameState::new`.
///
/// # Arguments
/// * `rng` - Source of randomness; seed it for reproducible boards
/// * `colors` - Palette size
///
/// # Panics
/// Panics if `colors` is below 2, since no two start colors could differ.
pub fn random_grid<const ROWS: usize, const COLS: usize, R: Rng>(
    rng: &mut R,
    colors: u8,
) -> Grid<ROWS, COLS> {
    assert!(
        colors >= 2,
        "random boards need at least 2 colors, got {}",
        colors
    );

    let mut grid = [[0u8; COLS]; ROWS];
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            *cell = rng.random_range(0..colors);
        }
    }
    while grid[0][COLS - 1] == grid[ROWS - 1][0] {
        grid[0][COLS - 1] = rng.random_range(0..colors);
    }
    grid
}

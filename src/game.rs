// Game state and move simulation
//
// The state is a small Copy value: one plane per color, one plane per
// player, each player's current color and the side to move. Simulating a
// move always yields a fresh value, so search branches never alias.

use std::fmt;

use crate::bitboard::Geometry;
use crate::error::GameError;
use crate::types::Player;

/// Board height of the standard game
pub const STANDARD_ROWS: usize = 7;
/// Board width of the standard game
pub const STANDARD_COLS: usize = 8;
/// Palette size of the standard game
pub const STANDARD_COLORS: usize = 6;

/// Grid of color indices, row 0 first
pub type Grid<const ROWS: usize, const COLS: usize> = [[u8; COLS]; ROWS];

/// The 7x8, six-color game
pub type StandardGame = GameState<STANDARD_ROWS, STANDARD_COLS, STANDARD_COLORS>;

/// A position in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState<const ROWS: usize, const COLS: usize, const COLORS: usize> {
    color_planes: [u64; COLORS],
    player_planes: [u64; 2],
    player_colors: [u8; 2],
    current_player: Player,
}

impl<const ROWS: usize, const COLS: usize, const COLORS: usize> GameState<ROWS, COLS, COLORS> {
    /// Palette size; fails compilation for palettes the u8 color type cannot index
    const PALETTE: usize = {
        assert!(COLORS >= 2, "a game needs at least two colors");
        assert!(COLORS <= 64, "more colors than cells");
        COLORS
    };

    /// Builds the initial position from a grid of color indices
    ///
    /// Player 1 owns the bottom-left cell and player 2 the top-right cell;
    /// each starts with the color of that cell.
    ///
    /// # Arguments
    /// * `grid` - Color index of every cell, row 0 first
    /// * `second_player_starts` - Whether player 2 makes the first move
    pub fn new(grid: &Grid<ROWS, COLS>, second_player_starts: bool) -> Result<Self, GameError> {
        let palette = Self::PALETTE;
        let _ = Geometry::<ROWS, COLS>::CELLS;

        let mut color_planes = [0u64; COLORS];
        for (row, cells) in grid.iter().enumerate() {
            for (col, &color) in cells.iter().enumerate() {
                if color as usize >= palette {
                    return Err(GameError::InvalidColorIndex { row, col, color });
                }
                color_planes[color as usize] |= Geometry::<ROWS, COLS>::cell(row, col);
            }
        }

        let first_color = grid[ROWS - 1][0];
        let second_color = grid[0][COLS - 1];

        Ok(GameState {
            color_planes,
            player_planes: [
                Geometry::<ROWS, COLS>::cell(ROWS - 1, 0),
                Geometry::<ROWS, COLS>::cell(0, COLS - 1),
            ],
            player_colors: [first_color, second_color],
            current_player: if second_player_starts {
                Player::Second
            } else {
                Player::First
            },
        })
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn player_color(&self, player: Player) -> u8 {
        self.player_colors[player.index()]
    }

    pub fn player_territory(&self, player: Player) -> u64 {
        self.player_planes[player.index()]
    }

    /// Cells currently showing `color`, or None outside the palette
    pub fn color_territory(&self, color: u8) -> Option<u64> {
        self.color_planes.get(color as usize).copied()
    }

    /// Whether the side to move may claim `color`
    #[inline]
    pub fn is_legal(&self, color: u8) -> bool {
        (color as usize) < COLORS
            && color != self.player_colors[0]
            && color != self.player_colors[1]
    }

    /// Colors the side to move may claim, in ascending order
    pub fn legal_colors(&self) -> impl Iterator<Item = u8> {
        let held = self.player_colors;
        (0..COLORS as u8).filter(move |color| !held.contains(color))
    }

    /// Returns the position after the side to move claims `color`
    pub fn simulate(&self, color: u8) -> Result<Self, GameError> {
        if color as usize >= COLORS {
            return Err(GameError::ColorOutOfRange { color });
        }
        if !self.is_legal(color) {
            return Err(GameError::InvalidMove {
                player: self.current_player,
                color,
            });
        }

        let mut next = *self;
        next.advance(color);
        Ok(next)
    }

    /// Applies a sequence of claims in order, stopping at the first illegal one
    pub fn simulate_sequence(&self, colors: &[u8]) -> Result<Self, GameError> {
        colors
            .iter()
            .try_fold(*self, |state, &color| state.simulate(color))
    }

    /// Claims `color` in place; the caller has checked legality
    #[inline]
    pub(crate) fn advance(&mut self, color: u8) {
        debug_assert!(self.is_legal(color));

        let player = self.current_player.index();
        let old_color = self.player_colors[player] as usize;
        let own = self.player_planes[player];

        let captured = Geometry::<ROWS, COLS>::expand(own) & self.color_planes[color as usize] & !own;
        let own = own | captured;

        self.player_planes[player] = own;
        self.color_planes[color as usize] |= own;
        self.color_planes[old_color] &= !own;

        self.player_colors[player] = color;
        self.current_player = self.current_player.opponent();
    }

    /// Territory differential; positive favours player 1
    #[inline]
    pub fn score(&self) -> i32 {
        self.player_planes[0].count_ones() as i32 - self.player_planes[1].count_ones() as i32
    }

    /// Cells owned by either player
    #[inline]
    pub fn tiles_occupied(&self) -> u32 {
        self.player_planes[0].count_ones() + self.player_planes[1].count_ones()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.tiles_occupied() as usize == Geometry::<ROWS, COLS>::CELLS
    }

    /// The board is full or the side to move has no color to claim
    pub fn is_ended(&self) -> bool {
        self.is_full() || self.legal_colors().next().is_none()
    }

    /// Color index shown by a cell
    pub fn color_at(&self, row: usize, col: usize) -> Result<u8, GameError> {
        let mask = Geometry::<ROWS, COLS>::cell(row, col);
        self.color_planes
            .iter()
            .position(|plane| plane & mask != 0)
            .map(|color| color as u8)
            .ok_or(GameError::NoColorAt { row, col })
    }

    /// Text rendering: the side to move, then one line of color digits per row
    pub fn render(&self) -> Result<String, GameError> {
        let mut out = format!("Turn: {}\n", self.current_player);
        for row in 0..ROWS {
            for col in 0..COLS {
                let color = self.color_at(row, col)?;
                out.push_str(&color.to_string());
            }
            out.push('\n');
        }
        Ok(out)
    }
}

impl<const ROWS: usize, const COLS: usize, const COLORS: usize> fmt::Display
    for GameState<ROWS, COLS, COLORS>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

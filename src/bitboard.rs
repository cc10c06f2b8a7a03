// Bit-plane encoding of the board
//
// A plane is a u64 where bit `row * COLS + col` stands for one cell. Every
// shift below masks its result back onto the board so bits never wrap into
// the neighbouring row or escape above the last row.

use std::marker::PhantomData;

/// Shift-and-mask operators for a ROWS x COLS board packed into a u64
#[derive(Debug, Clone, Copy, Default)]
pub struct Geometry<const ROWS: usize, const COLS: usize> {
    _marker: PhantomData<[(); COLS]>,
}

impl<const ROWS: usize, const COLS: usize> Geometry<ROWS, COLS> {
    /// Number of cells; fails compilation for boards that do not fit a u64
    pub const CELLS: usize = {
        assert!(ROWS * COLS <= 64, "board does not fit in a 64-bit plane");
        assert!(ROWS * COLS >= 2, "board needs two distinct start cells");
        ROWS * COLS
    };

    /// All bits that map to a cell
    pub const BOARD_MASK: u64 = if Self::CELLS == 64 {
        u64::MAX
    } else {
        (1u64 << Self::CELLS) - 1
    };

    /// Cells of column 0
    pub const FIRST_COLUMN: u64 = Self::column_mask(0);

    /// Cells of column COLS - 1
    pub const LAST_COLUMN: u64 = Self::column_mask(COLS - 1);

    const fn column_mask(col: usize) -> u64 {
        let mut mask = 0u64;
        let mut row = 0;
        while row < ROWS {
            mask |= 1u64 << (row * COLS + col);
            row += 1;
        }
        mask
    }

    /// Bit index of a cell
    #[inline]
    pub const fn index(row: usize, col: usize) -> usize {
        row * COLS + col
    }

    /// Single-cell plane
    #[inline]
    pub const fn cell(row: usize, col: usize) -> u64 {
        1u64 << Self::index(row, col)
    }

    /// Moves every cell one row towards row 0
    #[inline]
    pub fn up(plane: u64) -> u64 {
        plane.checked_shr(COLS as u32).unwrap_or(0) & Self::BOARD_MASK
    }

    /// Moves every cell one row towards row ROWS - 1
    #[inline]
    pub fn down(plane: u64) -> u64 {
        plane.checked_shl(COLS as u32).unwrap_or(0) & Self::BOARD_MASK
    }

    /// Moves every cell one column towards column 0
    #[inline]
    pub fn left(plane: u64) -> u64 {
        (plane >> 1) & !Self::LAST_COLUMN & Self::BOARD_MASK
    }

    /// Moves every cell one column towards column COLS - 1
    #[inline]
    pub fn right(plane: u64) -> u64 {
        (plane << 1) & !Self::FIRST_COLUMN & Self::BOARD_MASK
    }

    /// The plane plus every cell one step away in a cardinal direction
    #[inline]
    pub fn expand(plane: u64) -> u64 {
        plane | Self::up(plane) | Self::down(plane) | Self::left(plane) | Self::right(plane)
    }

    /// Diagnostic dump: one line of 0/1 per row, column 0 first
    pub fn render(plane: u64) -> String {
        let mut out = String::with_capacity(ROWS * (COLS + 1));
        for row in 0..ROWS {
            for col in 0..COLS {
                out.push(if plane & Self::cell(row, col) != 0 { '1' } else { '0' });
            }
            out.push('\n');
        }
        out
    }
}

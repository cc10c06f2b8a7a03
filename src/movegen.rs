// Legal move generation with tile-gain ordering

use crate::game::GameState;
use crate::simple_profiler::ProfileGuard;

/// A candidate claim together with the position it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action<const ROWS: usize, const COLS: usize, const COLORS: usize> {
    pub color: u8,
    pub result: GameState<ROWS, COLS, COLORS>,
    pub tile_gain: u32,
}

/// Generates every claim that gains at least one tile, best gain first
///
/// Zero-gain claims are legal but leave the board unchanged apart from the
/// mover's color, so they are dropped. Ties keep ascending color order. An
/// empty result means the side to move cannot make progress.
pub fn generate_moves<const ROWS: usize, const COLS: usize, const COLORS: usize>(
    state: &GameState<ROWS, COLS, COLORS>,
) -> Vec<Action<ROWS, COLS, COLORS>> {
    let _guard = ProfileGuard::new("move_gen");

    let tiles_before = state.tiles_occupied();
    let mut actions: Vec<Action<ROWS, COLS, COLORS>> = state
        .legal_colors()
        .filter_map(|color| {
            let mut result = *state;
            result.advance(color);
            let tile_gain = result.tiles_occupied() - tiles_before;
            (tile_gain > 0).then_some(Action {
                color,
                result,
                tile_gain,
            })
        })
        .collect();

    actions.sort_by(|a, b| b.tile_gain.cmp(&a.tile_gain));
    actions
}

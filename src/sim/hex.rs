//! Hex adjacency and cell geometry
//!
//! Rows with even `(row + first_row)` parity sit flush with the left wall;
//! odd rows are shifted right by one bubble radius. Because `first_row` moves
//! on every field advance, parity is always evaluated against the current
//! value and never cached.

use glam::Vec2;

use super::grid::{Cell, HexGrid, in_bounds};
use crate::consts::*;

/// Whether `(row + first_row)` is odd (row shifted right by one radius)
#[inline]
pub fn is_shifted(row: i32, first_row: i32) -> bool {
    (row + first_row).rem_euclid(2) == 1
}

/// The up-to-6 in-bounds hex cells around (row, col), occupied or not
pub fn hex_cells(row: i32, col: i32, first_row: i32) -> Vec<Cell> {
    let diag = if is_shifted(row, first_row) { col + 1 } else { col - 1 };
    [
        (row, col - 1),
        (row, col + 1),
        (row - 1, col),
        (row + 1, col),
        (row - 1, diag),
        (row + 1, diag),
    ]
    .into_iter()
    .filter(|&(r, c)| in_bounds(r, c))
    .collect()
}

/// Occupied neighbors of (row, col)
pub fn neighbors(grid: &HexGrid, row: i32, col: i32, first_row: i32) -> Vec<Cell> {
    hex_cells(row, col, first_row)
        .into_iter()
        .filter(|&(r, c)| grid.contains(r, c))
        .collect()
}

/// Center of a cell in field coordinates (y grows downward)
pub fn cell_center(row: i32, col: i32, first_row: i32) -> Vec2 {
    let shift = if is_shifted(row, first_row) {
        BUBBLE_RADIUS
    } else {
        0.0
    };
    Vec2::new(
        BUBBLE_RADIUS + col as f32 * BUBBLE_DIAMETER + shift,
        BUBBLE_RADIUS + row as f32 * ROW_HEIGHT,
    )
}

/// y of the ceiling boundary line (top edge of row `first_row`)
#[inline]
pub fn ceiling_marker_y(first_row: i32) -> f32 {
    first_row as f32 * ROW_HEIGHT
}

/// Column of `row` whose span contains `x`, clamped to the field
pub fn column_under(x: f32, row: i32, first_row: i32) -> i32 {
    let shift = if is_shifted(row, first_row) {
        BUBBLE_RADIUS
    } else {
        0.0
    };
    let col = ((x - shift) / BUBBLE_DIAMETER).floor() as i32;
    col.clamp(0, MAXWIDTH - 1)
}

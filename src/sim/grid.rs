//! Sparse hexagonal bubble storage
//!
//! The grid owns every bubble on the field and keeps a per-color occupancy
//! count so the live palette always matches what is actually on the field.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GridError;

/// Opaque bubble color token (as written in level files)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grid position (row, col)
pub type Cell = (i32, i32);

/// Whether a cell lies inside the field's row/column domain
#[inline]
pub fn in_bounds(row: i32, col: i32) -> bool {
    (0..=MAX_ROW).contains(&row) && (0..MAXWIDTH).contains(&col)
}

/// A placed bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub row: i32,
    pub col: i32,
    pub color: Color,
}

impl Bubble {
    pub fn new(row: i32, col: i32, color: Color) -> Self {
        Self { row, col, color }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        (self.row, self.col)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexGrid {
    cells: HashMap<Cell, Bubble>,
    /// Occupancy per color; a color is present iff its count is non-zero
    palette: BTreeMap<Color, usize>,
}

impl HexGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bubble into an empty, in-bounds cell
    pub fn place(&mut self, bubble: Bubble) -> Result<(), GridError> {
        let (row, col) = bubble.cell();
        if !in_bounds(row, col) {
            return Err(GridError::OutOfBounds { row, col });
        }
        if self.cells.contains_key(&(row, col)) {
            return Err(GridError::Conflict { row, col });
        }
        *self.palette.entry(bubble.color.clone()).or_insert(0) += 1;
        self.cells.insert((row, col), bubble);
        Ok(())
    }

    /// Remove the bubble at (row, col), if any
    pub fn remove(&mut self, row: i32, col: i32) -> Option<Bubble> {
        let bubble = self.cells.remove(&(row, col))?;
        if let Some(count) = self.palette.get_mut(&bubble.color) {
            *count -= 1;
            if *count == 0 {
                self.palette.remove(&bubble.color);
            }
        }
        Some(bubble)
    }

    pub fn get(&self, row: i32, col: i32) -> Option<&Bubble> {
        self.cells.get(&(row, col))
    }

    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        self.cells.contains_key(&(row, col))
    }

    /// Colors currently on the field, in stable order
    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        self.palette.keys()
    }

    pub fn has_color(&self, color: &Color) -> bool {
        self.palette.contains_key(color)
    }

    pub fn count_of(&self, color: &Color) -> usize {
        self.palette.get(color).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate bubbles (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.cells.values()
    }

    /// Occupied cells sorted by (row, col)
    pub fn sorted_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.cells.keys().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Lowest row currently holding a bubble (largest row index)
    pub fn lowest_row(&self) -> Option<i32> {
        self.cells.keys().map(|&(row, _)| row).max()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.palette.clear();
    }

    /// Move every bubble down one row. Colors and columns are untouched.
    ///
    /// Returns the (from, to) cell pairs in bottom-up order.
    pub fn shift_down(&mut self) -> Result<Vec<(Cell, Cell)>, GridError> {
        if let Some(lowest) = self.lowest_row() {
            if lowest + 1 > MAX_ROW {
                let col = self
                    .cells
                    .keys()
                    .find(|&&(row, _)| row == lowest)
                    .map(|&(_, col)| col)
                    .unwrap_or(0);
                return Err(GridError::OutOfBounds { row: lowest + 1, col });
            }
        }

        let mut moves: Vec<(Cell, Cell)> = self
            .cells
            .keys()
            .map(|&(row, col)| ((row, col), (row + 1, col)))
            .collect();
        moves.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        let shifted: HashMap<Cell, Bubble> = self
            .cells
            .drain()
            .map(|(_, mut bubble)| {
                bubble.row += 1;
                (bubble.cell(), bubble)
            })
            .collect();
        self.cells = shifted;
        Ok(moves)
    }
}

//! Level files
//!
//! A level file holds every level of the game:
//!
//! ```json
//! { "levels": [ { "bubbles": [ { "row": 0, "col": 3, "color": "red" } ] } ] }
//! ```
//!
//! Records are validated on load so a session never starts from bad data.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, LevelError};
use crate::sim::grid::{Bubble, Color, HexGrid, in_bounds};

/// One initial bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleRecord {
    pub row: i32,
    pub col: i32,
    pub color: Color,
}

/// Initial field of one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub bubbles: Vec<BubbleRecord>,
}

impl Level {
    /// Check bounds, uniqueness and non-emptiness of the records
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.bubbles.is_empty() {
            return Err(LevelError::InvalidLevelData("level has no bubbles".into()));
        }

        let mut seen = HashSet::with_capacity(self.bubbles.len());
        for record in &self.bubbles {
            if !in_bounds(record.row, record.col) {
                return Err(LevelError::InvalidLevelData(format!(
                    "bubble at ({}, {}) is outside the field",
                    record.row, record.col
                )));
            }
            if record.color.as_str().is_empty() {
                return Err(LevelError::InvalidLevelData(format!(
                    "bubble at ({}, {}) has no color",
                    record.row, record.col
                )));
            }
            if !seen.insert((record.row, record.col)) {
                return Err(LevelError::InvalidLevelData(format!(
                    "duplicate bubble at ({}, {})",
                    record.row, record.col
                )));
            }
        }
        Ok(())
    }

    /// Build the starting grid
    pub fn to_grid(&self) -> Result<HexGrid, GridError> {
        let mut grid = HexGrid::new();
        for record in &self.bubbles {
            grid.place(Bubble::new(record.row, record.col, record.color.clone()))?;
        }
        Ok(grid)
    }
}

/// All levels of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<Level>,
}

impl LevelSet {
    /// Parse and validate a level file's contents
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let set: LevelSet = serde_json::from_str(json)?;
        if set.levels.is_empty() {
            return Err(LevelError::InvalidLevelData("no levels defined".into()));
        }
        for (i, level) in set.levels.iter().enumerate() {
            level.validate().map_err(|e| match e {
                LevelError::InvalidLevelData(msg) => {
                    LevelError::InvalidLevelData(format!("level {}: {}", i + 1, msg))
                }
                other => other,
            })?;
        }
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json(&json)?;
        log::info!("Loaded {} level(s) from {}", set.levels.len(), path.display());
        Ok(set)
    }

    /// Level by 1-based number
    pub fn level(&self, number: usize) -> Result<&Level, LevelError> {
        number
            .checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .ok_or_else(|| LevelError::InvalidLevelData(format!("no level {}", number)))
    }
}

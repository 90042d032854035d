//! Fault taxonomy
//!
//! Grid faults are invariant violations raised by the simulation; level faults
//! are surfaced to the loader before a session starts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) is already occupied")]
    Conflict { row: i32, col: i32 },
    #[error("cell ({row}, {col}) is outside the field")]
    OutOfBounds { row: i32, col: i32 },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level data: {0}")]
    InvalidLevelData(String),
}

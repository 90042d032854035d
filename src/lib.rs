//! Bubble Buster - hexagonal bubble shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, matching, projectile, field advance)
//! - `level`: Level file parsing and validation
//! - `settings`: Data-driven tuning knobs
//! - `error`: Fault taxonomy for the grid and the level loader

pub mod error;
pub mod level;
pub mod settings;
pub mod sim;

pub use error::{GridError, LevelError};
pub use level::{BubbleRecord, Level, LevelSet};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (10 ms, the projectile cadence)
    pub const SIM_DT: f32 = 0.010;

    /// Number of columns in the field
    pub const MAXWIDTH: i32 = 12;
    /// Number of playable rows; rows MAXHEIGHT and MAXHEIGHT+1 are buffer rows
    pub const MAXHEIGHT: i32 = 18;
    /// Highest valid row index (inclusive)
    pub const MAX_ROW: i32 = MAXHEIGHT + 1;
    /// Bottom-most playable row; a bubble here (or below) loses the game
    pub const LOSE_ROW: i32 = MAXHEIGHT - 1;

    /// Bubble geometry
    pub const BUBBLE_RADIUS: f32 = 18.0;
    pub const BUBBLE_DIAMETER: f32 = BUBBLE_RADIUS * 2.0;
    /// Vertical distance between row centers (D * sqrt(3) / 2)
    pub const ROW_HEIGHT: f32 = BUBBLE_DIAMETER * 0.866_025_4;

    /// Field dimensions (odd-parity rows are offset by one radius)
    pub const FIELD_WIDTH: f32 = MAXWIDTH as f32 * BUBBLE_DIAMETER + BUBBLE_RADIUS;
    pub const FIELD_HEIGHT: f32 = BUBBLE_DIAMETER + MAX_ROW as f32 * ROW_HEIGHT;

    /// Projectile speed in field units per tick
    pub const PROJECTILE_SPEED: f32 = 10.0;

    /// Post-collision settle time (50 ms)
    pub const SETTLE_TICKS: u32 = 5;
    /// One half of a shake oscillation (50 ms)
    pub const SHAKE_HALF_CYCLE_TICKS: u32 = 5;

    /// Points per matched bubble
    pub const MATCH_POINTS: u64 = 15;
    /// Multiplier applied to the color bonus of each orphan
    pub const ORPHAN_MULTIPLIER: u64 = 3;
}

/// Launcher position: horizontally centered, in the last buffer row
#[inline]
pub fn launcher_position() -> glam::Vec2 {
    use consts::*;
    glam::Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - BUBBLE_RADIUS)
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by grid position)
//! - No rendering or platform dependencies

pub mod advance;
pub mod collision;
pub mod grid;
pub mod hex;
pub mod matching;
pub mod projectile;
pub mod scoring;
pub mod state;
pub mod tick;

pub use advance::{AdvanceEvent, AdvancePhase, FieldAdvancer};
pub use collision::{Collision, CollisionKind, check_collision};
pub use grid::{Bubble, Cell, Color, HexGrid, in_bounds};
pub use hex::{cell_center, ceiling_marker_y, hex_cells, neighbors};
pub use matching::{
    MIN_MATCH, Resolution, find_color_matches, find_orphans, resolve_landing, snap_to_cell,
};
pub use projectile::{FlightStep, Projectile};
pub use scoring::ColorScore;
pub use state::{GameEvent, GamePhase, GameSession, MAX_QUEUED_EVENTS, Outcome};
pub use tick::{TickInput, tick};

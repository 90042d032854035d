//! The single bubble in flight

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collision, check_collision, wall_bounce};
use super::grid::{Color, HexGrid};

/// Smallest upward aim component accepted (keeps shots from skimming sideways forever)
const MIN_AIM_RISE: f32 = 0.05;

/// Outcome of one flight step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightStep {
    /// Still travelling; carries the new position
    Moving(Vec2),
    /// Flight ended against a bubble or the ceiling
    Landed(Collision),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub color: Color,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Projectile {
    /// Launch a bubble from `origin` toward `aim_point`
    ///
    /// Returns `None` when the aim does not point up into the field.
    pub fn fire(color: Color, origin: Vec2, aim_point: Vec2, speed: f32) -> Option<Self> {
        let dir = (aim_point - origin).normalize_or_zero();
        // Field y grows downward, so "up" is negative y
        if dir.y > -MIN_AIM_RISE {
            return None;
        }
        Some(Self {
            color,
            pos: origin,
            vel: dir * speed,
        })
    }

    /// Move one tick, bounce off the walls, then test for a collision
    pub fn advance(&mut self, grid: &HexGrid, first_row: i32) -> FlightStep {
        self.pos += self.vel;
        if wall_bounce(&mut self.pos, &mut self.vel) {
            log::trace!("Projectile bounced at {:?}", self.pos);
        }

        match check_collision(self.pos, grid, first_row) {
            Some(hit) => FlightStep::Landed(hit),
            None => FlightStep::Moving(self.pos),
        }
    }
}

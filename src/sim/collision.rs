//! Collision detection for the flying bubble
//!
//! The projectile collides with the nearest placed bubble whose center lies
//! within one diameter, with the ceiling row, and bounces off the side walls.

use glam::Vec2;

use super::grid::{Cell, HexGrid};
use super::hex::cell_center;
use crate::consts::*;

/// What the projectile struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionKind {
    /// A placed bubble at the given cell
    Bubble(Cell),
    /// The ceiling boundary row
    Ceiling,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub kind: CollisionKind,
    /// Projectile center at impact
    pub point: Vec2,
}

/// Find the nearest placed bubble within one diameter of `pos`
///
/// Ties resolve to the smallest (row, col) so results do not depend on the
/// grid's storage order.
pub fn nearest_bubble_hit(pos: Vec2, grid: &HexGrid, first_row: i32) -> Option<Cell> {
    grid.iter()
        .map(|b| (b.cell(), cell_center(b.row, b.col, first_row).distance(pos)))
        .filter(|&(_, dist)| dist < BUBBLE_DIAMETER)
        .min_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        })
        .map(|(cell, _)| cell)
}

/// Check whether the projectile reached the ceiling row
#[inline]
pub fn reached_ceiling(pos: Vec2, first_row: i32) -> bool {
    pos.y <= cell_center(first_row, 0, first_row).y
}

/// Full collision test for one projectile position
pub fn check_collision(pos: Vec2, grid: &HexGrid, first_row: i32) -> Option<Collision> {
    if let Some(cell) = nearest_bubble_hit(pos, grid, first_row) {
        return Some(Collision {
            kind: CollisionKind::Bubble(cell),
            point: pos,
        });
    }
    if reached_ceiling(pos, first_row) {
        return Some(Collision {
            kind: CollisionKind::Ceiling,
            point: pos,
        });
    }
    None
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce off the side walls
///
/// A bubble center may range over `[R, FIELD_WIDTH - R]`. Overshoot is
/// mirrored back inside and the x-velocity flipped. Returns true on a bounce.
pub fn wall_bounce(pos: &mut Vec2, vel: &mut Vec2) -> bool {
    let left = BUBBLE_RADIUS;
    let right = FIELD_WIDTH - BUBBLE_RADIUS;

    if pos.x < left {
        pos.x = 2.0 * left - pos.x;
        *vel = reflect_velocity(*vel, Vec2::X);
        true
    } else if pos.x > right {
        pos.x = 2.0 * right - pos.x;
        *vel = reflect_velocity(*vel, Vec2::NEG_X);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Bubble, Color};

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(Vec2::new(100.0, -20.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 0.001);
        assert!((reflected.y + 20.0).abs() < 0.001);
    }

    #[test]
    fn test_wall_bounce_left() {
        let mut pos = Vec2::new(BUBBLE_RADIUS - 4.0, 300.0);
        let mut vel = Vec2::new(-6.0, -8.0);
        assert!(wall_bounce(&mut pos, &mut vel));
        assert!((pos.x - (BUBBLE_RADIUS + 4.0)).abs() < 0.001);
        assert_eq!(vel, Vec2::new(6.0, -8.0));
    }

    #[test]
    fn test_wall_bounce_right() {
        let mut pos = Vec2::new(FIELD_WIDTH - BUBBLE_RADIUS + 3.0, 300.0);
        let mut vel = Vec2::new(6.0, -8.0);
        assert!(wall_bounce(&mut pos, &mut vel));
        assert!((pos.x - (FIELD_WIDTH - BUBBLE_RADIUS - 3.0)).abs() < 0.001);
        assert_eq!(vel, Vec2::new(-6.0, -8.0));
    }

    #[test]
    fn test_no_bounce_inside() {
        let mut pos = Vec2::new(200.0, 300.0);
        let mut vel = Vec2::new(6.0, -8.0);
        assert!(!wall_bounce(&mut pos, &mut vel));
        assert_eq!(vel, Vec2::new(6.0, -8.0));
    }

    #[test]
    fn test_nearest_bubble_hit_picks_closest() {
        let mut grid = HexGrid::new();
        grid.place(Bubble::new(3, 4, Color::new("red"))).unwrap();
        grid.place(Bubble::new(3, 5, Color::new("red"))).unwrap();

        let target = cell_center(3, 5, 0);
        let pos = target + Vec2::new(5.0, 20.0);
        assert_eq!(nearest_bubble_hit(pos, &grid, 0), Some((3, 5)));

        // Far below: no hit
        let far = target + Vec2::new(0.0, BUBBLE_DIAMETER + 1.0);
        assert_eq!(nearest_bubble_hit(far, &grid, 0), None);
    }

    #[test]
    fn test_ceiling_follows_first_row() {
        let grid = HexGrid::new();
        let pos = Vec2::new(100.0, cell_center(2, 0, 2).y - 1.0);
        assert_eq!(
            check_collision(pos, &grid, 2).map(|c| c.kind),
            Some(CollisionKind::Ceiling)
        );
        assert!(check_collision(pos, &grid, 1).is_none());
    }
}

//! Landing resolution: snap-to-cell, color matches, orphan sweep, scoring
//!
//! Both flood-fills are breadth-first with visited sets keyed by grid
//! position, so results never depend on iteration order.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

use super::collision::{Collision, CollisionKind};
use super::grid::{Bubble, Cell, Color, HexGrid};
use super::hex::{cell_center, column_under, hex_cells, is_shifted, neighbors};
use super::scoring::ColorScore;
use crate::consts::*;
use crate::error::GridError;

/// Smallest cluster that pops
pub const MIN_MATCH: usize = 3;

/// Snap distances closer than this count as a tie
const SNAP_TIE_EPSILON: f32 = 1e-3;

/// Everything a single landed shot did to the field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Where the shot came to rest
    pub landed: Cell,
    /// Popped same-color cluster (empty when fewer than three matched)
    pub matched: Vec<Bubble>,
    /// Bubbles that lost their anchor and fell
    pub orphans: Vec<Bubble>,
    /// Points earned by this shot
    pub points: u64,
}

impl Resolution {
    pub fn popped(&self) -> bool {
        !self.matched.is_empty()
    }
}

/// Pick the empty hex cell around `around` nearest to `point`
///
/// Ties go to the smallest row, then the smallest column.
fn nearest_free_cell(grid: &HexGrid, around: Cell, point: Vec2, first_row: i32) -> Option<Cell> {
    hex_cells(around.0, around.1, first_row)
        .into_iter()
        .filter(|&(row, col)| row >= first_row && !grid.contains(row, col))
        .map(|(row, col)| ((row, col), cell_center(row, col, first_row).distance(point)))
        .min_by(|a, b| {
            if (a.1 - b.1).abs() < SNAP_TIE_EPSILON {
                a.0.cmp(&b.0)
            } else {
                a.1.total_cmp(&b.1)
            }
        })
        .map(|(cell, _)| cell)
}

/// Resolve a continuous collision point to the cell the bubble settles in
pub fn snap_to_cell(grid: &HexGrid, hit: &Collision, first_row: i32) -> Result<Cell, GridError> {
    let around = match hit.kind {
        CollisionKind::Bubble(cell) => cell,
        CollisionKind::Ceiling => {
            let col = column_under(hit.point.x, first_row, first_row);
            if !grid.contains(first_row, col) {
                return Ok((first_row, col));
            }
            (first_row, col)
        }
    };

    nearest_free_cell(grid, around, hit.point, first_row).ok_or(GridError::Conflict {
        row: around.0,
        col: around.1,
    })
}

/// Connected same-color cluster containing `seed` (sorted by cell)
///
/// Returns an empty set when `seed` is not occupied.
pub fn find_color_matches(grid: &HexGrid, seed: Cell, first_row: i32) -> Vec<Cell> {
    let Some(color) = grid.get(seed.0, seed.1).map(|b| &b.color) else {
        return Vec::new();
    };

    let mut visited: HashSet<Cell> = HashSet::from([seed]);
    let mut queue: VecDeque<Cell> = VecDeque::from([seed]);

    while let Some((row, col)) = queue.pop_front() {
        for next in neighbors(grid, row, col, first_row) {
            let same = grid.get(next.0, next.1).is_some_and(|b| &b.color == color);
            if same && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    let mut cluster: Vec<Cell> = visited.into_iter().collect();
    cluster.sort_unstable();
    cluster
}

/// Cells structurally attached to the field frame
///
/// Every bubble in the ceiling row, plus bubbles in either edge column on rows
/// that are even relative to the ceiling.
pub fn anchor_cells(grid: &HexGrid, first_row: i32) -> Vec<Cell> {
    grid.sorted_cells()
        .into_iter()
        .filter(|&(row, col)| {
            row == first_row
                || ((col == 0 || col == MAXWIDTH - 1) && !is_shifted(row, first_row))
        })
        .collect()
}

/// Bubbles not connected to any anchor through occupied cells (sorted)
pub fn find_orphans(grid: &HexGrid, first_row: i32) -> Vec<Cell> {
    let anchors = anchor_cells(grid, first_row);
    let mut reached: HashSet<Cell> = anchors.iter().copied().collect();
    let mut queue: VecDeque<Cell> = anchors.into_iter().collect();

    while let Some((row, col)) = queue.pop_front() {
        for next in neighbors(grid, row, col, first_row) {
            if reached.insert(next) {
                queue.push_back(next);
            }
        }
    }

    grid.sorted_cells()
        .into_iter()
        .filter(|cell| !reached.contains(cell))
        .collect()
}

fn remove_all(grid: &mut HexGrid, cells: &[Cell]) -> Vec<Bubble> {
    cells
        .iter()
        .filter_map(|&(row, col)| grid.remove(row, col))
        .collect()
}

/// Place a landed shot and apply pops, orphan drops and scoring
pub fn resolve_landing(
    grid: &mut HexGrid,
    color: Color,
    hit: &Collision,
    first_row: i32,
    scores: &ColorScore,
) -> Result<Resolution, GridError> {
    let landed = snap_to_cell(grid, hit, first_row)?;
    grid.place(Bubble::new(landed.0, landed.1, color))?;

    let cluster = find_color_matches(grid, landed, first_row);
    if cluster.len() < MIN_MATCH {
        return Ok(Resolution {
            landed,
            ..Default::default()
        });
    }

    let matched = remove_all(grid, &cluster);
    let orphaned = find_orphans(grid, first_row);
    let orphans = remove_all(grid, &orphaned);

    let bonus: u64 = orphans.iter().map(|b| scores.get(&b.color)).sum();
    let points = MATCH_POINTS * matched.len() as u64 + ORPHAN_MULTIPLIER * bonus;

    log::debug!(
        "Shot at {:?}: {} matched, {} orphaned, +{} points",
        landed,
        matched.len(),
        orphans.len(),
        points
    );

    Ok(Resolution {
        landed,
        matched,
        orphans,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_from(cells: &[(i32, i32, &str)]) -> HexGrid {
        let mut grid = HexGrid::new();
        for &(row, col, color) in cells {
            grid.place(Bubble::new(row, col, Color::new(color))).unwrap();
        }
        grid
    }

    fn bubble_hit(grid: &HexGrid, cell: Cell, offset: Vec2) -> Collision {
        assert!(grid.contains(cell.0, cell.1));
        Collision {
            kind: CollisionKind::Bubble(cell),
            point: cell_center(cell.0, cell.1, 0) + offset,
        }
    }

    #[test]
    fn test_snap_below_hit_bubble() {
        let grid = grid_from(&[(0, 5, "red")]);
        // Straight below (0,5): even row, so (1,4) and (1,5) are the lower cells
        let hit = bubble_hit(&grid, (0, 5), Vec2::new(-10.0, 30.0));
        assert_eq!(snap_to_cell(&grid, &hit, 0).unwrap(), (1, 4));

        let hit = bubble_hit(&grid, (0, 5), Vec2::new(10.0, 30.0));
        assert_eq!(snap_to_cell(&grid, &hit, 0).unwrap(), (1, 5));
    }

    #[test]
    fn test_snap_beside_hit_bubble() {
        let grid = grid_from(&[(0, 5, "red")]);
        let hit = bubble_hit(&grid, (0, 5), Vec2::new(-34.0, 2.0));
        assert_eq!(snap_to_cell(&grid, &hit, 0).unwrap(), (0, 4));
    }

    #[test]
    fn test_snap_uses_first_row_parity() {
        // With first_row = 1, row 2 is odd: its lower cells are (3,5) and (3,6)
        let grid = grid_from(&[(2, 5, "red")]);
        let hit = Collision {
            kind: CollisionKind::Bubble((2, 5)),
            point: cell_center(2, 5, 1) + Vec2::new(10.0, 30.0),
        };
        assert_eq!(snap_to_cell(&grid, &hit, 1).unwrap(), (3, 6));
    }

    #[test]
    fn test_snap_never_above_ceiling() {
        let grid = grid_from(&[(2, 5, "red")]);
        // Point above the hit bubble, but row 1 is above first_row = 2
        let hit = Collision {
            kind: CollisionKind::Bubble((2, 5)),
            point: cell_center(2, 5, 2) + Vec2::new(0.0, -30.0),
        };
        let (row, _) = snap_to_cell(&grid, &hit, 2).unwrap();
        assert!(row >= 2);
    }

    #[test]
    fn test_snap_ceiling_lands_in_first_row() {
        let grid = HexGrid::new();
        let hit = Collision {
            kind: CollisionKind::Ceiling,
            point: Vec2::new(cell_center(0, 7, 0).x + 3.0, 10.0),
        };
        assert_eq!(snap_to_cell(&grid, &hit, 0).unwrap(), (0, 7));
    }

    #[test]
    fn test_snap_surrounded_is_conflict() {
        let mut cells = vec![(4, 5, "red")];
        for (r, c) in hex_cells(4, 5, 0) {
            cells.push((r, c, "blue"));
        }
        let grid = grid_from(&cells);
        let hit = bubble_hit(&grid, (4, 5), Vec2::new(0.0, 10.0));
        assert_eq!(
            snap_to_cell(&grid, &hit, 0),
            Err(GridError::Conflict { row: 4, col: 5 })
        );
    }

    #[test]
    fn test_snap_tie_prefers_upper_row() {
        // From the hit bubble's own center every free neighbor is one diameter away
        let grid = grid_from(&[(4, 5, "red"), (3, 4, "blue"), (4, 4, "blue"), (4, 6, "blue")]);
        let hit = bubble_hit(&grid, (4, 5), Vec2::ZERO);
        // (3,5) above and (5,4)/(5,5) below are free
        assert_eq!(snap_to_cell(&grid, &hit, 0).unwrap(), (3, 5));
    }

    #[test]
    fn test_snap_tie_prefers_left_column() {
        let grid = grid_from(&[(4, 5, "red"), (3, 4, "blue"), (3, 5, "blue")]);
        let hit = bubble_hit(&grid, (4, 5), Vec2::ZERO);
        // (4,4) and (4,6) share the row and the distance
        assert_eq!(snap_to_cell(&grid, &hit, 0).unwrap(), (4, 4));
    }

    #[test]
    fn test_find_color_matches_follows_hex_links() {
        // (1,3) is odd: its diagonal neighbors are (0,4) and (2,4)
        let grid = grid_from(&[
            (0, 4, "red"),
            (1, 3, "red"),
            (2, 4, "red"),
            (2, 2, "red"), // not adjacent to (1,3) on an odd row
            (1, 4, "blue"),
        ]);
        assert_eq!(
            find_color_matches(&grid, (1, 3), 0),
            vec![(0, 4), (1, 3), (2, 4)]
        );
        assert_eq!(find_color_matches(&grid, (1, 4), 0), vec![(1, 4)]);
        assert!(find_color_matches(&grid, (9, 9), 0).is_empty());
    }

    #[test]
    fn test_find_orphans() {
        let grid = grid_from(&[
            (0, 3, "red"),
            (1, 3, "blue"),
            (2, 3, "green"),
            // Floating pair
            (5, 6, "red"),
            (5, 7, "blue"),
            // Edge column on even row: anchored to the wall
            (6, 0, "green"),
            // Edge column on odd row: not an anchor
            (7, 11, "red"),
        ]);
        assert_eq!(find_orphans(&grid, 0), vec![(5, 6), (5, 7), (7, 11)]);
    }

    #[test]
    fn test_resolve_three_match_scores_45() {
        let mut grid = grid_from(&[(0, 4, "red"), (0, 5, "red"), (0, 8, "blue")]);
        let scores = ColorScore::from_bubbles(grid.iter());
        let hit = Collision {
            kind: CollisionKind::Bubble((0, 5)),
            point: cell_center(0, 6, 0) + Vec2::new(-2.0, 0.0),
        };

        let res = resolve_landing(&mut grid, Color::new("red"), &hit, 0, &scores).unwrap();
        assert_eq!(res.landed, (0, 6));
        assert_eq!(res.matched.len(), 3);
        assert!(res.orphans.is_empty());
        assert_eq!(res.points, 45);
        assert!(!grid.has_color(&Color::new("red")));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_resolve_no_match_keeps_bubble() {
        let mut grid = grid_from(&[(0, 4, "red"), (0, 5, "blue")]);
        let scores = ColorScore::from_bubbles(grid.iter());
        let hit = Collision {
            kind: CollisionKind::Bubble((0, 5)),
            point: cell_center(0, 6, 0),
        };
        let res = resolve_landing(&mut grid, Color::new("red"), &hit, 0, &scores).unwrap();
        assert!(!res.popped());
        assert_eq!(res.points, 0);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.get(0, 6).unwrap().color, Color::new("red"));
    }

    #[test]
    fn test_resolve_drops_orphans_with_bonus() {
        // Blue chain hangs from the red pair at the ceiling
        let mut grid = grid_from(&[
            (0, 4, "red"),
            (0, 5, "red"),
            (1, 4, "blue"),
            (2, 4, "blue"),
            (0, 9, "green"),
        ]);
        let scores = ColorScore::from_bubbles(grid.iter());
        // Three colors: green is rarest
        assert_eq!(scores.get(&Color::new("green")), 30);
        assert_eq!(scores.get(&Color::new("blue")), 15);

        let hit = Collision {
            kind: CollisionKind::Ceiling,
            point: Vec2::new(cell_center(0, 6, 0).x, 10.0),
        };
        let res = resolve_landing(&mut grid, Color::new("red"), &hit, 0, &scores).unwrap();
        assert_eq!(res.landed, (0, 6));
        assert_eq!(res.matched.len(), 3);
        assert_eq!(res.orphans.len(), 2);
        assert_eq!(res.points, 15 * 3 + 3 * (15 + 15));
        assert_eq!(grid.len(), 1);
        assert!(grid.contains(0, 9));
    }

    #[test]
    fn test_resolve_orphan_bonus_uses_rarity() {
        // Green is the rarest of three colors and hangs under the red pair
        let mut grid = grid_from(&[
            (0, 4, "red"),
            (0, 5, "red"),
            (1, 4, "blue"),
            (2, 4, "green"),
            (0, 9, "blue"),
            (0, 10, "blue"),
        ]);
        let scores = ColorScore::from_bubbles(grid.iter());
        assert_eq!(scores.get(&Color::new("green")), 30);

        let hit = Collision {
            kind: CollisionKind::Ceiling,
            point: Vec2::new(cell_center(0, 6, 0).x, 10.0),
        };
        let res = resolve_landing(&mut grid, Color::new("red"), &hit, 0, &scores).unwrap();
        assert_eq!(res.matched.len(), 3);
        assert_eq!(res.orphans.len(), 2);
        assert_eq!(res.points, 15 * 3 + 3 * (15 + 30));
        assert_eq!(grid.sorted_cells(), vec![(0, 9), (0, 10)]);
    }

    fn arb_grid() -> impl Strategy<Value = HexGrid> {
        let colors = prop_oneof![Just("red"), Just("blue"), Just("green")];
        prop::collection::hash_map((0..10i32, 0..MAXWIDTH), colors, 0..80).prop_map(|cells| {
            let mut grid = HexGrid::new();
            for ((row, col), color) in cells {
                grid.place(Bubble::new(row, col, Color::new(color))).unwrap();
            }
            grid
        })
    }

    proptest! {
        #[test]
        fn prop_matches_independent_of_seed(grid in arb_grid(), first_row in 0i32..3) {
            for cell in grid.sorted_cells() {
                let cluster = find_color_matches(&grid, cell, first_row);
                prop_assert!(cluster.contains(&cell));
                prop_assert_eq!(&cluster, &find_color_matches(&grid, cell, first_row));
                for &member in &cluster {
                    prop_assert_eq!(&find_color_matches(&grid, member, first_row), &cluster);
                }
            }
        }

        #[test]
        fn prop_orphans_never_reachable_from_ceiling(grid in arb_grid(), first_row in 0i32..3) {
            let orphans: HashSet<Cell> = find_orphans(&grid, first_row).into_iter().collect();
            // Anything flood-reachable from the ceiling row must survive
            let mut seen: HashSet<Cell> = HashSet::new();
            let mut queue: VecDeque<Cell> = grid
                .sorted_cells()
                .into_iter()
                .filter(|&(row, _)| row == first_row)
                .collect();
            while let Some(cell) = queue.pop_front() {
                if !seen.insert(cell) {
                    continue;
                }
                prop_assert!(!orphans.contains(&cell));
                queue.extend(neighbors(&grid, cell.0, cell.1, first_row));
            }
        }
    }
}

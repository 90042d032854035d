//! Rarity-based color bonus table
//!
//! Computed once from the bubbles present at level start. Only the orphan
//! bonus uses it; direct matches always score a flat rate.

use std::collections::BTreeMap;

use super::grid::{Bubble, Color};

/// Bonus for the rarest color when the level has more than 4 colors
pub const RAREST_BONUS: u64 = 45;
/// Bonus for the second rarest (or the rarest when 3-4 colors)
pub const RARE_BONUS: u64 = 30;
/// Bonus for every other color
pub const BASE_BONUS: u64 = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorScore {
    values: BTreeMap<Color, u64>,
}

impl ColorScore {
    pub fn from_bubbles<'a>(bubbles: impl IntoIterator<Item = &'a Bubble>) -> Self {
        let mut counts: BTreeMap<&Color, usize> = BTreeMap::new();
        for bubble in bubbles {
            *counts.entry(&bubble.color).or_insert(0) += 1;
        }

        // Rarest first; equal counts fall back to color order
        let mut ranked: Vec<(&Color, usize)> = counts.into_iter().collect();
        ranked.sort_by_key(|&(_, count)| count);

        let special: &[u64] = if ranked.len() > 4 {
            &[RAREST_BONUS, RARE_BONUS]
        } else if ranked.len() > 2 {
            &[RARE_BONUS]
        } else {
            &[]
        };

        let values = ranked
            .iter()
            .enumerate()
            .map(|(i, &(color, _))| {
                let bonus = special.get(i).copied().unwrap_or(BASE_BONUS);
                (color.clone(), bonus)
            })
            .collect();

        Self { values }
    }

    /// Bonus for a color; colors absent from the initial field get the base bonus
    pub fn get(&self, color: &Color) -> u64 {
        self.values.get(color).copied().unwrap_or(BASE_BONUS)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//! Periodic field advance
//!
//! Every resolved shot bumps a counter. The third and fourth shots shake the
//! field (magnitude 1, then 2) as a warning; the fifth pushes every bubble one
//! row down and moves the ceiling with it. Shake timing is stored as remaining
//! ticks, so resetting the advancer drops any pending transition.

use serde::{Deserialize, Serialize};

use super::grid::{Cell, HexGrid};
use crate::error::GridError;

/// Shots that trigger the first warning shake
pub const FIRST_SHAKE_AT: u32 = 3;
/// Shots that trigger the stronger shake
pub const SECOND_SHAKE_AT: u32 = 4;
/// Shots that trigger the row drop
pub const ADVANCE_AT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdvancePhase {
    #[default]
    Idle,
    /// Field nudged right by `magnitude`; returns when `ticks_left` runs out
    ShakeRight { magnitude: i32, ticks_left: u32 },
    /// Field nudged back; settles to Idle when `ticks_left` runs out
    ShakeLeft { magnitude: i32, ticks_left: u32 },
    /// Row drop pending for the next tick
    Advancing,
}

/// Side effects of the advancer for the session to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceEvent {
    /// Horizontal visual nudge, in field units
    Nudge(i32),
    /// Every bubble moved one row down; the ceiling is now `first_row`
    Advanced {
        moves: Vec<(Cell, Cell)>,
        first_row: i32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldAdvancer {
    pub phase: AdvancePhase,
    pub drop_counter: u32,
    half_cycle_ticks: u32,
}

impl FieldAdvancer {
    pub fn new(half_cycle_ticks: u32) -> Self {
        Self {
            phase: AdvancePhase::Idle,
            drop_counter: 0,
            half_cycle_ticks: half_cycle_ticks.max(1),
        }
    }

    /// Count a resolved shot and start a shake or a pending advance
    pub fn on_shot_resolved(&mut self) -> Option<AdvanceEvent> {
        self.drop_counter += 1;
        match self.drop_counter {
            FIRST_SHAKE_AT => Some(self.start_shake(1)),
            SECOND_SHAKE_AT => Some(self.start_shake(2)),
            n if n >= ADVANCE_AT => {
                self.drop_counter = 0;
                self.phase = AdvancePhase::Advancing;
                None
            }
            _ => None,
        }
    }

    fn start_shake(&mut self, magnitude: i32) -> AdvanceEvent {
        self.phase = AdvancePhase::ShakeRight {
            magnitude,
            ticks_left: self.half_cycle_ticks,
        };
        AdvanceEvent::Nudge(magnitude)
    }

    /// Step the state machine one tick; performs the row drop when pending
    pub fn tick(
        &mut self,
        grid: &mut HexGrid,
        first_row: &mut i32,
    ) -> Result<Option<AdvanceEvent>, GridError> {
        match self.phase {
            AdvancePhase::Idle => Ok(None),
            AdvancePhase::ShakeRight {
                magnitude,
                ticks_left,
            } => {
                if ticks_left > 1 {
                    self.phase = AdvancePhase::ShakeRight {
                        magnitude,
                        ticks_left: ticks_left - 1,
                    };
                    return Ok(None);
                }
                self.phase = AdvancePhase::ShakeLeft {
                    magnitude,
                    ticks_left: self.half_cycle_ticks,
                };
                Ok(Some(AdvanceEvent::Nudge(-magnitude)))
            }
            AdvancePhase::ShakeLeft {
                magnitude,
                ticks_left,
            } => {
                self.phase = if ticks_left > 1 {
                    AdvancePhase::ShakeLeft {
                        magnitude,
                        ticks_left: ticks_left - 1,
                    }
                } else {
                    AdvancePhase::Idle
                };
                Ok(None)
            }
            AdvancePhase::Advancing => {
                self.phase = AdvancePhase::Idle;
                let moves = grid.shift_down()?;
                *first_row += 1;
                log::info!("Field advanced, ceiling now at row {}", first_row);
                Ok(Some(AdvanceEvent::Advanced {
                    moves,
                    first_row: *first_row,
                }))
            }
        }
    }

    /// Current horizontal shake offset of the field
    pub fn shake_offset(&self) -> i32 {
        match self.phase {
            AdvancePhase::ShakeRight { magnitude, .. } => magnitude,
            _ => 0,
        }
    }

    /// Drop the counter and any pending shake or advance
    pub fn reset(&mut self) {
        self.phase = AdvancePhase::Idle;
        self.drop_counter = 0;
    }
}

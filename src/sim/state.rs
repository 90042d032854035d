//! Game session state
//!
//! Every piece of mutable simulation state lives in `GameSession`. Renderers
//! and input handlers only read from it or hand aim points to `tick`.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::advance::FieldAdvancer;
use super::grid::{Cell, Color, HexGrid};
use super::hex::{cell_center, ceiling_marker_y};
use super::projectile::Projectile;
use super::scoring::ColorScore;
use crate::consts::*;
use crate::error::{GridError, LevelError};
use crate::launcher_position;
use crate::level::Level;
use crate::settings::Settings;

/// Events kept for a host that never drains; the oldest are dropped first
pub const MAX_QUEUED_EVENTS: usize = 1024;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded (start-up or after reset)
    Menu,
    /// Waiting for an aim point
    Ready,
    /// A shot is travelling
    InFlight,
    /// Short pause after a landed shot
    Settling { ticks_left: u32 },
    /// Win or lose reached
    GameOver,
    /// A grid invariant was violated; the session is dead
    Faulted,
}

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    None,
    Win,
    Lose,
}

/// Notifications for the rendering collaborator
///
/// Per-tick projectile motion is not queued; read `GameSession::projectile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BubblePlaced { row: i32, col: i32, color: Color, pos: Vec2 },
    BubbleMoved { from: Cell, to: Cell, pos: Vec2 },
    BubblePopped { row: i32, col: i32 },
    BubbleDropped { row: i32, col: i32 },
    ProjectileFired { color: Color, vel: Vec2 },
    /// Upcoming bubbles changed
    Loaded { current: Option<Color>, next: Option<Color> },
    /// Horizontal shake nudge of the whole field
    FieldNudged { dx: i32 },
    CeilingAdvanced { first_row: i32, marker_y: f32 },
    ScoreChanged { score: u64 },
    OutcomeReached(Outcome),
    /// Grid emptied by a reset
    FieldCleared,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    pub settings: Settings,
    level: Level,
    pub(crate) grid: HexGrid,
    pub(crate) scores: ColorScore,
    pub(crate) first_row: i32,
    pub(crate) advancer: FieldAdvancer,
    pub(crate) projectile: Option<Projectile>,
    pub(crate) current: Option<Color>,
    pub(crate) next: Option<Color>,
    pub(crate) score: u64,
    pub(crate) outcome: Outcome,
    pub(crate) phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    events: VecDeque<GameEvent>,
}

impl GameSession {
    /// Create a session for a level; starts in the menu until `play`
    pub fn new(level: Level, settings: Settings) -> Result<Self, LevelError> {
        level.validate()?;
        let settings = settings.sanitized();
        Ok(Self {
            advancer: FieldAdvancer::new(settings.shake_half_cycle_ticks),
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            level,
            grid: HexGrid::new(),
            scores: ColorScore::default(),
            first_row: 0,
            projectile: None,
            current: None,
            next: None,
            score: 0,
            outcome: Outcome::None,
            phase: GamePhase::Menu,
            time_ticks: 0,
            events: VecDeque::new(),
        })
    }

    /// Load the level onto a fresh field and get ready for the first shot
    pub fn play(&mut self) -> Result<(), GridError> {
        self.reset();
        self.grid = self.level.to_grid()?;
        self.scores = ColorScore::from_bubbles(self.grid.iter());
        self.rng = Pcg32::seed_from_u64(self.settings.seed);

        let placed: Vec<GameEvent> = self
            .grid
            .sorted_cells()
            .into_iter()
            .filter_map(|(row, col)| {
                self.grid.get(row, col).map(|bubble| GameEvent::BubblePlaced {
                    row,
                    col,
                    color: bubble.color.clone(),
                    pos: cell_center(row, col, self.first_row),
                })
            })
            .collect();
        for event in placed {
            self.push_event(event);
        }

        self.current = self.draw_color();
        self.next = self.draw_color();
        self.push_loaded();
        self.phase = GamePhase::Ready;

        log::info!(
            "Level started: {} bubbles, {} colors",
            self.grid.len(),
            self.scores.len()
        );
        Ok(())
    }

    /// Back to the menu: empty field, zero score, no pending transitions
    pub fn reset(&mut self) {
        self.grid.clear();
        self.scores = ColorScore::default();
        self.first_row = 0;
        self.advancer.reset();
        self.projectile = None;
        self.current = None;
        self.next = None;
        self.score = 0;
        self.outcome = Outcome::None;
        self.phase = GamePhase::Menu;
        self.events.clear();
        self.push_event(GameEvent::FieldCleared);
    }

    /// Launch the current bubble toward `aim`
    ///
    /// Ignored (returns false) unless the session is ready for a shot.
    pub fn fire(&mut self, aim: Vec2) -> bool {
        if self.phase != GamePhase::Ready || self.outcome != Outcome::None {
            return false;
        }
        let Some(color) = self.current.clone() else {
            return false;
        };
        let Some(projectile) = Projectile::fire(
            color,
            launcher_position(),
            aim,
            self.settings.projectile_speed,
        ) else {
            log::debug!("Ignoring aim point {:?}", aim);
            return false;
        };

        log::debug!("Fired {} toward {:?}", projectile.color, aim);
        self.push_event(GameEvent::ProjectileFired {
            color: projectile.color.clone(),
            vel: projectile.vel,
        });
        self.current = None;
        self.projectile = Some(projectile);
        self.phase = GamePhase::InFlight;
        true
    }

    /// Random color from the live palette
    pub(crate) fn draw_color(&mut self) -> Option<Color> {
        let palette: Vec<&Color> = self.grid.colors().collect();
        if palette.is_empty() {
            return None;
        }
        let i = self.rng.random_range(0..palette.len());
        Some(palette[i].clone())
    }

    /// Promote the next bubble, redrawing any color that left the field
    pub(crate) fn rotate_queue(&mut self) {
        let promoted = self.next.take().filter(|c| self.grid.has_color(c));
        self.current = match promoted {
            Some(color) => Some(color),
            None => self.draw_color(),
        };
        self.next = self.draw_color();
        self.push_loaded();
    }

    fn push_loaded(&mut self) {
        let event = GameEvent::Loaded {
            current: self.current.clone(),
            next: self.next.clone(),
        };
        self.push_event(event);
    }

    /// Record a terminal outcome if the field is empty or has reached the bottom
    ///
    /// The first outcome sticks. Returns the (possibly unchanged) outcome.
    pub(crate) fn evaluate_outcome(&mut self) -> Outcome {
        if self.outcome != Outcome::None {
            return self.outcome;
        }
        let outcome = if self.grid.is_empty() {
            Outcome::Win
        } else if self.grid.lowest_row().is_some_and(|row| row >= LOSE_ROW) {
            Outcome::Lose
        } else {
            Outcome::None
        };

        if outcome != Outcome::None {
            log::info!("Game over: {:?} with score {}", outcome, self.score);
            self.outcome = outcome;
            self.push_event(GameEvent::OutcomeReached(outcome));
        }
        outcome
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub(crate) fn ceiling_event(&self) -> GameEvent {
        GameEvent::CeilingAdvanced {
            first_row: self.first_row,
            marker_y: ceiling_marker_y(self.first_row),
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn first_row(&self) -> i32 {
        self.first_row
    }

    pub fn drop_counter(&self) -> u32 {
        self.advancer.drop_counter
    }

    pub fn advancer(&self) -> &FieldAdvancer {
        &self.advancer
    }

    pub fn color_scores(&self) -> &ColorScore {
        &self.scores
    }

    /// Bubble waiting in the launcher
    pub fn current_color(&self) -> Option<&Color> {
        self.current.as_ref()
    }

    /// Bubble shown as "next"
    pub fn next_color(&self) -> Option<&Color> {
        self.next.as_ref()
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    /// Horizontal shake offset to apply when drawing the field
    pub fn shake_offset(&self) -> i32 {
        self.advancer.shake_offset()
    }
}

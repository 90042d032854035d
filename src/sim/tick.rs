//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use glam::Vec2;

use super::advance::AdvanceEvent;
use super::hex::cell_center;
use super::matching::resolve_landing;
use super::projectile::FlightStep;
use super::state::{GameEvent, GamePhase, GameSession, Outcome};
use crate::error::GridError;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Aim point for a new shot (field coordinates), from a click
    pub aim: Option<Vec2>,
}

/// Advance the session by one fixed timestep
///
/// A grid fault ends the session: the phase becomes `Faulted` and the error
/// is returned. Later ticks are no-ops.
pub fn tick(session: &mut GameSession, input: &TickInput) -> Result<(), GridError> {
    match session.phase {
        GamePhase::Menu | GamePhase::GameOver | GamePhase::Faulted => return Ok(()),
        _ => {}
    }

    session.time_ticks += 1;

    if let Err(e) = step(session, input) {
        log::error!("Session aborted: {}", e);
        session.phase = GamePhase::Faulted;
        return Err(e);
    }
    Ok(())
}

fn step(session: &mut GameSession, input: &TickInput) -> Result<(), GridError> {
    // Terminal state from a previous mutation blocks new shots
    session.evaluate_outcome();

    if let Some(aim) = input.aim {
        session.fire(aim);
    }

    match session.phase {
        GamePhase::InFlight => fly(session)?,
        GamePhase::Settling { ticks_left } => {
            session.phase = if ticks_left > 1 {
                GamePhase::Settling {
                    ticks_left: ticks_left - 1,
                }
            } else {
                GamePhase::Ready
            };
        }
        _ => {}
    }

    // The field freezes once an outcome is known
    if session.outcome == Outcome::None {
        if let Some(event) = session
            .advancer
            .tick(&mut session.grid, &mut session.first_row)?
        {
            apply_advance_event(session, event);
            session.evaluate_outcome();
        }
    }

    // An in-flight shot always finishes before the game ends
    if session.outcome != Outcome::None && session.phase != GamePhase::InFlight {
        session.phase = GamePhase::GameOver;
    }
    Ok(())
}

/// Move the projectile one step and resolve it if it landed
fn fly(session: &mut GameSession) -> Result<(), GridError> {
    let Some(projectile) = session.projectile.as_mut() else {
        session.phase = GamePhase::Ready;
        return Ok(());
    };

    let hit = match projectile.advance(&session.grid, session.first_row) {
        FlightStep::Moving(_) => return Ok(()),
        FlightStep::Landed(hit) => hit,
    };

    let Some(projectile) = session.projectile.take() else {
        return Ok(());
    };
    let first_row = session.first_row;
    let color = projectile.color;
    let resolution = resolve_landing(
        &mut session.grid,
        color.clone(),
        &hit,
        first_row,
        &session.scores,
    )?;

    let (row, col) = resolution.landed;
    session.push_event(GameEvent::BubblePlaced {
        row,
        col,
        color,
        pos: cell_center(row, col, first_row),
    });
    for bubble in &resolution.matched {
        session.push_event(GameEvent::BubblePopped {
            row: bubble.row,
            col: bubble.col,
        });
    }
    for bubble in &resolution.orphans {
        session.push_event(GameEvent::BubbleDropped {
            row: bubble.row,
            col: bubble.col,
        });
    }
    if resolution.points > 0 {
        session.score += resolution.points;
        session.push_event(GameEvent::ScoreChanged {
            score: session.score,
        });
    }

    if let Some(event) = session.advancer.on_shot_resolved() {
        apply_advance_event(session, event);
    }

    session.rotate_queue();
    session.phase = if session.settings.settle_ticks > 0 {
        GamePhase::Settling {
            ticks_left: session.settings.settle_ticks,
        }
    } else {
        GamePhase::Ready
    };
    session.evaluate_outcome();
    Ok(())
}

fn apply_advance_event(session: &mut GameSession, event: AdvanceEvent) {
    match event {
        AdvanceEvent::Nudge(dx) => session.push_event(GameEvent::FieldNudged { dx }),
        AdvanceEvent::Advanced { moves, first_row } => {
            for (from, to) in moves {
                session.push_event(GameEvent::BubbleMoved {
                    from,
                    to,
                    pos: cell_center(to.0, to.1, first_row),
                });
            }
            let ceiling = session.ceiling_event();
            session.push_event(ceiling);
        }
    }
}

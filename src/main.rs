//! Bubble Buster entry point
//!
//! Headless runner: loads a level file, plays one level with a simple aim bot
//! and logs what happens. Useful for replaying seeds and profiling the sim.
//!
//! Usage: `bubble-buster [levels.json] [level-number]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

#[cfg(not(target_arch = "wasm32"))]
use bubble_buster::{
    LevelSet, Settings, launcher_position,
    sim::{GameEvent, GamePhase, GameSession, TickInput, cell_center, tick},
};
#[cfg(not(target_arch = "wasm32"))]
use glam::Vec2;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_LEVELS: &str = "levels/levels.json";
#[cfg(not(target_arch = "wasm32"))]
const SETTINGS_FILE: &str = "settings.json";
/// Hard stop for runs that never finish (about 100 s of simulated time)
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 10_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubble Buster (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; the library is driven by the host page
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let levels_path = args.next().unwrap_or_else(|| DEFAULT_LEVELS.to_string());
    let number: usize = match args.next() {
        Some(arg) => arg.parse()?,
        None => 1,
    };

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let levels = LevelSet::load(Path::new(&levels_path))?;
    let level = levels.level(number)?.clone();

    let mut session = GameSession::new(level, settings)?;
    session.play()?;
    log::info!("Playing level {} (seed {:#x})", number, session.settings.seed);

    let mut shots = 0u32;
    while session.time_ticks < MAX_TICKS {
        let input = match session.phase() {
            GamePhase::Ready => {
                shots += 1;
                TickInput {
                    aim: Some(bot_aim(&session)),
                }
            }
            GamePhase::GameOver | GamePhase::Faulted => break,
            _ => TickInput::default(),
        };
        tick(&mut session, &input)?;

        for event in session.drain_events() {
            match event {
                GameEvent::CeilingAdvanced { first_row, .. } => {
                    log::info!("Ceiling advanced to row {}", first_row);
                }
                GameEvent::ScoreChanged { score } => log::debug!("Score: {}", score),
                GameEvent::OutcomeReached(outcome) => log::info!("Outcome: {:?}", outcome),
                _ => {}
            }
        }
    }

    println!(
        "level {}: {:?} after {} shots, score {}, {} bubbles left",
        number,
        session.outcome(),
        shots,
        session.score(),
        session.grid().len()
    );
    Ok(())
}

/// Aim at the lowest bubble sharing the launcher color, else sweep the field
#[cfg(not(target_arch = "wasm32"))]
fn bot_aim(session: &GameSession) -> Vec2 {
    let origin = launcher_position();
    let target = session.current_color().and_then(|color| {
        session
            .grid()
            .iter()
            .filter(|b| &b.color == color)
            .max_by_key(|b| (b.row, -b.col))
            .map(|b| cell_center(b.row, b.col, session.first_row()))
    });

    match target {
        // Keep the shot pointing clearly upward
        Some(pos) if pos.y < origin.y - 40.0 => pos,
        _ => {
            let sweep = (session.time_ticks as f32 * 0.37).sin();
            origin + Vec2::new(sweep * 200.0, -400.0)
        }
    }
}

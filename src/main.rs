//! Puck Rally entry point
//!
//! Native builds run a headless match: a scripted pointer plays the bottom
//! mallet against the AI (or against a second script in multiplayer) and the
//! events are logged. Usage: `puck-rally [settings.json]`.

#[cfg(not(target_arch = "wasm32"))]
use puck_rally::sim::{GameState, PointerSample, TickInput};

/// Longest demo match, in rendered frames (ten minutes at 60 fps)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use puck_rally::{Screen, Session, Settings};

    env_logger::init();
    log::info!("Puck Rally (native, headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json(&json),
            Err(err) => {
                log::warn!("Could not read settings from {path} ({err}), using defaults");
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    log::info!("Settings: {}", settings.to_json());

    let mut session = Session::new(settings.clone());
    session.finish_loading();
    session.start(settings.mode);

    // Slightly uneven frame times exercise the fixed stepper
    let frame_times = [1.0 / 60.0, 1.0 / 58.0, 1.0 / 62.0];
    let mut frames = 0;
    while session.screen() == Screen::Playing && frames < MAX_FRAMES {
        let Some(game) = session.game() else {
            break;
        };
        let input = scripted_input(game);
        let dt = frame_times[frames as usize % frame_times.len()];
        for event in session.update(&input, dt) {
            log::debug!(
                "frame {frames}: {}",
                serde_json::to_string(&event).unwrap_or_default()
            );
        }
        frames += 1;
    }

    let score = session.score();
    match session.winner() {
        Some(winner) => println!(
            "{} wins {}-{} after {frames} frames",
            winner.as_str(),
            score.get(winner),
            score.get(winner.opponent())
        ),
        None => match score.leader() {
            Some(leader) => println!(
                "No winner after {frames} frames, {} leads {}-{}",
                leader.as_str(),
                score.get(leader),
                score.get(leader.opponent())
            ),
            None => println!("No winner after {frames} frames, level at {}", score.player),
        },
    }
}

/// Pointers that shadow the puck from behind each human-controlled mallet
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(game: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let Some(puck) = game.puck() else {
        return input;
    };
    let midline = game.table.midline_y();
    let lead = puck.pos.x + puck.vel.x * 4.0;

    let player_y = (puck.pos.y + 30.0).max(midline + 1.0);
    input.pointers.push(PointerSample::moved(lead, player_y));

    if !game.mode.ai_enabled() {
        let top_y = (puck.pos.y - 30.0).min(midline);
        input.pointers.push(PointerSample::moved(lead, top_y));
    }
    input
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; the headless demo is native only
}

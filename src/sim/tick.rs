//! Simulation tick
//!
//! One call to `tick` runs a full step: pointer routing, AI, mallet
//! clamping, collision resolution and puck integration. `FixedStepper` wraps
//! it with a fixed-timestep accumulator for reproducible runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai;
use super::body::BodyRole;
use super::collision;
use super::state::{GameState, Side};
use crate::consts::*;

/// Phase of a pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Start,
    Move,
    End,
}

/// One touch/mouse sample in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    #[serde(rename = "type")]
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Move,
            x,
            y,
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Pointer samples since the last tick, oldest first
    pub pointers: Vec<PointerSample>,
}

impl TickInput {
    pub fn with_pointer(x: f32, y: f32) -> Self {
        Self {
            pointers: vec![PointerSample::moved(x, y)],
        }
    }
}

/// Latest pointer target for each mallet. Only `move` samples count; the
/// bottom half drives the player, the top half drives player 2 when a
/// second human is playing.
fn pointer_targets(state: &GameState, input: &TickInput) -> [Option<Vec2>; 2] {
    let mut targets = [None, None];
    let midline = state.table.midline_y();
    for sample in &input.pointers {
        if sample.kind != PointerKind::Move {
            continue;
        }
        if !(sample.x.is_finite() && sample.y.is_finite()) {
            log::debug!("Dropping non-finite pointer sample {sample:?}");
            continue;
        }
        let pos = Vec2::new(sample.x, sample.y);
        if sample.y > midline {
            targets[0] = Some(pos);
        } else if !state.mode.ai_enabled() {
            targets[1] = Some(pos);
        }
    }
    targets
}

/// Where the AI wants its mallet this tick
fn ai_target(state: &mut GameState) -> Option<Vec2> {
    let puck = *state.puck()?;
    let mallet = *state.mallet(Side::Player2)?;
    let delta = ai::mallet_movement(&state.ai, &puck, &mallet, &state.table, &mut state.rng);
    Some(mallet.pos + delta)
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    step(state, input, dt, 1.0);
}

/// One tick in which pointer-driven mallets cover `share` of the remaining
/// way to their pointer
fn step(state: &mut GameState, input: &TickInput, dt: f32, share: f32) {
    if !(dt.is_finite() && dt > 0.0) {
        log::warn!("Skipping tick with invalid dt {dt}");
        return;
    }

    state.time_ticks += 1;
    state.effects.clock_ms += f64::from(dt) * 1000.0;
    let frames = dt / SIM_DT;

    let [player_target, mut opponent_target] =
        pointer_targets(state, input).map(|target| target.map(|pos| (pos, share)));
    if state.mode.ai_enabled() {
        opponent_target = ai_target(state).map(|pos| (pos, 1.0));
    }

    let table = state.table;
    for (side, target) in [(Side::Player, player_target), (Side::Player2, opponent_target)] {
        let Some(mallet) = state.body_mut(BodyRole::Mallet(side)) else {
            continue;
        };
        // Untouched mallets still get clamped and lose their velocity
        let (target, share) = target.unwrap_or((mallet.pos, 1.0));
        let radius = mallet.radius();
        let clamped = table.clamp_mallet(side, target, radius);
        let next = if share >= 1.0 {
            clamped
        } else {
            table.clamp_mallet(side, mallet.pos.lerp(clamped, share), radius)
        };
        mallet.move_to(next, frames);
    }

    if collision::resolve(state).is_none()
        && let Some(puck) = state.body_mut(BodyRole::Puck)
    {
        puck.integrate(frames);
    }

    state.normalize_order();
}

/// Fixed-timestep driver: feeds variable frame times into `SIM_DT` ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed ticks as `frame_dt` covers. Pointer movement over
    /// the frame is spread evenly across those ticks so mallet speed doesn't
    /// depend on the frame rate. Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            log::warn!("Ignoring invalid frame time {frame_dt}");
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        for i in 0..substeps {
            step(state, input, SIM_DT, 1.0 / (substeps - i) as f32);
        }
        substeps
    }

    /// Time carried over to the next frame
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{GameMode, Settings};
    use crate::sim::state::GameEvent;
    use proptest::prelude::*;

    fn settings(mode: GameMode) -> Settings {
        Settings {
            mode,
            viewport_width: 400.0,
            viewport_height: 800.0,
            seed: 42,
            ..Settings::default()
        }
    }

    // Table for a 400x800 viewport: x 20..380, y 80..720, midline 400

    #[test]
    fn test_pointer_drives_player_mallet() {
        let mut state = GameState::new(&settings(GameMode::Multiplayer));
        let start = state.mallet(Side::Player).unwrap().pos;

        tick(&mut state, &TickInput::with_pointer(150.0, 600.0), SIM_DT);

        let mallet = state.mallet(Side::Player).unwrap();
        assert_eq!(mallet.pos, Vec2::new(150.0, 600.0));
        assert_eq!(mallet.vel, Vec2::new(150.0, 600.0) - start);
    }

    #[test]
    fn test_pointer_is_clamped_to_own_half() {
        let mut state = GameState::new(&settings(GameMode::Multiplayer));
        tick(&mut state, &TickInput::with_pointer(5.0, 790.0), SIM_DT);
        let mallet = state.mallet(Side::Player).unwrap();
        assert_eq!(mallet.pos, Vec2::new(20.0 + MALLET_RADIUS, 720.0 - MALLET_RADIUS));

        tick(&mut state, &TickInput::with_pointer(500.0, 10.0), SIM_DT);
        let opponent = state.mallet(Side::Player2).unwrap();
        assert_eq!(opponent.pos, Vec2::new(380.0 - MALLET_RADIUS, 80.0 + MALLET_RADIUS));
    }

    #[test]
    fn test_only_move_samples_count() {
        let mut state = GameState::new(&settings(GameMode::Multiplayer));
        let start = state.mallet(Side::Player).unwrap().pos;
        let input = TickInput {
            pointers: vec![
                PointerSample {
                    kind: PointerKind::Start,
                    x: 100.0,
                    y: 600.0,
                },
                PointerSample {
                    kind: PointerKind::End,
                    x: 300.0,
                    y: 650.0,
                },
                PointerSample::moved(f32::NAN, 600.0),
            ],
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.mallet(Side::Player).unwrap().pos, start);
    }

    #[test]
    fn test_single_player_ignores_top_half_pointer() {
        let mut state = GameState::new(&Settings {
            seed: 7,
            ..settings(GameMode::Single)
        });
        // Park the puck in the player's half, at rest, so the AI stays home
        let puck = state.body_mut(BodyRole::Puck).unwrap();
        puck.pos = Vec2::new(200.0, 600.0);

        let before = state.mallet(Side::Player2).unwrap().pos;
        for _ in 0..10 {
            tick(&mut state, &TickInput::with_pointer(40.0, 110.0), SIM_DT);
        }
        let after = state.mallet(Side::Player2).unwrap().pos;
        // The AI may drift, but never to the corner the pointer asked for
        assert!(after.distance(Vec2::new(40.0 + MALLET_RADIUS, 80.0 + MALLET_RADIUS)) > 50.0);
        assert!(after.distance(before) < 150.0);
    }

    #[test]
    fn test_multiplayer_routes_top_half_to_player2() {
        let mut state = GameState::new(&settings(GameMode::Multiplayer));
        let input = TickInput {
            pointers: vec![
                PointerSample::moved(120.0, 200.0),
                PointerSample::moved(260.0, 650.0),
            ],
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.mallet(Side::Player2).unwrap().pos, Vec2::new(120.0, 200.0));
        assert_eq!(state.mallet(Side::Player).unwrap().pos, Vec2::new(260.0, 650.0));
    }

    #[test]
    fn test_invalid_dt_is_a_no_op() {
        let mut state = GameState::new(&settings(GameMode::Single));
        let before = state.clone();
        for dt in [0.0, -SIM_DT, f32::NAN, f32::INFINITY] {
            tick(&mut state, &TickInput::with_pointer(100.0, 600.0), dt);
        }
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.bodies, before.bodies);
        assert_eq!(state.effects, before.effects);
    }

    #[test]
    fn test_missing_puck_does_not_panic() {
        let mut state = GameState::new(&settings(GameMode::Single));
        state.bodies.retain(|b| b.role != BodyRole::Puck);
        tick(&mut state, &TickInput::with_pointer(100.0, 600.0), SIM_DT);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.mallet(Side::Player).unwrap().pos, Vec2::new(100.0, 600.0));
    }

    #[test]
    fn test_puck_integrates_by_elapsed_frames() {
        let mut state = GameState::new(&settings(GameMode::Multiplayer));
        let puck = state.body_mut(BodyRole::Puck).unwrap();
        puck.pos = Vec2::new(200.0, 400.0);
        puck.vel = Vec2::new(3.0, 0.0);

        tick(&mut state, &TickInput::default(), SIM_DT * 2.0);

        let puck = state.puck().unwrap();
        let expected_vel = 3.0 * PUCK_FRICTION;
        assert!((puck.vel.x - expected_vel).abs() < 1e-4);
        assert!((puck.pos.x - (200.0 + expected_vel * 2.0)).abs() < 1e-3);
        assert!((state.effects.clock_ms - 1000.0 / 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_goal_tick_skips_integration() {
        let mut state = GameState::new(&settings(GameMode::Multiplayer));
        let puck = state.body_mut(BodyRole::Puck).unwrap();
        puck.pos = Vec2::new(200.0, 722.0);
        puck.vel = Vec2::new(0.0, 6.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        let puck = state.puck().unwrap();
        assert_eq!(puck.pos, state.table.respot(Side::Player));
        assert_eq!(puck.vel, Vec2::ZERO);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::Score {
                    player: Side::Player2
                },
                GameEvent::PuckReset {
                    starter: Side::Player
                },
            ]
        );
    }

    /// Scripted human that tracks the puck from below
    fn chase_input(state: &GameState) -> TickInput {
        let puck = state.puck().unwrap();
        TickInput::with_pointer(puck.pos.x, (puck.pos.y + 30.0).max(state.table.midline_y() + 1.0))
    }

    fn run_match(seed: u64, ticks: usize) -> (GameState, Vec<Vec<GameEvent>>) {
        let mut state = GameState::new(&Settings {
            seed,
            difficulty: crate::settings::Difficulty::Hard,
            ..settings(GameMode::Single)
        });
        let mut frames = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let input = chase_input(&state);
            tick(&mut state, &input, SIM_DT);
            frames.push(state.drain_events());
        }
        (state, frames)
    }

    #[test]
    fn test_same_seed_same_match() {
        let (a, events_a) = run_match(1234, 600);
        let (b, events_b) = run_match(1234, 600);
        assert_eq!(a.bodies, b.bodies);
        assert_eq!(a.effects, b.effects);
        assert_eq!(events_a, events_b);
    }

    #[test]
    fn test_long_run_invariants() {
        let (state, frames) = run_match(99, 3000);
        let table = state.table.rect();
        for events in &frames {
            let scored = events.iter().any(|e| matches!(e, GameEvent::Score { .. }));
            if scored {
                assert!(
                    events
                        .iter()
                        .all(|e| matches!(e, GameEvent::Score { .. } | GameEvent::PuckReset { .. })),
                    "score tick raised {events:?}"
                );
            }
            let hits = events.iter().filter(|e| **e == GameEvent::MalletHit).count();
            let walls = events
                .iter()
                .filter(|e| matches!(e, GameEvent::WallCollision { .. }))
                .count();
            assert!(hits <= 2);
            assert!(walls <= 1);
        }
        let glow = state.effects.puck_glow_intensity;
        assert!((GLOW_BASELINE..=GLOW_MAX).contains(&glow));
        assert!(state.effects.puck_speed_multiplier <= MAX_SPEED_MULTIPLIER);
        // Integration may carry the puck one frame past the edge at most
        let puck = state.puck().unwrap();
        let reach = puck.vel.length() + 1e-3;
        assert!(puck.pos.x >= table.x - reach && puck.pos.x <= table.x + table.width + reach);
    }

    #[test]
    fn test_score_resets_effects() {
        let (mut state, _) = run_match(5, 10);
        state.effects.consecutive_hits = 6;
        state.effects.puck_speed_multiplier = 1.2;
        let puck = state.body_mut(BodyRole::Puck).unwrap();
        puck.pos = Vec2::new(200.0, 78.0);
        puck.vel = Vec2::new(0.0, -4.0);

        let input = chase_input(&state);
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.effects.consecutive_hits, 0);
        assert_eq!(state.effects.puck_speed_multiplier, 1.0);
        assert_eq!(state.effects.last_mallet_hit, None);
    }

    #[test]
    fn test_stepper_runs_fixed_ticks() {
        let mut state = GameState::new(&settings(GameMode::Single));
        let mut stepper = FixedStepper::new();
        let input = TickInput::default();

        assert_eq!(stepper.advance(&mut state, &input, 0.04), 2);
        assert!((stepper.pending() - (0.04 - 2.0 * SIM_DT)).abs() < 1e-5);
        assert_eq!(stepper.advance(&mut state, &input, 0.02), 1);
        assert_eq!(state.time_ticks, 3);

        stepper.reset();
        assert_eq!(stepper.pending(), 0.0);
    }

    #[test]
    fn test_stepper_mallet_speed_ignores_frame_rate() {
        // Pointer sweeping up at 10 units per reference frame
        let sweep = |frame_dt: f32, frames_per_sample: f32| {
            let mut state = GameState::new(&settings(GameMode::Multiplayer));
            let mut stepper = FixedStepper::new();
            let start = state.mallet(Side::Player).unwrap().pos;
            let mut velocities = Vec::new();
            for k in 1..=4 {
                let y = start.y - 10.0 * frames_per_sample * k as f32;
                stepper.advance(&mut state, &TickInput::with_pointer(start.x, y), frame_dt);
                velocities.push(state.mallet(Side::Player).unwrap().vel);
            }
            (state.mallet(Side::Player).unwrap().pos, velocities)
        };

        let (end_60, at_60) = sweep(SIM_DT, 1.0);
        let (end_30, at_30) = sweep(SIM_DT * 2.0, 2.0);
        for vel in at_60.iter().chain(&at_30) {
            assert!(vel.distance(Vec2::new(0.0, -10.0)) < 1e-3, "{vel:?}");
        }
        assert!((end_30.y - (end_60.y - 40.0)).abs() < 1e-3);
    }

    #[test]
    fn test_stepper_caps_long_frames() {
        let mut state = GameState::new(&settings(GameMode::Single));
        let mut stepper = FixedStepper::new();
        let input = TickInput::default();

        let mut reference = GameState::new(&settings(GameMode::Single));
        let capped = FixedStepper::new().advance(&mut reference, &input, MAX_FRAME_DT);

        // A 2 s hitch counts as MAX_FRAME_DT
        assert_eq!(stepper.advance(&mut state, &input, 2.0), capped);
        assert!(capped <= MAX_SUBSTEPS);
        assert_eq!(stepper.advance(&mut state, &input, f32::NAN), 0);
        assert_eq!(state.time_ticks, u64::from(capped));
    }

    /// Whether the wall pass will see a contact for a puck at `pos`
    fn touching_rail(state: &GameState, pos: Vec2) -> bool {
        let t = &state.table;
        let r = PUCK_RADIUS;
        pos.x - r <= t.x
            || pos.x + r >= t.right()
            || ((pos.y - r <= t.y || pos.y + r >= t.bottom()) && !t.in_goal_span(pos.x))
    }

    proptest! {
        #[test]
        fn prop_glow_only_rises_on_contact(
            seed in any::<u64>(),
            px in 20.0f32..380.0,
            py in 80.0f32..720.0,
            vx in -30.0f32..30.0,
            vy in -30.0f32..30.0,
            pointers in proptest::collection::vec((0.0f32..400.0, 400.5f32..800.0), 1..120),
        ) {
            let mut state = GameState::new(&Settings {
                seed,
                ..settings(GameMode::Single)
            });
            let puck = state.body_mut(BodyRole::Puck).unwrap();
            puck.pos = Vec2::new(px, py);
            puck.vel = Vec2::new(vx, vy);

            for (x, y) in pointers {
                let before = state.effects.puck_glow_intensity;
                let at_rail = touching_rail(&state, state.puck().unwrap().pos);

                tick(&mut state, &TickInput::with_pointer(x, y), SIM_DT);

                let glow = state.effects.puck_glow_intensity;
                let struck = state.drain_events().contains(&GameEvent::MalletHit);
                prop_assert!((GLOW_BASELINE..=GLOW_MAX).contains(&glow));
                if !at_rail && !struck {
                    prop_assert!(glow <= before, "glow rose {before} -> {glow}");
                }
            }
        }
    }
}

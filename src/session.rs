//! Match session: screen flow, scoring and restarts around the simulation
//!
//! The session is what a frontend drives once per rendered frame. It owns the
//! `GameState` for the match in progress and turns `score` events into the
//! scoreboard and the game-over transition.

use serde::{Deserialize, Serialize};

use crate::score::Score;
use crate::settings::{Difficulty, GameMode, Settings};
use crate::sim::{FixedStepper, GameEvent, GameState, Side, TickInput};

/// Splash progress gained per loading step
const LOADING_STEP: u32 = 5;
/// Frame time per loading step (seconds)
const LOADING_STEP_SECS: f32 = 0.1;

/// Which screen the app is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Splash,
    Welcome,
    Playing,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    screen: Screen,
    score: Score,
    game: Option<GameState>,
    stepper: FixedStepper,
    paused: bool,
    winner: Option<Side>,
    /// Matches started so far, mixed into each match seed
    matches_started: u64,
    /// Splash progress, 0..=100
    loading: u32,
    loading_elapsed: f32,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: settings.sanitized(),
            screen: Screen::Splash,
            score: Score::default(),
            game: None,
            stepper: FixedStepper::new(),
            paused: false,
            winner: None,
            matches_started: 0,
            loading: 0,
            loading_elapsed: 0.0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn loading_progress(&self) -> u32 {
        self.loading
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    /// Skip the rest of the splash screen
    pub fn finish_loading(&mut self) {
        if self.screen == Screen::Splash {
            self.loading = 100;
            self.screen = Screen::Welcome;
        }
    }

    /// Pick the AI strength for the next match. Ignored mid-match.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.screen == Screen::Playing {
            log::debug!("Ignoring difficulty change during a match");
            return;
        }
        self.settings.difficulty = difficulty;
    }

    /// Start a fresh match in `mode` with a zeroed score
    pub fn start(&mut self, mode: GameMode) {
        self.settings.mode = mode;
        self.begin_match();
    }

    /// Replay with the same mode and difficulty
    pub fn restart(&mut self) {
        log::info!("Restarting match");
        self.begin_match();
    }

    pub fn back_to_menu(&mut self) {
        self.game = None;
        self.score.reset();
        self.winner = None;
        self.paused = false;
        self.stepper.reset();
        self.screen = Screen::Welcome;
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
    }

    /// Advance by one rendered frame. Returns the events raised for the
    /// presentation layer.
    pub fn update(&mut self, input: &TickInput, frame_dt: f32) -> Vec<GameEvent> {
        match self.screen {
            Screen::Splash => {
                self.advance_loading(frame_dt);
                Vec::new()
            }
            Screen::Playing if !self.paused => self.step_match(input, frame_dt),
            _ => Vec::new(),
        }
    }

    fn begin_match(&mut self) {
        let settings = Settings {
            seed: self.settings.seed.wrapping_add(self.matches_started),
            ..self.settings.clone()
        };
        self.matches_started += 1;
        self.game = Some(GameState::new(&settings));
        self.score.reset();
        self.winner = None;
        self.paused = false;
        self.stepper.reset();
        self.screen = Screen::Playing;
    }

    fn advance_loading(&mut self, frame_dt: f32) {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return;
        }
        self.loading_elapsed += frame_dt;
        while self.loading_elapsed >= LOADING_STEP_SECS && self.loading < 100 {
            self.loading_elapsed -= LOADING_STEP_SECS;
            self.loading = (self.loading + LOADING_STEP).min(100);
        }
        if self.loading >= 100 {
            self.screen = Screen::Welcome;
        }
    }

    fn step_match(&mut self, input: &TickInput, frame_dt: f32) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            log::warn!("Playing screen without a match, returning to menu");
            self.back_to_menu();
            return Vec::new();
        };

        self.stepper.advance(game, input, frame_dt);
        let events = game.drain_events();
        self.apply_events(events)
    }

    /// Feed a frame's events into the scoreboard. Once the match is decided
    /// nothing after the winning goal and its respot is reported.
    fn apply_events(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        let mut reported = Vec::with_capacity(events.len());
        for event in events {
            if self.winner.is_some() {
                let winning_respot = matches!(event, GameEvent::PuckReset { .. })
                    && matches!(reported.last(), Some(GameEvent::Score { .. }));
                if winning_respot {
                    reported.push(event);
                }
                continue;
            }
            if let GameEvent::Score { player } = event {
                let goals = self.score.record(player);
                log::info!(
                    "Score {}-{} ({} has {goals})",
                    self.score.player,
                    self.score.player2,
                    player.as_str()
                );
                if let Some(winner) = self.score.winner() {
                    log::info!("Game over, {} wins", winner.as_str());
                    self.winner = Some(winner);
                    self.screen = Screen::GameOver;
                }
            }
            reported.push(event);
        }
        reported
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

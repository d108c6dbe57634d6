//! Game state and core simulation types
//!
//! Everything a running match mutates lives in `GameState`. One instance per
//! match; a fresh one is built whenever play (re)starts.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiProfile;
use super::body::{Body, BodyRole};
use super::table::Table;
use crate::consts::*;
use crate::settings::{Difficulty, GameMode, Settings};

/// One end of the table. `Player` defends the bottom goal, `Player2` the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Player2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Player2,
            Side::Player2 => Side::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Player2 => "player2",
        }
    }
}

/// Plain `{x, y}` point for event payloads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Events for the presentation layer (sounds, ripples, score overlay)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Goal; `player` is the side awarded the point
    Score { player: Side },
    MalletHit,
    WallCollision { position: Point },
    /// Puck respotted; `starter` resumes play
    PuckReset { starter: Side },
}

/// Per-match rally effects: speed-up, hit bookkeeping, cooldown clocks and
/// the glow feedback signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub puck_speed_multiplier: f32,
    pub consecutive_hits: u32,
    pub last_mallet_hit: Option<Side>,
    /// Match clock (ms), advanced by each tick's `dt`
    pub clock_ms: f64,
    pub last_wall_collision_ms: Option<f64>,
    pub last_mallet_hit_ms: Option<f64>,
    pub puck_glow_intensity: f32,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            puck_speed_multiplier: 1.0,
            consecutive_hits: 0,
            last_mallet_hit: None,
            clock_ms: 0.0,
            last_wall_collision_ms: None,
            last_mallet_hit_ms: None,
            puck_glow_intensity: GLOW_BASELINE,
        }
    }
}

impl Effects {
    /// Back to defaults after a goal. The clock keeps running.
    pub fn reset_rally(&mut self) {
        *self = Self {
            clock_ms: self.clock_ms,
            ..Self::default()
        };
    }

    pub fn wall_event_ready(&self) -> bool {
        self.last_wall_collision_ms
            .is_none_or(|t| self.clock_ms - t > WALL_COOLDOWN_MS)
    }

    /// A mallet may strike unless it was also the last striker and its
    /// cooldown hasn't run out
    pub fn mallet_hit_ready(&self, striker: Side) -> bool {
        match (self.last_mallet_hit, self.last_mallet_hit_ms) {
            (Some(last), Some(t)) if last == striker => self.clock_ms - t > MALLET_COOLDOWN_MS,
            _ => true,
        }
    }

    pub fn boost_glow(&mut self, amount: f32) {
        self.puck_glow_intensity = (self.puck_glow_intensity + amount).min(GLOW_MAX);
    }

    pub fn max_glow(&mut self) {
        self.puck_glow_intensity = GLOW_MAX;
    }

    pub fn decay_glow(&mut self) {
        if self.puck_glow_intensity > GLOW_BASELINE {
            self.puck_glow_intensity = (self.puck_glow_intensity * GLOW_DECAY).max(GLOW_BASELINE);
        }
    }
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete state of one match in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed for the AI noise source
    pub seed: u64,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// AI tuning, resolved from `difficulty` at creation
    pub ai: AiProfile,
    pub table: Table,
    /// All bodies, sorted by id
    pub bodies: Vec<Body>,
    pub effects: Effects,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
    /// Set once a missing puck or mallet has been warned about
    #[serde(skip)]
    pub(crate) missing_body_reported: bool,
    next_id: u32,
}

impl GameState {
    /// Fresh bodies and zeroed effects for a new match
    pub fn new(settings: &Settings) -> Self {
        let settings = settings.clone().sanitized();
        let table = Table::from_viewport(settings.viewport_width, settings.viewport_height);
        let mut state = Self {
            seed: settings.seed,
            mode: settings.mode,
            difficulty: settings.difficulty,
            ai: AiProfile::for_difficulty(settings.difficulty),
            table,
            bodies: Vec::new(),
            effects: Effects::default(),
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(settings.seed),
            missing_body_reported: false,
            next_id: 1,
        };

        let puck_id = state.next_entity_id();
        state.bodies.push(Body::puck(puck_id, table.center()));
        for side in [Side::Player, Side::Player2] {
            let id = state.next_entity_id();
            state.bodies.push(Body::mallet(id, side, table.mallet_start(side)));
        }
        let mut next_id = state.next_id;
        let statics = table.static_bodies(|| {
            let id = next_id;
            next_id += 1;
            id
        });
        state.next_id = next_id;
        state.bodies.extend(statics);

        log::info!(
            "New match: mode={} difficulty={} table={}x{} seed={}",
            state.mode.as_str(),
            state.difficulty.as_str(),
            table.width,
            table.height,
            state.seed
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn index_of(&self, role: BodyRole) -> Option<usize> {
        self.bodies.iter().position(|b| b.role == role)
    }

    pub fn body(&self, role: BodyRole) -> Option<&Body> {
        self.bodies.iter().find(|b| b.role == role)
    }

    pub fn body_mut(&mut self, role: BodyRole) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.role == role)
    }

    pub fn puck(&self) -> Option<&Body> {
        self.body(BodyRole::Puck)
    }

    pub fn mallet(&self, side: Side) -> Option<&Body> {
        self.body(BodyRole::Mallet(side))
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure bodies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bodies.sort_by_key(|b| b.id);
    }
}

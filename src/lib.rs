//! Puck Rally - an air hockey table simulation
//!
//! Core modules:
//! - `sim`: Simulation core (bodies, table geometry, collisions, AI, tick)
//! - `session`: Match flow (screens, score keeping, restarts)
//! - `score`: Scoreboard for a single match
//! - `settings`: Difficulty, mode and viewport configuration

pub mod score;
pub mod session;
pub mod settings;
pub mod sim;

pub use score::Score;
pub use session::{Screen, Session};
pub use settings::{Difficulty, GameMode, Settings};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Reference frame duration. Velocities are expressed in units per frame.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the fixed stepper will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Table size relative to the viewport
    pub const TABLE_WIDTH_FRACTION: f32 = 0.9;
    pub const TABLE_HEIGHT_FRACTION: f32 = 0.8;
    /// Goal mouth width relative to the table width
    pub const GOAL_WIDTH_FRACTION: f32 = 0.3;
    /// Depth of the goal zone rectangles behind each end line
    pub const GOAL_DEPTH: f32 = 20.0;
    /// Thickness of the static wall bodies
    pub const WALL_THICKNESS: f32 = 10.0;

    pub const PUCK_RADIUS: f32 = 15.0;
    pub const MALLET_RADIUS: f32 = 25.0;

    /// Gap left between puck and wall after a penetration is corrected
    pub const WALL_EPSILON: f32 = 1.0;
    /// Perpendicular velocity kept on a wall bounce
    pub const WALL_RESTITUTION: f32 = 0.8;
    /// Parallel velocity kept on a wall bounce
    pub const WALL_TANGENT_DAMPING: f32 = 0.9;
    /// Minimum time between two wall_collision events (any segment)
    pub const WALL_COOLDOWN_MS: f64 = 100.0;

    /// Minimum time before the same mallet can strike again
    pub const MALLET_COOLDOWN_MS: f64 = 150.0;
    /// Floor of the impulse a mallet strike gives the puck
    pub const MIN_IMPACT_SPEED: f32 = 7.0;
    /// Impact speed per unit of mallet speed
    pub const MALLET_SPEED_GAIN: f32 = 2.0;
    /// Share of the mallet's own velocity carried into the puck
    pub const MALLET_VELOCITY_TRANSFER: f32 = 0.3;
    /// Strikes needed before the rally starts speeding up
    pub const SPEEDUP_AFTER_HITS: u32 = 2;
    pub const SPEEDUP_PER_HIT: f32 = 0.05;
    pub const MAX_SPEED_MULTIPLIER: f32 = 1.5;

    /// Velocity kept per tick (air and surface friction)
    pub const PUCK_FRICTION: f32 = 0.995;

    /// Puck glow feedback signal
    pub const GLOW_BASELINE: f32 = 5.0;
    pub const GLOW_MAX: f32 = 20.0;
    pub const GLOW_WALL_BOOST: f32 = 8.0;
    pub const GLOW_DECAY: f32 = 0.99;

    /// Points needed to win a match
    pub const WIN_SCORE: u32 = 7;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Clamp a value into `[min, max]`. Crossed bounds resolve to `min`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Uniform sample in `[min, max)`, or `min` when the range is empty
#[inline]
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform sample in `[-1, 1)`
#[inline]
pub fn random_signed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    random_in_range(rng, -1.0, 1.0)
}

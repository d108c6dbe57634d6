//! AI opponent for single-player matches
//!
//! The AI owns the top mallet (player 2). Each tick it returns a displacement
//! for that mallet; the orchestrator applies it and clamps the result to the
//! top half. Nothing here mutates game state except the RNG it is handed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::table::Table;
use crate::settings::Difficulty;
use crate::{clamp, random_signed};

/// Puck speed (units/frame) below which the AI stops trying to intercept
pub const INTERCEPT_MIN_SPEED: f32 = 1.0;
/// Puck speed at which aim noise disappears entirely
pub const NOISE_FADE_SPEED: f32 = 20.0;
/// Extra margin kept between an intercept target and the side rails
pub const TARGET_RAIL_MARGIN: f32 = 10.0;
/// Fraction of the remaining distance covered per tick when close
pub const ARRIVE_GAIN: f32 = 0.8;
/// How much of the puck's speed is added to the forward step on an intercept
pub const INTERCEPT_LEAD: f32 = 0.3;
/// Puck must be this deep into the table (fraction of height) before the AI
/// will shadow it instead of recentering
pub const SHADOW_DEPTH: f32 = 0.4;
/// Spread of the recentering target, as a multiple of the error margin
pub const RECENTER_SPREAD: f32 = 1.5;
pub const IDLE_JITTER_CHANCE: f32 = 0.1;
pub const IDLE_JITTER: f32 = 2.0;

/// Tuning for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Max displacement per tick while positioning
    pub speed: f32,
    /// The AI rethinks its target with probability `1 / reaction_delay` per tick
    pub reaction_delay: f32,
    /// Noise on predicted intercepts and home position
    pub error_margin: f32,
    /// Home position as a fraction of the AI's own half, from its goal line
    pub home_depth: f32,
    /// Chance of shadowing the puck's x instead of recentering
    pub aggressiveness: f32,
    /// Displacement per tick when chasing a puck that got behind the mallet
    pub retrieve_speed: f32,
}

impl AiProfile {
    pub const EASY: AiProfile = AiProfile {
        speed: 6.0,
        reaction_delay: 8.0,
        error_margin: 30.0,
        home_depth: 0.6,
        aggressiveness: 0.3,
        retrieve_speed: 4.0,
    };

    pub const MEDIUM: AiProfile = AiProfile {
        speed: 10.0,
        reaction_delay: 4.0,
        error_margin: 15.0,
        home_depth: 0.4,
        aggressiveness: 0.6,
        retrieve_speed: 7.0,
    };

    pub const HARD: AiProfile = AiProfile {
        speed: 14.0,
        reaction_delay: 1.0,
        error_margin: 5.0,
        home_depth: 0.3,
        aggressiveness: 0.9,
        retrieve_speed: 10.0,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }

    /// Probability of re-evaluating the target on a given tick
    pub fn reaction_chance(&self) -> f32 {
        1.0 / self.reaction_delay.max(1.0)
    }
}

impl Default for AiProfile {
    fn default() -> Self {
        Self::MEDIUM
    }
}

/// Step of at most `max_step` toward `target`, slowing down on arrival.
/// `None` when already there.
fn step_toward(from: Vec2, target: Vec2, max_step: f32) -> Option<Vec2> {
    let delta = target - from;
    let distance = delta.length();
    if distance <= 0.0 {
        return None;
    }
    Some(delta / distance * max_step.min(distance * ARRIVE_GAIN))
}

/// Where to go when the puck is heading our way: extrapolate its x to our
/// line, with noise that shrinks as the puck gets faster
fn intercept_target<R: Rng + ?Sized>(
    profile: &AiProfile,
    puck: &Body,
    mallet: &Body,
    table: &Table,
    rng: &mut R,
) -> Vec2 {
    let puck_speed = puck.vel.length();
    let time_to_reach = ((mallet.pos.y - puck.pos.y) / puck.vel.y).abs();
    let noise_scale = (1.0 - puck_speed / NOISE_FADE_SPEED).max(0.0);

    let mut x = puck.pos.x + puck.vel.x * time_to_reach;
    x += random_signed(rng) * profile.error_margin * noise_scale;
    let inset = mallet.radius() + TARGET_RAIL_MARGIN;
    let x = clamp(x, table.x + inset, table.right() - inset);

    // Step out to meet it, never past our own half
    let y = (table.midline_y() - mallet.radius())
        .min(mallet.pos.y + profile.speed + puck_speed * INTERCEPT_LEAD);

    Vec2::new(x, y)
}

/// Where to wait when the puck is slow or moving away
fn home_target<R: Rng + ?Sized>(
    profile: &AiProfile,
    puck: &Body,
    table: &Table,
    rng: &mut R,
) -> Vec2 {
    let shadow = rng.random::<f32>() < profile.aggressiveness
        && puck.pos.y > table.y + table.height * SHADOW_DEPTH;
    let x = if shadow {
        puck.pos.x
    } else {
        table.center().x + random_signed(rng) * profile.error_margin * RECENTER_SPREAD
    };
    let y = table.y + table.height / 2.0 * profile.home_depth;
    Vec2::new(x, y)
}

/// Displacement for the AI mallet this tick
pub fn mallet_movement<R: Rng + ?Sized>(
    profile: &AiProfile,
    puck: &Body,
    mallet: &Body,
    table: &Table,
    rng: &mut R,
) -> Vec2 {
    // Puck slipped between the mallet and its own goal: go get it
    if puck.pos.y < mallet.pos.y {
        let to_puck = puck.pos - mallet.pos;
        let distance = to_puck.length();
        if distance > 0.0 {
            return to_puck / distance * profile.retrieve_speed;
        }
    }

    if rng.random::<f32>() < profile.reaction_chance() {
        let incoming = puck.vel.y < 0.0 && puck.vel.length() > INTERCEPT_MIN_SPEED;
        let target = if incoming {
            intercept_target(profile, puck, mallet, table, rng)
        } else {
            home_target(profile, puck, table, rng)
        };
        if let Some(step) = step_toward(mallet.pos, target, profile.speed) {
            return step;
        }
    }

    if rng.random::<f32>() < IDLE_JITTER_CHANCE {
        return Vec2::new(random_signed(rng), random_signed(rng)) * IDLE_JITTER;
    }

    Vec2::ZERO
}

//! Collision detection and response
//!
//! One pass per tick, in fixed priority order:
//! 1. goal check (short-circuits everything below)
//! 2. wall containment on the four table edges
//! 3. mallet strikes, player mallet first
//! 4. friction, then glow decay (glow decays on goal ticks too)
//!
//! Events are gated by cooldowns measured on the match clock so one physical
//! contact sampled over several ticks is reported once.

use glam::Vec2;

use super::body::{Body, BodyRole};
use super::state::{Effects, GameEvent, GameState, Point, Side};
use super::table::Table;
use crate::consts::*;

/// Which table edge a wall contact happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

fn emit(events: &mut Vec<GameEvent>, event: GameEvent) {
    log::debug!("event: {:?}", event);
    events.push(event);
}

/// Side awarded the point if the puck center is in a goal mouth
///
/// Crossing the top line scores for the player, the bottom line for player 2.
pub fn goal_scorer(table: &Table, pos: Vec2) -> Option<Side> {
    if !table.in_goal_span(pos.x) {
        return None;
    }
    if pos.y <= table.y {
        Some(Side::Player)
    } else if pos.y >= table.bottom() {
        Some(Side::Player2)
    } else {
        None
    }
}

/// Award a goal and respot the puck for the side that conceded
pub fn score_goal(
    puck: &mut Body,
    table: &Table,
    scorer: Side,
    effects: &mut Effects,
    events: &mut Vec<GameEvent>,
) {
    let starter = scorer.opponent();
    log::info!("Goal for {}, {} restarts", scorer.as_str(), starter.as_str());
    emit(events, GameEvent::Score { player: scorer });

    let spot = table.respot(starter);
    puck.set_position(spot.x, spot.y);
    puck.set_velocity(0.0, 0.0);
    puck.set_angular_velocity(0.0);
    emit(events, GameEvent::PuckReset { starter });

    effects.reset_rally();
}

/// Push the puck off every penetrated edge and bounce it
///
/// Returns the number of edges hit this tick.
pub fn resolve_walls(
    puck: &mut Body,
    table: &Table,
    effects: &mut Effects,
    events: &mut Vec<GameEvent>,
) -> usize {
    let r = puck.radius();
    let mut hits = 0;

    // Checks are independent: a corner contact resolves both axes
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        let p = puck.pos;
        let v = puck.vel;
        let outside_goal = !table.in_goal_span(p.x);
        let contact = match edge {
            Edge::Left if p.x - r <= table.x => {
                puck.set_position(table.x + r + WALL_EPSILON, p.y);
                puck.set_velocity(-v.x * WALL_RESTITUTION, v.y * WALL_TANGENT_DAMPING);
                Some(Vec2::new(table.x, p.y))
            }
            Edge::Right if p.x + r >= table.right() => {
                puck.set_position(table.right() - r - WALL_EPSILON, p.y);
                puck.set_velocity(-v.x * WALL_RESTITUTION, v.y * WALL_TANGENT_DAMPING);
                Some(Vec2::new(table.right(), p.y))
            }
            Edge::Top if p.y - r <= table.y && outside_goal => {
                puck.set_position(p.x, table.y + r + WALL_EPSILON);
                puck.set_velocity(v.x * WALL_TANGENT_DAMPING, -v.y * WALL_RESTITUTION);
                Some(Vec2::new(p.x, table.y))
            }
            Edge::Bottom if p.y + r >= table.bottom() && outside_goal => {
                puck.set_position(p.x, table.bottom() - r - WALL_EPSILON);
                puck.set_velocity(v.x * WALL_TANGENT_DAMPING, -v.y * WALL_RESTITUTION);
                Some(Vec2::new(p.x, table.bottom()))
            }
            _ => None,
        };

        let Some(contact) = contact else {
            continue;
        };
        hits += 1;
        effects.boost_glow(GLOW_WALL_BOOST);

        // One cooldown for all segments
        if effects.wall_event_ready() {
            emit(
                events,
                GameEvent::WallCollision {
                    position: Point::from(contact),
                },
            );
            effects.last_wall_collision_ms = Some(effects.clock_ms);
        }
    }

    hits
}

/// Strike the puck with `mallet` if they overlap and the striker is off
/// cooldown. Returns true on a strike.
pub fn resolve_mallet(
    puck: &mut Body,
    mallet: &Body,
    striker: Side,
    effects: &mut Effects,
    events: &mut Vec<GameEvent>,
) -> bool {
    if !puck.touches(mallet) || !effects.mallet_hit_ready(striker) {
        return false;
    }

    effects.consecutive_hits += 1;
    effects.last_mallet_hit = Some(striker);
    effects.last_mallet_hit_ms = Some(effects.clock_ms);
    if effects.consecutive_hits > SPEEDUP_AFTER_HITS {
        effects.puck_speed_multiplier = (1.0 + effects.consecutive_hits as f32 * SPEEDUP_PER_HIT)
            .min(MAX_SPEED_MULTIPLIER);
    }
    effects.max_glow();

    let offset = puck.pos - mallet.pos;
    let angle = offset.y.atan2(offset.x);
    let dir = Vec2::new(angle.cos(), angle.sin());

    // Just clear of the mallet so the next tick doesn't see overlap
    let contact_dist = puck.radius() + mallet.radius();
    let out = mallet.pos + dir * (contact_dist + WALL_EPSILON);
    puck.set_position(out.x, out.y);

    let impact_speed =
        (mallet.vel.length() * MALLET_SPEED_GAIN).max(MIN_IMPACT_SPEED) * effects.puck_speed_multiplier;
    let vel = dir * impact_speed + mallet.vel * MALLET_VELOCITY_TRANSFER;
    puck.set_velocity(vel.x, vel.y);

    emit(events, GameEvent::MalletHit);
    true
}

/// Warn about a missing body once per match, then drop to debug
fn report_missing(state: &mut GameState, role: BodyRole) {
    let level = if state.missing_body_reported {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    log::log!(level, "No {} body, skipping its contacts", role.label());
    state.missing_body_reported = true;
}

/// Run the full collision pass on the current state.
///
/// Returns the scorer when this tick ended the rally.
pub fn resolve(state: &mut GameState) -> Option<Side> {
    let Some(puck_idx) = state.index_of(BodyRole::Puck) else {
        report_missing(state, BodyRole::Puck);
        state.effects.decay_glow();
        return None;
    };

    let mut mallets = Vec::with_capacity(2);
    for side in [Side::Player, Side::Player2] {
        match state.mallet(side) {
            Some(mallet) => mallets.push((side, *mallet)),
            None => report_missing(state, BodyRole::Mallet(side)),
        }
    }

    let table = state.table;
    let GameState {
        bodies,
        effects,
        events,
        ..
    } = state;
    let puck = &mut bodies[puck_idx];

    let scorer = match goal_scorer(&table, puck.pos) {
        Some(scorer) => {
            score_goal(puck, &table, scorer, effects, events);
            Some(scorer)
        }
        None => {
            resolve_walls(puck, &table, effects, events);
            for (side, mallet) in &mallets {
                resolve_mallet(puck, mallet, *side, effects, events);
            }
            puck.vel *= PUCK_FRICTION;
            // A strike next to a wall can push the center off the table
            puck.pos = table.clamp_point(puck.pos);
            None
        }
    };

    effects.decay_glow();
    scorer
}

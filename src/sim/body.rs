//! Minimal rigid bodies: circles and axis-aligned rectangles
//!
//! No rotation dynamics. Angular velocity is carried only so a respot can
//! zero it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::consts::*;
use crate::distance;

/// Which wall segment a static wall body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallSegment {
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl WallSegment {
    pub const ALL: [WallSegment; 6] = [
        WallSegment::Left,
        WallSegment::Right,
        WallSegment::TopLeft,
        WallSegment::TopRight,
        WallSegment::BottomLeft,
        WallSegment::BottomRight,
    ];
}

/// What a body is, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRole {
    Puck,
    /// Mallet defending the given side's goal
    Mallet(Side),
    Wall(WallSegment),
    Table,
    /// Goal zone defended by the given side
    Goal(Side),
}

impl BodyRole {
    /// Stable label for presentation and logs
    pub fn label(&self) -> &'static str {
        match self {
            BodyRole::Puck => "puck",
            BodyRole::Mallet(Side::Player) => "player_mallet",
            BodyRole::Mallet(Side::Player2) => "opponent_mallet",
            BodyRole::Wall(WallSegment::Left) => "wall_left",
            BodyRole::Wall(WallSegment::Right) => "wall_right",
            BodyRole::Wall(WallSegment::TopLeft) => "wall_top_left",
            BodyRole::Wall(WallSegment::TopRight) => "wall_top_right",
            BodyRole::Wall(WallSegment::BottomLeft) => "wall_bottom_left",
            BodyRole::Wall(WallSegment::BottomRight) => "wall_bottom_right",
            BodyRole::Table => "table",
            BodyRole::Goal(Side::Player) => "goal_bottom",
            BodyRole::Goal(Side::Player2) => "goal_top",
        }
    }
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_width: f32, half_height: f32 },
}

/// A body in the simulation world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub role: BodyRole,
    pub pos: Vec2,
    /// Units per reference frame (see `consts::SIM_DT`)
    pub vel: Vec2,
    pub angular_vel: f32,
    pub shape: Shape,
    pub is_static: bool,
}

impl Body {
    pub fn circle(id: u32, role: BodyRole, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            role,
            pos,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            shape: Shape::Circle { radius },
            is_static: false,
        }
    }

    /// A static rectangle centered at `center`
    pub fn rect(id: u32, role: BodyRole, center: Vec2, size: Vec2) -> Self {
        Self {
            id,
            role,
            pos: center,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            shape: Shape::Rect {
                half_width: size.x / 2.0,
                half_height: size.y / 2.0,
            },
            is_static: true,
        }
    }

    pub fn puck(id: u32, pos: Vec2) -> Self {
        Self::circle(id, BodyRole::Puck, pos, PUCK_RADIUS)
    }

    pub fn mallet(id: u32, side: Side, pos: Vec2) -> Self {
        Self::circle(id, BodyRole::Mallet(side), pos, MALLET_RADIUS)
    }

    /// Radius for circles, zero for rectangles
    pub fn radius(&self) -> f32 {
        match self.shape {
            Shape::Circle { radius } => radius,
            Shape::Rect { .. } => 0.0,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        if self.is_static {
            return;
        }
        self.pos = Vec2::new(x, y);
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        if self.is_static {
            return;
        }
        self.vel = Vec2::new(vx, vy);
    }

    pub fn set_angular_velocity(&mut self, w: f32) {
        if self.is_static {
            return;
        }
        self.angular_vel = w;
    }

    /// Advance by `frames` reference frames of velocity
    pub fn integrate(&mut self, frames: f32) {
        if self.is_static {
            return;
        }
        self.pos += self.vel * frames;
    }

    /// Move to `pos` and record the displacement as velocity.
    ///
    /// Used for mallets, which are placed by input rather than integrated.
    pub fn move_to(&mut self, pos: Vec2, frames: f32) {
        if self.is_static {
            return;
        }
        self.vel = if frames > 0.0 {
            (pos - self.pos) / frames
        } else {
            Vec2::ZERO
        };
        self.pos = pos;
    }

    /// True when two circles overlap (strictly)
    pub fn touches(&self, other: &Body) -> bool {
        distance(self.pos, other.pos) < self.radius() + other.radius()
    }
}

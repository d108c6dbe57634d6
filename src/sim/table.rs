//! Table geometry
//!
//! Derived once from the viewport and shared read-only by the resolver, the
//! AI and the orchestrator. Screen coordinates: y grows downward, so the
//! player (bottom) defends `bottom()` and player 2 (top) defends `y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyRole, WallSegment};
use super::state::Side;
use crate::clamp;
use crate::consts::*;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Inclusive containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// The playing surface and its goal mouths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub goal_width: f32,
}

impl Table {
    /// Lay the table out centered in a viewport
    pub fn from_viewport(viewport_width: f32, viewport_height: f32) -> Self {
        let width = viewport_width * TABLE_WIDTH_FRACTION;
        let height = viewport_height * TABLE_HEIGHT_FRACTION;
        Self {
            x: (viewport_width - width) / 2.0,
            y: (viewport_height - height) / 2.0,
            width,
            height,
            goal_width: width * GOAL_WIDTH_FRACTION,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Horizontal line splitting the two halves
    pub fn midline_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Left edge of both goal mouths
    pub fn goal_left(&self) -> f32 {
        self.x + (self.width - self.goal_width) / 2.0
    }

    pub fn goal_right(&self) -> f32 {
        self.goal_left() + self.goal_width
    }

    /// Strictly inside the goal mouth span
    pub fn in_goal_span(&self, x: f32) -> bool {
        x > self.goal_left() && x < self.goal_right()
    }

    /// Goal zone defended by `side`, sitting just beyond its end line
    pub fn goal_zone(&self, side: Side) -> Rect {
        let y = match side {
            Side::Player => self.bottom(),
            Side::Player2 => self.y - GOAL_DEPTH,
        };
        Rect::new(self.goal_left(), y, self.goal_width, GOAL_DEPTH)
    }

    /// Legal area for the center of a mallet of `radius` owned by `side`
    pub fn mallet_bounds(&self, side: Side, radius: f32) -> Rect {
        let (top, bottom) = match side {
            Side::Player => (self.midline_y(), self.bottom() - radius),
            Side::Player2 => (self.y + radius, self.midline_y()),
        };
        let left = self.x + radius;
        let right = self.right() - radius;
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Clamp a mallet center into its half
    pub fn clamp_mallet(&self, side: Side, pos: Vec2, radius: f32) -> Vec2 {
        let b = self.mallet_bounds(side, radius);
        Vec2::new(
            clamp(pos.x, b.x, b.x + b.width),
            clamp(pos.y, b.y, b.y + b.height),
        )
    }

    /// Clamp a point onto the table rectangle
    pub fn clamp_point(&self, pos: Vec2) -> Vec2 {
        Vec2::new(clamp(pos.x, self.x, self.right()), clamp(pos.y, self.y, self.bottom()))
    }

    /// Respot for a new rally: a quarter of the table from the starter's goal
    pub fn respot(&self, starter: Side) -> Vec2 {
        let y = match starter {
            Side::Player2 => self.y + self.height * 0.25,
            Side::Player => self.y + self.height * 0.75,
        };
        Vec2::new(self.center().x, y)
    }

    /// Where a mallet starts a match
    pub fn mallet_start(&self, side: Side) -> Vec2 {
        let y = match side {
            Side::Player => self.bottom() - MALLET_RADIUS * 2.0,
            Side::Player2 => self.y + MALLET_RADIUS * 2.0,
        };
        Vec2::new(self.center().x, y)
    }

    /// Static bodies outlining the table: six wall segments (the end walls
    /// split around the goal mouths), the table surface and both goals
    pub fn static_bodies(&self, mut next_id: impl FnMut() -> u32) -> Vec<Body> {
        let half_t = WALL_THICKNESS / 2.0;
        let end_wall_len = (self.width - self.goal_width) / 2.0;
        let quarter = end_wall_len / 2.0;
        let mut bodies = Vec::with_capacity(WallSegment::ALL.len() + 3);

        for segment in WallSegment::ALL {
            let (center, size) = match segment {
                WallSegment::Left => (
                    Vec2::new(self.x - half_t, self.midline_y()),
                    Vec2::new(WALL_THICKNESS, self.height),
                ),
                WallSegment::Right => (
                    Vec2::new(self.right() + half_t, self.midline_y()),
                    Vec2::new(WALL_THICKNESS, self.height),
                ),
                WallSegment::TopLeft => (
                    Vec2::new(self.x + quarter, self.y - half_t),
                    Vec2::new(end_wall_len, WALL_THICKNESS),
                ),
                WallSegment::TopRight => (
                    Vec2::new(self.right() - quarter, self.y - half_t),
                    Vec2::new(end_wall_len, WALL_THICKNESS),
                ),
                WallSegment::BottomLeft => (
                    Vec2::new(self.x + quarter, self.bottom() + half_t),
                    Vec2::new(end_wall_len, WALL_THICKNESS),
                ),
                WallSegment::BottomRight => (
                    Vec2::new(self.right() - quarter, self.bottom() + half_t),
                    Vec2::new(end_wall_len, WALL_THICKNESS),
                ),
            };
            bodies.push(Body::rect(next_id(), BodyRole::Wall(segment), center, size));
        }

        bodies.push(Body::rect(
            next_id(),
            BodyRole::Table,
            self.center(),
            Vec2::new(self.width, self.height),
        ));
        for side in [Side::Player, Side::Player2] {
            let zone = self.goal_zone(side);
            bodies.push(Body::rect(next_id(), BodyRole::Goal(side), zone.center(), zone.size()));
        }
        bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_viewport(400.0, 800.0)
    }

    #[test]
    fn test_layout_from_viewport() {
        let t = table();
        assert!((t.width - 360.0).abs() < 1e-3);
        assert!((t.height - 640.0).abs() < 1e-3);
        assert!((t.x - 20.0).abs() < 1e-3);
        assert!((t.y - 80.0).abs() < 1e-3);
        assert!((t.goal_width - 108.0).abs() < 1e-3);
        assert!((t.goal_left() - 146.0).abs() < 1e-3);
        assert!((t.goal_right() - 254.0).abs() < 1e-3);
    }

    #[test]
    fn test_goal_span_is_exclusive() {
        let t = table();
        assert!(!t.in_goal_span(t.goal_left()));
        assert!(!t.in_goal_span(t.goal_right()));
        assert!(t.in_goal_span(t.center().x));
    }

    #[test]
    fn test_goal_zones_sit_beyond_end_lines() {
        let t = table();
        let top = t.goal_zone(Side::Player2);
        let bottom = t.goal_zone(Side::Player);
        assert!((top.y + top.height - t.y).abs() < 1e-3);
        assert!((bottom.y - t.bottom()).abs() < 1e-3);
        assert!((top.center().x - t.center().x).abs() < 1e-3);
    }

    #[test]
    fn test_clamp_mallet_to_own_half() {
        let t = table();
        let p = t.clamp_mallet(Side::Player, Vec2::new(-50.0, 0.0), MALLET_RADIUS);
        assert!((p.x - (t.x + MALLET_RADIUS)).abs() < 1e-3);
        assert!((p.y - t.midline_y()).abs() < 1e-3);

        let p = t.clamp_mallet(Side::Player2, Vec2::new(1000.0, 1000.0), MALLET_RADIUS);
        assert!((p.x - (t.right() - MALLET_RADIUS)).abs() < 1e-3);
        assert!((p.y - t.midline_y()).abs() < 1e-3);

        let p = t.clamp_mallet(Side::Player2, Vec2::new(200.0, 0.0), MALLET_RADIUS);
        assert!((p.y - (t.y + MALLET_RADIUS)).abs() < 1e-3);
    }

    #[test]
    fn test_respot_quarters() {
        let t = table();
        assert!((t.respot(Side::Player2).y - (t.y + 160.0)).abs() < 1e-3);
        assert!((t.respot(Side::Player).y - (t.y + 480.0)).abs() < 1e-3);
    }

    #[test]
    fn test_static_bodies() {
        let t = table();
        let mut id = 0;
        let bodies = t.static_bodies(|| {
            id += 1;
            id
        });
        assert_eq!(bodies.len(), 9);
        assert!(bodies.iter().all(|b| b.is_static));
        let top_left = bodies
            .iter()
            .find(|b| b.role == BodyRole::Wall(WallSegment::TopLeft))
            .unwrap();
        // Top-left wall spans from the table's left edge to the goal mouth
        assert!((top_left.pos.x - (t.x + (t.goal_left() - t.x) / 2.0)).abs() < 1e-3);
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same settings, seed and input
//! sequence, a match plays out identically:
//! - Fixed timestep via `FixedStepper`
//! - Seeded RNG only (AI noise)
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod body;
pub mod collision;
pub mod state;
pub mod table;
pub mod tick;

pub use ai::{AiProfile, mallet_movement};
pub use body::{Body, BodyRole, Shape, WallSegment};
pub use collision::{goal_scorer, resolve};
pub use state::{Effects, GameEvent, GameState, Point, Side};
pub use table::{Rect, Table};
pub use tick::{FixedStepper, PointerKind, PointerSample, TickInput, tick};

//! Match scoreboard
//!
//! Updated only from `score` events. First side to `WIN_SCORE` takes the match.

use serde::{Deserialize, Serialize};

use crate::consts::WIN_SCORE;
use crate::sim::Side;

/// Goals per side for the current match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub player2: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a goal to `side`. Returns that side's new total.
    pub fn record(&mut self, side: Side) -> u32 {
        let goals = match side {
            Side::Player => &mut self.player,
            Side::Player2 => &mut self.player2,
        };
        *goals += 1;
        *goals
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Player2 => self.player2,
        }
    }

    /// Side ahead on goals, if any
    pub fn leader(&self) -> Option<Side> {
        match self.player.cmp(&self.player2) {
            std::cmp::Ordering::Greater => Some(Side::Player),
            std::cmp::Ordering::Less => Some(Side::Player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The side that reached the winning score
    pub fn winner(&self) -> Option<Side> {
        if self.player >= WIN_SCORE {
            Some(Side::Player)
        } else if self.player2 >= WIN_SCORE {
            Some(Side::Player2)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

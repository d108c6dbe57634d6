//! Match settings
//!
//! Chosen on the welcome screen and handed to the simulation when a match
//! starts. Unknown values never fail: they fall back to defaults.

use serde::{Deserialize, Serialize};

/// AI opponent strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a difficulty name. Anything unrecognized is Medium.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        Self::from_str_lossy(&s)
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.as_str().to_string()
    }
}

impl From<String> for GameMode {
    fn from(s: String) -> Self {
        Self::from_str_lossy(&s)
    }
}

impl From<GameMode> for String {
    fn from(m: GameMode) -> Self {
        m.as_str().to_string()
    }
}

/// Whether the top mallet is driven by the AI or by a second player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameMode {
    #[default]
    Single,
    Multiplayer,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::Multiplayer => "multiplayer",
        }
    }

    /// Parse a mode name. Anything unrecognized is Single.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "multiplayer" => GameMode::Multiplayer,
            _ => GameMode::Single,
        }
    }

    /// True when the AI controls the opponent mallet
    pub fn ai_enabled(&self) -> bool {
        *self == GameMode::Single
    }
}

/// Settings for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    /// Viewport the table is laid out in (points)
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Seed for the AI's noise source
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            mode: GameMode::Single,
            // Typical phone portrait viewport
            viewport_width: 390.0,
            viewport_height: 844.0,
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                log::warn!("Ignoring unreadable settings ({err}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data with string/number fields only; serialization can't fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Replace a non-finite or non-positive viewport with the default one
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            self.viewport_width = defaults.viewport_width;
        }
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            self.viewport_height = defaults.viewport_height;
        }
        self
    }
}

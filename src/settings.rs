//! Game settings and preferences
//!
//! Persisted separately from game saves, as JSON in its own blob store.

use serde::{Deserialize, Serialize};

use crate::consts::{AUTOSAVE_INTERVAL, MAX_BOARD_DIMENSION, MIN_BOARD_DIMENSION, MIN_FLIP_LIMIT};
use crate::error::{Error, Result};
use crate::persistence::BlobStore;
use crate::sim::{MatchConfig, ScoreTuning};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// Board columns × rows for this preset
    pub fn board_size(&self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (4, 3),
            Difficulty::Medium => (4, 4),
            Difficulty::Hard => (6, 5),
            Difficulty::Expert => (8, 6),
        }
    }

    /// Distinct card faces needed so every id appears exactly twice
    pub fn image_count(&self) -> u32 {
        let (w, h) = self.board_size();
        w * h / 2
    }

    /// Seconds mismatched cards stay visible (shorter on harder presets)
    pub fn mismatch_delay(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.2,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 0.8,
            Difficulty::Expert => 0.6,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset the board size was taken from
    pub difficulty: Difficulty,

    // === Board ===
    pub board_width: u32,
    pub board_height: u32,
    /// Distinct card faces available to the generator
    pub image_count: u32,

    // === Rules ===
    pub matching: MatchConfig,
    pub scoring: ScoreTuning,
    /// Seconds before the run ends in GameOver (None = untimed)
    pub time_limit: Option<f64>,

    // === Persistence ===
    /// Minimum seconds between periodic auto-saves (0 disables them)
    pub autosave_interval: f64,
    /// Pause when the window is hidden or loses focus
    pub pause_on_focus_loss: bool,

    // === Cues ===
    pub mute_cues: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(Difficulty::default())
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(difficulty: Difficulty) -> Self {
        let (board_width, board_height) = difficulty.board_size();
        Self {
            difficulty,
            board_width,
            board_height,
            image_count: difficulty.image_count(),
            matching: MatchConfig {
                mismatch_delay: difficulty.mismatch_delay(),
                ..MatchConfig::default()
            },
            scoring: ScoreTuning::default(),
            time_limit: None,
            autosave_interval: AUTOSAVE_INTERVAL,
            pause_on_focus_loss: true,
            mute_cues: false,
        }
    }

    /// Apply a difficulty preset (updates board size and pacing)
    pub fn apply_preset(&mut self, difficulty: Difficulty) {
        let (w, h) = difficulty.board_size();
        self.difficulty = difficulty;
        self.board_width = w;
        self.board_height = h;
        self.image_count = difficulty.image_count();
        self.matching.mismatch_delay = difficulty.mismatch_delay();
    }

    /// Check every value the session relies on
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.board_width < MIN_BOARD_DIMENSION || self.board_height < MIN_BOARD_DIMENSION {
            return Err(Error::invalid_config(format!(
                "board {}x{} is smaller than {}x{}",
                self.board_width, self.board_height, MIN_BOARD_DIMENSION, MIN_BOARD_DIMENSION
            )));
        }
        if self.board_width > MAX_BOARD_DIMENSION || self.board_height > MAX_BOARD_DIMENSION {
            return Err(Error::invalid_config(format!(
                "board {}x{} is larger than {}x{}",
                self.board_width, self.board_height, MAX_BOARD_DIMENSION, MAX_BOARD_DIMENSION
            )));
        }
        if self.image_count == 0 {
            return Err(Error::invalid_config("image_count must be at least 1"));
        }
        if self.matching.flip_limit < MIN_FLIP_LIMIT {
            return Err(Error::invalid_config(format!(
                "flip_limit must be at least {}",
                MIN_FLIP_LIMIT
            )));
        }
        let delays = [
            ("grace_interval", self.matching.grace_interval),
            ("mismatch_delay", self.matching.mismatch_delay),
            ("completion_delay", self.matching.completion_delay),
            ("flip_duration", self.matching.flip_duration),
            ("autosave_interval", self.autosave_interval),
        ];
        for (name, value) in delays {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_config(format!(
                    "{} must be a non-negative number of seconds",
                    name
                )));
            }
        }
        if let Some(limit) = self.time_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(Error::invalid_config("time_limit must be positive"));
            }
        }
        Ok(())
    }

    /// Load settings from a store, falling back to defaults
    pub fn load(store: &dyn BlobStore) -> Self {
        match store.read() {
            Ok(Some(bytes)) => match serde_json::from_slice::<Settings>(&bytes) {
                Ok(settings) => {
                    log::info!("Loaded settings ({})", settings.difficulty.as_str());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to a store
    pub fn save(&self, store: &mut dyn BlobStore) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        store.write(&json).map_err(Error::Io)?;
        log::info!("Settings saved");
        Ok(())
    }
}

//! Memory Match - gameplay core for a tile-matching memory game
//!
//! Core modules:
//! - `sim`: Deterministic rules (board generation, flip/match engine, scoring)
//! - `session`: Session state machine wiring everything together
//! - `persistence`: Save/load with a versioned JSON envelope
//! - `settings`: Data-driven configuration and difficulty presets
//! - `cues`: Fire-and-forget audio/visual cue notifications
//!
//! Rendering, audio playback and input polling live outside this crate.

pub mod autoplay;
pub mod cues;
pub mod error;
pub mod events;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use session::{LoadOutcome, Session, SessionEvent, SessionState};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Smallest allowed board dimension
    pub const MIN_BOARD_DIMENSION: u32 = 2;
    /// Largest allowed board dimension
    pub const MAX_BOARD_DIMENSION: u32 = 64;
    /// Area the board layout is fitted into (world units)
    pub const BOARD_EXTENT: Vec2 = Vec2::new(800.0, 600.0);
    /// Gap between cards as a fraction of the card size
    pub const CARD_SPACING_RATIO: f32 = 0.1;

    /// Cards face up awaiting resolution at once
    pub const DEFAULT_FLIP_LIMIT: usize = 2;
    /// Fewer cards than this can never form a batch
    pub const MIN_FLIP_LIMIT: usize = 2;
    /// Seconds to look at a full set before it is evaluated
    pub const GRACE_INTERVAL: f64 = 0.3;
    /// Seconds mismatched cards stay visible
    pub const MISMATCH_DELAY: f64 = 1.0;
    /// Seconds between the final match and the win
    pub const COMPLETION_DELAY: f64 = 0.5;
    /// Seconds a flip transition takes
    pub const FLIP_DURATION: f64 = 0.25;

    /// Scoring
    pub const BASE_MATCH_SCORE: u32 = 100;
    pub const COMBO_MULTIPLIER: u32 = 50;
    pub const MAX_COMBO: u32 = 10;
    /// Follow-up match bonus (disabled by default)
    pub const TIME_BONUS: u32 = 0;
    pub const TIME_BONUS_DECAY: f64 = 5.0;
    /// Completion bonus applies below this many seconds
    pub const PAR_TIME: f64 = 120.0;
    pub const COMPLETION_BONUS_RATE: f64 = 500.0;
    pub const ACCURACY_THRESHOLD: f64 = 0.8;
    pub const ACCURACY_BONUS_SCALE: f64 = 1000.0;

    /// Minimum seconds between periodic auto-saves
    pub const AUTOSAVE_INTERVAL: f64 = 30.0;
}

//! Deterministic gameplay module
//!
//! All rule-bearing logic lives here. This module must stay pure:
//! - Virtual clock only (advanced by the caller)
//! - Seeded RNG only
//! - Stable iteration order (by card index)
//! - No rendering, audio or storage dependencies

pub mod board;
pub mod card;
pub mod engine;
pub mod score;
pub mod timer;

pub use board::{Board, BoardLayout, generate};
pub use card::{Card, CardId, CardSnapshot, Visibility};
pub use engine::{EngineEvent, FlipRejected, MatchConfig, MatchEngine};
pub use score::{ScoreEngine, ScoreRecord, ScoreTuning};
pub use timer::{Scheduler, TimerToken};

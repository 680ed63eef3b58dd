//! Versioned save envelope

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::SessionState;
use crate::sim::{CardSnapshot, ScoreRecord};

/// Version tag written into every save
pub const SAVE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot of session, board and score state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBlob {
    /// Crate version that wrote the save (free-form)
    pub game_version: String,
    /// Unix timestamp (ms) when saved
    pub save_timestamp: u64,
    pub state: SessionState,
    pub board_width: u32,
    pub board_height: u32,
    /// Shuffle seed, so the same layout can be rebuilt
    #[serde(default)]
    pub board_seed: u64,
    pub score: ScoreRecord,
    /// Per-card state in board order
    pub cards: Vec<CardSnapshot>,
}

impl SaveBlob {
    pub fn is_current_version(&self) -> bool {
        self.game_version == SAVE_VERSION
    }

    /// Card list matches the board dimensions
    pub fn is_consistent(&self) -> bool {
        self.cards.len() as u64 == u64::from(self.board_width) * u64::from(self.board_height)
    }

    pub fn matched_cards(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched).count()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::Corrupt("save file is empty".to_string()));
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

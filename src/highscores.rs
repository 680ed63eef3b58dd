//! High score leaderboard system
//!
//! Tracks the top 10 final scores, ranked by score then accuracy, persisted as
//! JSON in its own blob store.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::persistence::BlobStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score (including bonuses)
    pub score: u64,
    /// Board columns × rows
    pub board: (u32, u32),
    /// Seconds taken to clear the board
    pub elapsed: f64,
    /// Matches / attempts
    pub accuracy: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Higher score wins; equal scores are ordered by accuracy
    fn outranks(score: u64, accuracy: f64, other: &HighScoreEntry) -> bool {
        score > other.score || (score == other.score && accuracy > other.accuracy)
    }

    /// Index a result would be inserted at, None if it misses the table
    fn slot(&self, score: u64, accuracy: f64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let pos = self
            .entries
            .iter()
            .position(|e| Self::outranks(score, accuracy, e))
            .unwrap_or(self.entries.len());
        (pos < MAX_HIGH_SCORES).then_some(pos)
    }

    /// Whether a final score with this accuracy would enter the leaderboard
    pub fn qualifies(&self, score: u64, accuracy: f64) -> bool {
        self.slot(score, accuracy).is_some()
    }

    /// 1-indexed rank a result would achieve
    pub fn potential_rank(&self, score: u64, accuracy: f64) -> Option<usize> {
        self.slot(score, accuracy).map(|i| i + 1)
    }

    /// Insert an entry, keeping the table sorted and capped.
    /// Returns the 1-indexed rank, or None if it did not qualify.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let pos = self.slot(entry.score, entry.accuracy)?;
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best entry for a given board size
    pub fn best_for(&self, board: (u32, u32)) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.board == board)
    }

    /// Load high scores from a store (empty on missing or unreadable data)
    pub fn load(store: &dyn BlobStore) -> Self {
        if let Ok(Some(bytes)) = store.read() {
            if let Ok(scores) = serde_json::from_slice::<HighScores>(&bytes) {
                log::info!("Loaded {} high scores", scores.entries.len());
                return scores;
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to a store
    pub fn save(&self, store: &mut dyn BlobStore) -> Result<()> {
        let json = serde_json::to_vec(self)?;
        store.write(&json).map_err(Error::Io)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

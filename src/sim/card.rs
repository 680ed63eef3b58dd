//! Per-tile card state
//!
//! A card never references the engine that owns it; all coordination
//! (pending set, timers, scoring) happens in [`super::engine::MatchEngine`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identity shared by exactly the cards that form a pair
pub type CardId = u32;

/// Visibility of a single card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Hidden, can be flipped
    FaceDown,
    /// Flip transition in progress (`face_up` is the target side)
    Flipping { face_up: bool },
    /// Revealed, waiting for resolution
    FaceUp,
    /// Part of a resolved pair; terminal
    Matched,
}

/// Saved per-card state, positional within the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub card_id: CardId,
    pub is_matched: bool,
    pub is_face_up: bool,
}

/// One tile on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Position in the board (row-major)
    pub index: usize,
    /// Pair identity
    pub card_id: CardId,
    /// Center position from the board layout
    pub position: Vec2,
    visibility: Visibility,
    interaction_locked: bool,
}

impl Card {
    pub fn new(index: usize, card_id: CardId, position: Vec2) -> Self {
        Self {
            index,
            card_id,
            position,
            visibility: Visibility::FaceDown,
            interaction_locked: false,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_locked(&self) -> bool {
        self.interaction_locked
    }

    pub fn is_matched(&self) -> bool {
        self.visibility == Visibility::Matched
    }

    /// Face up, or on its way there
    pub fn is_showing(&self) -> bool {
        matches!(
            self.visibility,
            Visibility::FaceUp | Visibility::Flipping { face_up: true }
        )
    }

    /// Whether a player flip request may target this card
    pub fn can_flip(&self) -> bool {
        self.visibility == Visibility::FaceDown && !self.interaction_locked
    }

    /// Lock/unlock player interaction. Matched cards stay locked.
    pub fn set_locked(&mut self, locked: bool) {
        if self.is_matched() {
            return;
        }
        self.interaction_locked = locked;
    }

    /// Start a flip toward the given side.
    ///
    /// Returns false if the card is matched or already flipping.
    pub fn begin_flip(&mut self, face_up: bool) -> bool {
        match self.visibility {
            Visibility::Matched | Visibility::Flipping { .. } => false,
            Visibility::FaceDown if face_up => {
                self.visibility = Visibility::Flipping { face_up: true };
                true
            }
            Visibility::FaceUp if !face_up => {
                self.visibility = Visibility::Flipping { face_up: false };
                true
            }
            _ => false,
        }
    }

    /// Finish the current flip transition.
    ///
    /// Returns the new visibility, or None if the card was not flipping.
    pub fn complete_flip(&mut self) -> Option<Visibility> {
        let Visibility::Flipping { face_up } = self.visibility else {
            return None;
        };
        self.visibility = if face_up {
            Visibility::FaceUp
        } else {
            Visibility::FaceDown
        };
        Some(self.visibility)
    }

    /// Mark as matched. Only legal from FaceUp.
    pub fn mark_matched(&mut self) -> bool {
        if self.visibility != Visibility::FaceUp {
            return false;
        }
        self.visibility = Visibility::Matched;
        self.interaction_locked = true;
        true
    }

    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            card_id: self.card_id,
            is_matched: self.is_matched(),
            is_face_up: !self.is_matched() && self.is_showing(),
        }
    }

    /// Apply saved flags directly (restore path, no transition)
    pub(crate) fn restore_flags(&mut self, matched: bool, face_up: bool) {
        if matched {
            self.visibility = Visibility::Matched;
            self.interaction_locked = true;
        } else if face_up {
            self.visibility = Visibility::FaceUp;
        }
    }

    /// Put a face-up card straight back face down (restore overflow)
    pub(crate) fn hide_immediately(&mut self) {
        if self.visibility == Visibility::FaceUp {
            self.visibility = Visibility::FaceDown;
        }
    }
}

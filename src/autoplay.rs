//! Auto-play agent
//!
//! A perfect-memory player used by the demo binary and the end-to-end tests.
//! It remembers every card it has seen face up and prefers known pairs;
//! otherwise it explores an unseen card picked with a seeded RNG.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::session::{Session, SessionState};
use crate::sim::{Card, CardId};

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    /// Card index → id, for unmatched cards seen face up
    memory: BTreeMap<usize, CardId>,
    rng: Pcg32,
}

impl AutoPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            memory: BTreeMap::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn known_cards(&self) -> usize {
        self.memory.len()
    }

    /// Update memory from the cards currently on the table
    pub fn observe(&mut self, cards: &[Card]) {
        for card in cards {
            if card.is_matched() {
                self.memory.remove(&card.index);
            } else if card.is_showing() {
                self.memory.insert(card.index, card.card_id);
            }
        }
    }

    /// Pick the next card to flip, if a flip is currently allowed
    pub fn choose(&mut self, cards: &[Card], pending: &[usize], flip_limit: usize) -> Option<usize> {
        if pending.len() >= flip_limit {
            return None;
        }
        let flippable: Vec<usize> = cards
            .iter()
            .filter(|c| c.can_flip())
            .map(|c| c.index)
            .collect();
        if flippable.is_empty() {
            return None;
        }

        let known = |id: CardId| -> Vec<usize> {
            flippable
                .iter()
                .copied()
                .filter(|i| self.memory.get(i) == Some(&id))
                .collect()
        };

        if let Some(&first) = pending.first() {
            // Complete the batch with a remembered partner
            if let Some(partner) = cards
                .get(first)
                .and_then(|c| known(c.card_id).first().copied())
            {
                return Some(partner);
            }
        } else {
            // Start a batch we already know will match
            let mut counts: BTreeMap<CardId, usize> = BTreeMap::new();
            for i in &flippable {
                if let Some(&id) = self.memory.get(i) {
                    *counts.entry(id).or_insert(0) += 1;
                }
            }
            if let Some((&id, _)) = counts.iter().find(|&(_, &n)| n >= flip_limit) {
                return known(id).first().copied();
            }
        }

        let unseen: Vec<usize> = flippable
            .iter()
            .copied()
            .filter(|i| !self.memory.contains_key(i))
            .collect();
        let pool = if unseen.is_empty() { &flippable } else { &unseen };
        Some(pool[self.rng.random_range(0..pool.len())])
    }

    /// Observe, flip if possible, then advance the session by `dt`.
    ///
    /// Returns the index flipped this step, if any.
    pub fn step(&mut self, session: &mut Session, dt: f64) -> Option<usize> {
        let choice = session.engine().and_then(|engine| {
            self.observe(engine.cards());
            self.choose(engine.cards(), engine.pending(), engine.config().flip_limit)
        });
        let flipped = choice.filter(|&i| session.request_flip(i).is_ok());
        session.advance(dt);
        flipped
    }

    /// Play until the session leaves Playing or `max_steps` run out.
    ///
    /// Returns the number of steps taken.
    pub fn play(&mut self, session: &mut Session, dt: f64, max_steps: usize) -> usize {
        let mut steps = 0;
        while session.state() == SessionState::Playing && steps < max_steps {
            self.step(session, dt);
            steps += 1;
        }
        steps
    }
}

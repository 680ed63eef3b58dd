//! Flip-and-match engine
//!
//! Owns the cards of the active board and enforces the turn rules:
//!
//! - A flip is accepted only for a face-down, unlocked card while the pending
//!   set is below the concurrent-flip limit.
//! - Once the pending set is full and every pending card is face up, the batch
//!   is handed to a resolution: after the grace interval it matches iff all
//!   cards share one id; otherwise the cards stay visible for the mismatch
//!   delay and then flip back silently.
//! - At most one resolution is in flight. A second full batch waits for it.
//! - When nothing matchable remains, the board-cleared signal fires after the
//!   completion delay.
//!
//! All timing runs on an owned [`Scheduler`]. Dropping the engine drops every
//! continuation tied to its board.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, BoardLayout};
use super::card::{Card, CardId, CardSnapshot, Visibility};
use super::timer::{Scheduler, TimerToken};
use crate::consts::*;

/// Timing and rule parameters for the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Cards that may be face up awaiting resolution at once
    pub flip_limit: usize,
    /// Seconds between the pending set filling and evaluation
    pub grace_interval: f64,
    /// Seconds mismatched cards stay visible
    pub mismatch_delay: f64,
    /// Seconds between the last match and the board-cleared signal
    pub completion_delay: f64,
    /// Seconds a flip transition takes when the engine completes it itself
    pub flip_duration: f64,
    /// Complete flips on a timer instead of waiting for the view
    pub auto_complete_flips: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            flip_limit: DEFAULT_FLIP_LIMIT,
            grace_interval: GRACE_INTERVAL,
            mismatch_delay: MISMATCH_DELAY,
            completion_delay: COMPLETION_DELAY,
            flip_duration: FLIP_DURATION,
            auto_complete_flips: true,
        }
    }
}

/// Why a flip request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipRejected {
    /// No card at that index
    OutOfBounds,
    /// Card is already part of a resolved pair
    AlreadyMatched,
    /// Card is face up or mid-transition
    NotFaceDown,
    /// Card is interaction-locked
    Locked,
    /// Pending set is full
    LimitReached,
    /// Engine is suspended (session not playing)
    Suspended,
}

impl fmt::Display for FlipRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FlipRejected::OutOfBounds => "no card at that position",
            FlipRejected::AlreadyMatched => "card is already matched",
            FlipRejected::NotFaceDown => "card is not face down",
            FlipRejected::Locked => "card is locked",
            FlipRejected::LimitReached => "too many cards face up",
            FlipRejected::Suspended => "game is not running",
        };
        f.write_str(reason)
    }
}

/// Notifications produced by the engine, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A flip toward face up was accepted; the view should animate it
    FlipRequested { index: usize },
    /// A flip transition finished
    FlipCompleted { index: usize, visibility: Visibility },
    /// A full batch shared one id
    Matched {
        cards: Vec<usize>,
        card_id: CardId,
        at: f64,
    },
    /// A full batch did not match
    Mismatched { cards: Vec<usize>, at: f64 },
    /// Mismatched cards started flipping back (no cue)
    Hidden { cards: Vec<usize> },
    /// Nothing matchable remains
    BoardCleared { at: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    FlipComplete(usize),
    Resolve,
    FlipBack,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting out the grace interval
    Grace,
    /// Mismatch shown, waiting to flip back
    MismatchHold,
}

#[derive(Debug, Clone)]
struct Resolution {
    cards: Vec<usize>,
    phase: Phase,
}

/// The flip/match engine for one board
#[derive(Debug, Clone)]
pub struct MatchEngine {
    width: u32,
    height: u32,
    seed: u64,
    layout: BoardLayout,
    cards: Vec<Card>,
    config: MatchConfig,
    /// Face-up (or flipping up) cards not yet handed to a resolution
    pending: Vec<usize>,
    resolution: Option<Resolution>,
    /// Auto-completion timer per card
    flip_timers: Vec<Option<TimerToken>>,
    completion_scheduled: bool,
    cleared_signalled: bool,
    suspended: bool,
    scheduler: Scheduler<Task>,
    events: Vec<EngineEvent>,
}

impl MatchEngine {
    /// `flip_limit` is raised to `MIN_FLIP_LIMIT` if set lower
    pub fn new(board: Board, mut config: MatchConfig) -> Self {
        config.flip_limit = config.flip_limit.max(MIN_FLIP_LIMIT);
        let flip_timers = vec![None; board.cards.len()];
        Self {
            width: board.width,
            height: board.height,
            seed: board.seed,
            layout: board.layout,
            cards: board.cards,
            config,
            pending: Vec::with_capacity(config.flip_limit),
            resolution: None,
            flip_timers,
            completion_scheduled: false,
            cleared_signalled: false,
            suspended: false,
            scheduler: Scheduler::new(),
            events: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn layout(&self) -> BoardLayout {
        self.layout
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Board time in seconds (frozen while suspended)
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Cards awaiting a resolution slot
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    /// Cards of the in-flight resolution, if any
    pub fn resolving(&self) -> Option<&[usize]> {
        self.resolution.as_ref().map(|r| r.cards.as_slice())
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count() / 2
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    /// Take all notifications produced since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Per-card state in board order, for saving
    pub fn snapshot(&self) -> Vec<CardSnapshot> {
        self.cards.iter().map(Card::snapshot).collect()
    }

    /// True when no id has enough unmatched copies left to form a batch
    pub fn is_cleared(&self) -> bool {
        let mut remaining: HashMap<CardId, usize> = HashMap::new();
        for card in self.cards.iter().filter(|c| !c.is_matched()) {
            *remaining.entry(card.card_id).or_insert(0) += 1;
        }
        remaining.values().all(|&n| n < self.config.flip_limit)
    }

    /// Lock or unlock a card for player interaction
    pub fn set_card_locked(&mut self, index: usize, locked: bool) -> bool {
        match self.cards.get_mut(index) {
            Some(card) => {
                card.set_locked(locked);
                true
            }
            None => false,
        }
    }

    /// Player (or test agent) asks to reveal a card
    pub fn request_flip(&mut self, index: usize) -> Result<(), FlipRejected> {
        if self.suspended {
            return Err(FlipRejected::Suspended);
        }
        let card = self.cards.get(index).ok_or(FlipRejected::OutOfBounds)?;
        if card.is_matched() {
            return Err(FlipRejected::AlreadyMatched);
        }
        if card.visibility() != Visibility::FaceDown {
            return Err(FlipRejected::NotFaceDown);
        }
        if card.is_locked() {
            return Err(FlipRejected::Locked);
        }
        if self.pending.len() >= self.config.flip_limit {
            return Err(FlipRejected::LimitReached);
        }

        self.cards[index].begin_flip(true);
        self.pending.push(index);
        self.events.push(EngineEvent::FlipRequested { index });
        self.arm_flip_timer(index);
        log::debug!("Flip accepted at {} ({} pending)", index, self.pending.len());
        Ok(())
    }

    /// The view finished animating a flip.
    ///
    /// Returns false when the card was not mid-transition (signal ignored).
    pub fn complete_flip(&mut self, index: usize) -> bool {
        if let Some(token) = self.flip_timers.get_mut(index).and_then(Option::take) {
            self.scheduler.cancel(token);
        }
        self.finish_flip(index)
    }

    /// Advance board time by `dt` seconds, running every continuation that
    /// comes due in order
    pub fn advance(&mut self, dt: f64) {
        if self.suspended {
            return;
        }
        let target = self.scheduler.now() + dt.max(0.0);
        while let Some(task) = self.scheduler.pop_due(target) {
            self.run(task);
        }
        self.scheduler.set_now(target);
    }

    /// Cancel every scheduled continuation and refuse input
    pub fn suspend(&mut self) {
        if self.suspended {
            return;
        }
        self.suspended = true;
        self.scheduler.cancel_all();
        self.flip_timers.iter_mut().for_each(|t| *t = None);
        log::debug!("Engine suspended at {:.2}s", self.now());
    }

    /// Re-arm whatever was in flight when the engine was suspended.
    ///
    /// Interrupted waits restart from their full duration.
    pub fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;

        let flipping: Vec<usize> = self
            .cards
            .iter()
            .filter(|c| matches!(c.visibility(), Visibility::Flipping { .. }))
            .map(|c| c.index)
            .collect();
        for index in flipping {
            self.arm_flip_timer(index);
        }

        if let Some(phase) = self.resolution.as_ref().map(|r| r.phase) {
            match phase {
                Phase::Grace => {
                    self.scheduler.schedule(self.config.grace_interval, Task::Resolve);
                }
                Phase::MismatchHold => {
                    self.scheduler.schedule(self.config.mismatch_delay, Task::FlipBack);
                }
            }
        }
        if self.completion_scheduled && !self.cleared_signalled {
            self.scheduler
                .schedule(self.config.completion_delay, Task::Complete);
        }
        self.try_begin_resolution();
    }

    /// Apply saved per-card state positionally.
    ///
    /// Only the overlapping prefix is applied; positions whose saved id
    /// differs from the rebuilt card are skipped. Face-up unmatched cards
    /// re-enter the pending set up to the flip limit, the rest are turned
    /// back down. Returns the number of positions applied.
    pub fn restore(&mut self, saved: &[CardSnapshot]) -> usize {
        if saved.len() != self.cards.len() {
            log::warn!(
                "Saved board has {} cards, rebuilt board has {}; restoring the first {}",
                saved.len(),
                self.cards.len(),
                saved.len().min(self.cards.len())
            );
        }

        let mut applied = 0;
        for (card, snap) in self.cards.iter_mut().zip(saved) {
            if card.card_id != snap.card_id {
                log::debug!(
                    "Card {} id mismatch (saved {}, rebuilt {}), left face down",
                    card.index,
                    snap.card_id,
                    card.card_id
                );
                continue;
            }
            card.restore_flags(snap.is_matched, snap.is_face_up);
            applied += 1;
        }

        self.pending.clear();
        for index in 0..self.cards.len() {
            if self.cards[index].visibility() != Visibility::FaceUp {
                continue;
            }
            if self.pending.len() < self.config.flip_limit {
                self.pending.push(index);
            } else {
                self.cards[index].hide_immediately();
            }
        }
        self.try_begin_resolution();
        applied
    }

    fn arm_flip_timer(&mut self, index: usize) {
        if !self.config.auto_complete_flips {
            return;
        }
        let token = self
            .scheduler
            .schedule(self.config.flip_duration, Task::FlipComplete(index));
        if let Some(slot) = self.flip_timers.get_mut(index) {
            *slot = Some(token);
        }
    }

    fn finish_flip(&mut self, index: usize) -> bool {
        let Some(visibility) = self.cards.get_mut(index).and_then(Card::complete_flip) else {
            return false;
        };
        self.events
            .push(EngineEvent::FlipCompleted { index, visibility });
        if visibility == Visibility::FaceUp {
            self.try_begin_resolution();
        }
        true
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::FlipComplete(index) => {
                if let Some(slot) = self.flip_timers.get_mut(index) {
                    *slot = None;
                }
                self.finish_flip(index);
            }
            Task::Resolve => self.resolve(),
            Task::FlipBack => self.flip_back(),
            Task::Complete => {
                self.cleared_signalled = true;
                self.events
                    .push(EngineEvent::BoardCleared { at: self.now() });
                log::debug!("Board cleared at {:.2}s", self.now());
            }
        }
    }

    /// Hand a full, fully revealed pending set to a new resolution
    fn try_begin_resolution(&mut self) {
        if self.suspended || self.resolution.is_some() {
            return;
        }
        if self.pending.len() < self.config.flip_limit {
            return;
        }
        let batch = &self.pending[..self.config.flip_limit];
        if !batch
            .iter()
            .all(|&i| self.cards[i].visibility() == Visibility::FaceUp)
        {
            return;
        }

        let cards: Vec<usize> = self.pending.drain(..self.config.flip_limit).collect();
        for &i in &cards {
            self.cards[i].set_locked(true);
        }
        self.scheduler
            .schedule(self.config.grace_interval, Task::Resolve);
        self.resolution = Some(Resolution {
            cards,
            phase: Phase::Grace,
        });
    }

    fn resolve(&mut self) {
        let Some(resolution) = self.resolution.as_mut() else {
            return;
        };
        let first = self.cards[resolution.cards[0]].card_id;
        let is_match = resolution
            .cards
            .iter()
            .all(|&i| self.cards[i].card_id == first);
        let at = self.scheduler.now();

        if is_match {
            let cards = std::mem::take(&mut resolution.cards);
            self.resolution = None;
            for &i in &cards {
                self.cards[i].mark_matched();
            }
            log::debug!("Matched id {} at {:?}", first, cards);
            self.events.push(EngineEvent::Matched {
                cards,
                card_id: first,
                at,
            });

            if self.is_cleared() {
                self.completion_scheduled = true;
                self.scheduler
                    .schedule(self.config.completion_delay, Task::Complete);
            } else {
                self.try_begin_resolution();
            }
        } else {
            resolution.phase = Phase::MismatchHold;
            let cards = resolution.cards.clone();
            log::debug!("Mismatch at {:?}", cards);
            self.events.push(EngineEvent::Mismatched { cards, at });
            self.scheduler
                .schedule(self.config.mismatch_delay, Task::FlipBack);
        }
    }

    fn flip_back(&mut self) {
        let Some(resolution) = self.resolution.take() else {
            return;
        };
        for &i in &resolution.cards {
            self.cards[i].set_locked(false);
            if self.cards[i].begin_flip(false) {
                self.arm_flip_timer(i);
            }
        }
        self.events.push(EngineEvent::Hidden {
            cards: resolution.cards,
        });
        self.try_begin_resolution();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::generate;

    fn engine(width: u32, height: u32, seed: u64) -> MatchEngine {
        let board = generate(width, height, (width * height) / 2, seed).unwrap();
        MatchEngine::new(board, MatchConfig::default())
    }

    /// Two indices sharing an id, and one index with a different id
    fn pair_and_other(engine: &MatchEngine) -> (usize, usize, usize) {
        let cards = engine.cards();
        let a = 0;
        let b = cards
            .iter()
            .position(|c| c.index != a && c.card_id == cards[a].card_id)
            .unwrap();
        let other = cards
            .iter()
            .position(|c| c.card_id != cards[a].card_id)
            .unwrap();
        (a, b, other)
    }

    fn count_matches(events: &[EngineEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Matched { .. }))
            .count()
    }

    #[test]
    fn test_match_path() {
        let mut e = engine(4, 4, 1);
        let (a, b, _) = pair_and_other(&e);

        e.request_flip(a).unwrap();
        e.request_flip(b).unwrap();
        e.advance(FLIP_DURATION);
        // Grace interval not yet over
        assert_eq!(count_matches(&e.drain_events()), 0);

        e.advance(GRACE_INTERVAL);
        let events = e.drain_events();
        assert_eq!(count_matches(&events), 1);
        assert!(e.card(a).unwrap().is_matched());
        assert!(e.card(b).unwrap().is_matched());
        assert_eq!(e.matched_pairs(), 1);
        assert!(e.resolving().is_none());
        assert!(e.pending().is_empty());
    }

    #[test]
    fn test_mismatch_path_flips_back() {
        let mut e = engine(4, 4, 2);
        let (a, _, other) = pair_and_other(&e);

        e.request_flip(a).unwrap();
        e.request_flip(other).unwrap();
        e.advance(FLIP_DURATION + GRACE_INTERVAL);
        let events = e.drain_events();
        assert!(events
            .iter()
            .any(|ev| matches!(ev, EngineEvent::Mismatched { .. })));
        // Still visible during the hold
        assert_eq!(e.card(a).unwrap().visibility(), Visibility::FaceUp);

        e.advance(MISMATCH_DELAY);
        assert!(e
            .drain_events()
            .iter()
            .any(|ev| matches!(ev, EngineEvent::Hidden { .. })));
        e.advance(FLIP_DURATION);
        assert_eq!(e.card(a).unwrap().visibility(), Visibility::FaceDown);
        assert_eq!(e.card(other).unwrap().visibility(), Visibility::FaceDown);
        assert!(e.resolving().is_none());
    }

    #[test]
    fn test_limit_rejects_third_flip() {
        let mut e = engine(4, 4, 3);
        e.request_flip(0).unwrap();
        e.request_flip(1).unwrap();
        assert_eq!(e.request_flip(2), Err(FlipRejected::LimitReached));
    }

    #[test]
    fn test_rejects_invalid_targets() {
        let mut e = engine(2, 2, 4);
        assert_eq!(e.request_flip(9), Err(FlipRejected::OutOfBounds));
        e.request_flip(0).unwrap();
        assert_eq!(e.request_flip(0), Err(FlipRejected::NotFaceDown));
        e.set_card_locked(1, true);
        assert_eq!(e.request_flip(1), Err(FlipRejected::Locked));
    }

    #[test]
    fn test_can_flip_during_mismatch_hold() {
        let mut e = engine(4, 4, 5);
        let (a, _, other) = pair_and_other(&e);
        e.request_flip(a).unwrap();
        e.request_flip(other).unwrap();
        e.advance(FLIP_DURATION + GRACE_INTERVAL);
        assert!(e.resolving().is_some());

        let free: Vec<usize> = (0..16).filter(|&i| i != a && i != other).collect();
        assert!(e.request_flip(free[0]).is_ok());
        assert!(e.request_flip(free[1]).is_ok());
        assert_eq!(e.request_flip(free[2]), Err(FlipRejected::LimitReached));
    }

    #[test]
    fn test_second_batch_waits_for_first_resolution() {
        let mut e = engine(4, 4, 6);
        let (a, _, other) = pair_and_other(&e);
        e.request_flip(a).unwrap();
        e.request_flip(other).unwrap();
        e.advance(FLIP_DURATION + GRACE_INTERVAL);
        e.drain_events();

        let free: Vec<usize> = (0..16).filter(|&i| i != a && i != other).collect();
        e.request_flip(free[0]).unwrap();
        e.request_flip(free[1]).unwrap();
        e.advance(FLIP_DURATION);
        // First batch still holds the resolution slot
        assert_eq!(e.pending().len(), 2);
        assert_eq!(e.resolving().unwrap().len(), 2);

        e.advance(MISMATCH_DELAY);
        // First batch flipped back, second batch now resolving
        assert_eq!(e.resolving().unwrap(), &free[..2]);
        assert!(e.pending().is_empty());
    }

    #[test]
    fn test_completion_ignored_until_pending_full() {
        let mut cfg = MatchConfig::default();
        cfg.auto_complete_flips = false;
        let board = generate(4, 4, 8, 7).unwrap();
        let mut e = MatchEngine::new(board, cfg);

        e.request_flip(0).unwrap();
        assert!(e.complete_flip(0));
        e.advance(5.0);
        assert!(e.resolving().is_none());
        assert_eq!(e.pending(), &[0]);
        // A second signal for the same card is ignored
        assert!(!e.complete_flip(0));
    }

    #[test]
    fn test_sibling_finishing_first() {
        let mut cfg = MatchConfig::default();
        cfg.auto_complete_flips = false;
        let board = generate(4, 4, 8, 8).unwrap();
        let mut e = MatchEngine::new(board, cfg);

        e.request_flip(0).unwrap();
        e.request_flip(1).unwrap();
        e.complete_flip(1);
        assert!(e.resolving().is_none());
        e.complete_flip(0);
        assert!(e.resolving().is_some());
    }

    #[test]
    fn test_three_card_batches() {
        let mut cfg = MatchConfig::default();
        cfg.flip_limit = 3;
        // 2 images on 12 cells: each id appears 6 times
        let board = generate(4, 3, 2, 9).unwrap();
        let mut e = MatchEngine::new(board, cfg);
        let id = e.card(0).unwrap().card_id;
        let same: Vec<usize> = e
            .cards()
            .iter()
            .filter(|c| c.card_id == id)
            .map(|c| c.index)
            .take(3)
            .collect();

        for &i in &same {
            e.request_flip(i).unwrap();
        }
        e.advance(FLIP_DURATION + GRACE_INTERVAL);
        assert_eq!(count_matches(&e.drain_events()), 1);
        assert!(same.iter().all(|&i| e.card(i).unwrap().is_matched()));
    }

    #[test]
    fn test_clearing_board_signals_after_delay() {
        let mut e = engine(2, 2, 10);
        let (a, b, _) = pair_and_other(&e);
        let rest: Vec<usize> = (0..4).filter(|&i| i != a && i != b).collect();

        e.request_flip(a).unwrap();
        e.request_flip(b).unwrap();
        e.advance(FLIP_DURATION + GRACE_INTERVAL);
        e.request_flip(rest[0]).unwrap();
        e.request_flip(rest[1]).unwrap();
        e.advance(FLIP_DURATION + GRACE_INTERVAL);
        assert!(e.is_cleared());
        let events = e.drain_events();
        assert!(!events
            .iter()
            .any(|ev| matches!(ev, EngineEvent::BoardCleared { .. })));

        e.advance(COMPLETION_DELAY);
        assert!(e
            .drain_events()
            .iter()
            .any(|ev| matches!(ev, EngineEvent::BoardCleared { .. })));
        assert_eq!(e.matched_pairs(), e.total_pairs());
    }

    #[test]
    fn test_suspend_cancels_and_resume_rearms() {
        let mut e = engine(4, 4, 11);
        let (a, b, _) = pair_and_other(&e);
        e.request_flip(a).unwrap();
        e.request_flip(b).unwrap();
        e.advance(FLIP_DURATION);

        e.suspend();
        assert_eq!(e.request_flip(5), Err(FlipRejected::Suspended));
        e.advance(10.0);
        assert_eq!(count_matches(&e.drain_events()), 0);

        e.resume();
        e.advance(GRACE_INTERVAL);
        assert_eq!(count_matches(&e.drain_events()), 1);
    }

    #[test]
    fn test_restore_prefix_and_pending() {
        let mut source = engine(4, 4, 12);
        let (a, b, _) = pair_and_other(&source);
        source.request_flip(a).unwrap();
        source.request_flip(b).unwrap();
        source.advance(FLIP_DURATION + GRACE_INTERVAL);
        let saved = source.snapshot();

        let mut restored = engine(4, 4, 12);
        assert_eq!(restored.restore(&saved), 16);
        assert_eq!(restored.matched_pairs(), 1);
        assert_eq!(restored.snapshot(), saved);

        let mut partial = engine(4, 4, 12);
        assert_eq!(partial.restore(&saved[..8]), 8);
        for i in 8..16 {
            assert_eq!(partial.card(i).unwrap().visibility(), Visibility::FaceDown);
        }
    }

    #[test]
    fn test_flip_limit_below_two_is_raised() {
        let cfg = MatchConfig {
            flip_limit: 0,
            ..MatchConfig::default()
        };
        let board = generate(4, 4, 8, 14).unwrap();
        let mut e = MatchEngine::new(board, cfg);
        assert_eq!(e.config().flip_limit, MIN_FLIP_LIMIT);

        let saved: Vec<CardSnapshot> = e
            .cards()
            .iter()
            .map(|c| CardSnapshot {
                card_id: c.card_id,
                is_matched: false,
                is_face_up: c.index == 0,
            })
            .collect();
        e.restore(&saved);
        e.advance(5.0);
        assert!(e.resolving().is_none());
        assert_eq!(e.pending(), &[0]);
    }

    #[test]
    fn test_restore_face_up_overflow() {
        let mut e = engine(4, 4, 13);
        let saved: Vec<CardSnapshot> = e
            .cards()
            .iter()
            .map(|c| CardSnapshot {
                card_id: c.card_id,
                is_matched: false,
                is_face_up: c.index < 3,
            })
            .collect();
        e.restore(&saved);
        assert_eq!(e.card(2).unwrap().visibility(), Visibility::FaceDown);
        assert_eq!(e.resolving().unwrap(), &[0, 1]);
    }
}

//! Session state machine
//!
//! Top-level orchestrator. Owns the match engine for the active board, the
//! score engine and the persistence adapter, and publishes everything the
//! presentation layer needs through [`SessionEvent`] observers.
//!
//! Transitions:
//! - `start_new_game` / `restart`: any → Playing
//! - `pause`: Playing → Paused
//! - `resume`: Paused → Playing
//! - board cleared: Playing → GameWon
//! - time limit reached: Playing → GameOver
//! - `quit_to_menu`: any → Menu
//! - `load_game`: restored save → Playing, otherwise a new game
//!
//! Setting the current state again is a no-op and publishes nothing.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::cues::{Cue, CuePlayer, CueSink};
use crate::error::{Error, Result};
use crate::events::{Observers, SubscriptionId};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::persistence::{AutoSave, Persistence, SAVE_VERSION, SaveBlob};
use crate::platform::{LifecycleEvent, unix_timestamp_ms};
use crate::settings::Settings;
use crate::sim::{
    Card, CardId, EngineEvent, FlipRejected, MatchEngine, ScoreEngine, ScoreRecord, Visibility,
    generate,
};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Title screen, no board in play
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay frozen, timers cancelled
    Paused,
    /// Board cleared
    GameWon,
    /// Time limit reached
    GameOver,
}

/// Notifications published to observers, in the order they happen
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    /// Board cleared; carries the score including bonuses
    Won { final_score: u64 },
    /// Published after every match, mismatch, reset and load
    ScoreChanged(ScoreRecord),
    /// A flip was accepted; animate it and call `complete_flip`
    FlipRequested { index: usize },
    FlipCompleted { index: usize, visibility: Visibility },
    CardsMatched { cards: Vec<usize>, card_id: CardId },
    CardsMismatched { cards: Vec<usize> },
    /// Mismatched cards are flipping back face down
    CardsHidden { cards: Vec<usize> },
    /// Restored save came from another version
    CompatibilityWarning { message: String },
    /// A save attempt failed; the session carries on in memory
    SaveFailed { reason: String },
    /// Final score entered the leaderboard
    HighScore { rank: usize },
}

/// What `load_game` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Save restored
    Restored,
    /// No usable save; a fresh game was started
    NewGame,
}

pub struct Session {
    settings: Settings,
    state: SessionState,
    engine: Option<MatchEngine>,
    score: ScoreEngine,
    persistence: Persistence,
    autosave: AutoSave,
    observers: Observers<SessionEvent>,
    cues: CuePlayer,
    high_scores: HighScores,
    /// Source of per-board shuffle seeds
    rng: Pcg32,
    final_score: Option<u64>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("board", &(self.board_width(), self.board_height()))
            .field("score", &self.score())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session in the Menu state with in-memory persistence
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the settings do not validate.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let mut cues = CuePlayer::new();
        cues.set_muted(settings.mute_cues);
        Ok(Self {
            score: ScoreEngine::new(settings.scoring),
            autosave: AutoSave::new(settings.autosave_interval),
            settings,
            state: SessionState::Menu,
            engine: None,
            persistence: Persistence::in_memory(),
            observers: Observers::new(),
            cues,
            high_scores: HighScores::new(),
            rng: Pcg32::seed_from_u64(unix_timestamp_ms()),
            final_score: None,
        })
    }

    /// Seed board shuffles deterministically
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.high_scores = high_scores;
        self
    }

    // === Queries ===

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> Option<&MatchEngine> {
        self.engine.as_ref()
    }

    pub fn cards(&self) -> &[Card] {
        self.engine.as_ref().map_or(&[], |e| e.cards())
    }

    /// Columns of the active board (configured width before the first game)
    pub fn board_width(&self) -> u32 {
        self.engine
            .as_ref()
            .map_or(self.settings.board_width, |e| e.width())
    }

    pub fn board_height(&self) -> u32 {
        self.engine
            .as_ref()
            .map_or(self.settings.board_height, |e| e.height())
    }

    /// Board time in seconds
    pub fn now(&self) -> f64 {
        self.engine.as_ref().map_or(0.0, |e| e.now())
    }

    pub fn score(&self) -> ScoreRecord {
        self.score.record(self.now())
    }

    pub fn matched_pairs(&self) -> usize {
        self.engine.as_ref().map_or(0, |e| e.matched_pairs())
    }

    pub fn total_pairs(&self) -> usize {
        self.engine.as_ref().map_or(0, |e| e.total_pairs())
    }

    /// Final score of the last won game
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn has_saved_game(&self) -> bool {
        self.persistence.has_save()
    }

    // === Wiring ===

    pub fn subscribe(&mut self, callback: impl FnMut(&SessionEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn set_cue_sink(&mut self, sink: Box<dyn CueSink>) {
        self.cues.set_sink(sink);
    }

    pub fn set_cues_muted(&mut self, muted: bool) {
        self.cues.set_muted(muted);
    }

    // === Lifecycle ===

    /// Build a fresh board and start playing
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the board cannot be generated; the
    /// previous board and state are left untouched.
    pub fn start_new_game(&mut self) -> Result<()> {
        let seed = self.rng.next_u64();
        let board = generate(
            self.settings.board_width,
            self.settings.board_height,
            self.settings.image_count,
            seed,
        )?;
        log::info!(
            "Started new game: {}x{} board, seed {}",
            board.width,
            board.height,
            seed
        );

        self.engine = Some(MatchEngine::new(board, self.settings.matching));
        self.final_score = None;
        self.autosave.reset(0.0);
        let record = self.score.reset(0.0);
        self.observers.emit(&SessionEvent::ScoreChanged(record));
        self.set_state(SessionState::Playing);
        Ok(())
    }

    /// Alias of [`Session::start_new_game`]
    pub fn restart(&mut self) -> Result<()> {
        self.start_new_game()
    }

    /// Playing → Paused. Returns false in any other state.
    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.suspend();
        }
        self.set_state(SessionState::Paused)
    }

    /// Paused → Playing. Returns false in any other state.
    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.resume();
        }
        self.set_state(SessionState::Playing)
    }

    /// Leave the board and go back to the title screen, saving an unfinished game
    pub fn quit_to_menu(&mut self) {
        if self.state == SessionState::Playing {
            self.save_quietly();
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.suspend();
        }
        self.set_state(SessionState::Menu);
    }

    /// Restore the saved game, or start a new one if there is none usable
    ///
    /// # Errors
    ///
    /// Only fails if the fallback new game cannot be generated.
    pub fn load_game(&mut self) -> Result<LoadOutcome> {
        match self.restore_saved() {
            Ok(()) => Ok(LoadOutcome::Restored),
            Err(e) => {
                match e {
                    Error::NotFound => log::info!("No saved game, starting fresh"),
                    Error::Corrupt(_) => log::warn!("Saved game unusable ({}), starting fresh", e),
                    _ => log::warn!("Could not load saved game ({}), starting fresh", e),
                }
                self.start_new_game()?;
                Ok(LoadOutcome::NewGame)
            }
        }
    }

    fn restore_saved(&mut self) -> Result<()> {
        let loaded = self.persistence.load()?;
        let blob = loaded.blob;
        if !blob.is_consistent() {
            log::warn!(
                "Save lists {} cards for a {}x{} board",
                blob.cards.len(),
                blob.board_width,
                blob.board_height
            );
        }

        let board = generate(
            blob.board_width,
            blob.board_height,
            self.settings.image_count,
            blob.board_seed,
        )
        .map_err(|e| Error::Corrupt(e.to_string()))?;
        let mut engine = MatchEngine::new(board, self.settings.matching);
        let applied = engine.restore(&blob.cards);
        if engine.is_cleared() {
            return Err(Error::Corrupt("saved board has nothing left to match".into()));
        }

        log::info!(
            "Restored {}x{} game ({} card states, score {})",
            engine.width(),
            engine.height(),
            applied,
            blob.score.score
        );
        self.engine = Some(engine);
        self.final_score = None;
        self.autosave.reset(0.0);
        let record = self.score.restore(blob.score, 0.0);
        self.observers.emit(&SessionEvent::ScoreChanged(record));
        if let Some(message) = loaded.version_warning {
            self.observers
                .emit(&SessionEvent::CompatibilityWarning { message });
        }
        self.set_state(SessionState::Playing);
        Ok(())
    }

    /// Snapshot of the current game, if a board exists
    pub fn snapshot(&self) -> Option<SaveBlob> {
        let engine = self.engine.as_ref()?;
        Some(SaveBlob {
            game_version: SAVE_VERSION.to_string(),
            save_timestamp: unix_timestamp_ms(),
            state: self.state,
            board_width: engine.width(),
            board_height: engine.height(),
            board_seed: engine.seed(),
            score: self.score.record(engine.now()),
            cards: engine.snapshot(),
        })
    }

    /// Save the current game
    ///
    /// # Errors
    ///
    /// `NotFound` when there is no board to save, `Io` when the store fails.
    /// In-memory state is never affected.
    pub fn save(&mut self) -> Result<SaveBlob> {
        let blob = self.snapshot().ok_or(Error::NotFound)?;
        self.persistence.save(&blob)?;
        Ok(blob)
    }

    /// Save, reporting failure to observers instead of the caller
    fn save_quietly(&mut self) -> bool {
        match self.save() {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Auto-save failed: {}", e);
                self.observers.emit(&SessionEvent::SaveFailed {
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn clear_saved_game(&mut self) {
        if let Err(e) = self.persistence.clear() {
            log::warn!("Could not clear saved game: {}", e);
        }
    }

    /// Host lifecycle hook: saves while playing, then auto-pauses on
    /// suspend/focus loss. Teardown also drops every observer and the cue sink.
    pub fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        if self.state == SessionState::Playing {
            self.save_quietly();
            if event.pauses() && self.settings.pause_on_focus_loss {
                self.pause();
                log::info!("Auto-paused ({:?})", event);
            }
        }
        if event == LifecycleEvent::Teardown {
            if let Some(engine) = self.engine.as_mut() {
                engine.suspend();
            }
            self.observers.clear();
            self.cues.clear_sink();
        }
    }

    // === Gameplay ===

    /// Player asks to reveal a card
    pub fn request_flip(&mut self, index: usize) -> std::result::Result<(), FlipRejected> {
        if self.state != SessionState::Playing {
            return Err(FlipRejected::Suspended);
        }
        let engine = self.engine.as_mut().ok_or(FlipRejected::Suspended)?;
        engine.request_flip(index)?;
        self.dispatch_engine_events();
        Ok(())
    }

    /// The view finished animating a flip
    pub fn complete_flip(&mut self, index: usize) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        let handled = engine.complete_flip(index);
        self.dispatch_engine_events();
        handled
    }

    /// Advance the game clock by `dt` seconds (no-op unless Playing)
    pub fn advance(&mut self, dt: f64) {
        if self.state != SessionState::Playing {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.advance(dt);
        self.dispatch_engine_events();

        if self.state != SessionState::Playing {
            return;
        }
        let now = self.now();
        if self.autosave.periodic_due(now) {
            self.autosave.mark_periodic(now);
            self.save_quietly();
        }
        if let Some(limit) = self.settings.time_limit {
            if self.score.elapsed(now) >= limit {
                self.game_over();
            }
        }
    }

    fn dispatch_engine_events(&mut self) {
        let events = match self.engine.as_mut() {
            Some(engine) => engine.drain_events(),
            None => return,
        };

        for event in events {
            match event {
                EngineEvent::FlipRequested { index } => {
                    self.cues.play(Cue::Flip);
                    self.observers
                        .emit(&SessionEvent::FlipRequested { index });
                }
                EngineEvent::FlipCompleted { index, visibility } => {
                    self.observers
                        .emit(&SessionEvent::FlipCompleted { index, visibility });
                }
                EngineEvent::Matched { cards, card_id, at } => {
                    let record = self.score.record_match(at);
                    self.cues.play(Cue::Match);
                    self.observers
                        .emit(&SessionEvent::CardsMatched { cards, card_id });
                    self.observers.emit(&SessionEvent::ScoreChanged(record));
                    self.save_quietly();
                }
                EngineEvent::Mismatched { cards, at } => {
                    let record = self.score.record_mismatch(at);
                    self.cues.play(Cue::Mismatch);
                    self.observers
                        .emit(&SessionEvent::CardsMismatched { cards });
                    self.observers.emit(&SessionEvent::ScoreChanged(record));
                }
                EngineEvent::Hidden { cards } => {
                    self.observers.emit(&SessionEvent::CardsHidden { cards });
                }
                EngineEvent::BoardCleared { at } => self.win(at),
            }
        }
    }

    fn win(&mut self, at: f64) {
        if self.state != SessionState::Playing {
            return;
        }
        let record = self.score.record(at);
        let final_score = self.score.final_score(at);
        self.final_score = Some(final_score);
        log::info!(
            "Board cleared in {:.1}s, final score {}",
            record.elapsed_time,
            final_score
        );

        self.set_state(SessionState::GameWon);
        self.cues.play(Cue::Victory);
        self.observers.emit(&SessionEvent::Won { final_score });

        let rank = self.high_scores.add(HighScoreEntry {
            score: final_score,
            board: (self.board_width(), self.board_height()),
            elapsed: record.elapsed_time,
            accuracy: record.accuracy(),
            timestamp: unix_timestamp_ms(),
        });
        if let Some(rank) = rank {
            self.observers.emit(&SessionEvent::HighScore { rank });
        }
        self.clear_saved_game();
    }

    fn game_over(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.suspend();
        }
        log::info!("Time limit reached with score {}", self.score().score);
        self.set_state(SessionState::GameOver);
        self.cues.play(Cue::GameOver);
        self.clear_saved_game();
    }

    /// Returns true if the state actually changed
    fn set_state(&mut self, to: SessionState) -> bool {
        if self.state == to {
            return false;
        }
        let from = self.state;
        self.state = to;
        log::info!("Session {:?} -> {:?}", from, to);
        self.observers
            .emit(&SessionEvent::StateChanged { from, to });
        true
    }
}

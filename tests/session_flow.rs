//! End-to-end session tests: full games, save/load, lenient restore.

use std::cell::RefCell;
use std::rc::Rc;

use memory_match::consts::*;
use memory_match::persistence::{FileStore, MemoryStore, Persistence, SaveBlob};
use memory_match::sim::{FlipRejected, Visibility};
use memory_match::{LoadOutcome, Session, SessionEvent, SessionState, Settings};

fn settings(width: u32, height: u32) -> Settings {
    let mut s = Settings::default();
    s.board_width = width;
    s.board_height = height;
    s.image_count = width * height / 2;
    s
}

fn session_with(store: &MemoryStore, width: u32, height: u32, seed: u64) -> Session {
    Session::new(settings(width, height))
        .unwrap()
        .with_seed(seed)
        .with_persistence(Persistence::new(store.clone()))
}

fn record(session: &mut Session) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    session.subscribe(move |e: &SessionEvent| sink.borrow_mut().push(e.clone()));
    events
}

fn unmatched_pair(session: &Session) -> (usize, usize) {
    let cards = session.cards();
    let a = cards.iter().position(|c| !c.is_matched()).unwrap();
    let b = cards
        .iter()
        .position(|c| c.index != a && !c.is_matched() && c.card_id == cards[a].card_id)
        .unwrap();
    (a, b)
}

fn match_one_pair(session: &mut Session) {
    let (a, b) = unmatched_pair(session);
    session.request_flip(a).unwrap();
    session.request_flip(b).unwrap();
    session.advance(FLIP_DURATION + GRACE_INTERVAL);
}

#[test]
fn test_two_by_two_game_to_victory() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 2, 2, 7);
    let events = record(&mut session);
    session.start_new_game().unwrap();
    assert_eq!(session.cards().len(), 4);

    match_one_pair(&mut session);
    let score = session.score();
    assert_eq!(score.score, 100);
    assert_eq!(score.combo, 1);
    assert_eq!(score.total_matches, 1);

    match_one_pair(&mut session);
    assert_eq!(session.state(), SessionState::Playing);
    session.advance(COMPLETION_DELAY);
    assert_eq!(session.state(), SessionState::GameWon);

    let events = events.borrow();
    assert!(events.contains(&SessionEvent::StateChanged {
        from: SessionState::Playing,
        to: SessionState::GameWon,
    }));
    let won = events.iter().find_map(|e| match e {
        SessionEvent::Won { final_score } => Some(*final_score),
        _ => None,
    });
    assert_eq!(won, session.final_score());
    assert!(won.unwrap() > session.score().score);
    // Finished games leave nothing to resume
    assert!(store.contents().is_none());
    assert_eq!(session.high_scores().entries.len(), 1);
}

#[test]
fn test_save_and_load_round_trip() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 4, 4, 11);
    session.start_new_game().unwrap();
    match_one_pair(&mut session);
    match_one_pair(&mut session);
    let saved = session.save().unwrap();
    assert_eq!(saved.matched_cards(), 4);
    assert_eq!(saved.score.score, 250);
    assert_eq!(saved.score.combo, 2);

    let mut restored = session_with(&store, 4, 4, 999);
    let events = record(&mut restored);
    assert_eq!(restored.load_game().unwrap(), LoadOutcome::Restored);
    assert_eq!(restored.state(), SessionState::Playing);
    assert_eq!(restored.matched_pairs(), 2);
    assert_eq!(restored.engine().unwrap().snapshot(), saved.cards);

    let score = restored.score();
    assert_eq!(score.score, 250);
    assert_eq!(score.combo, 2);
    assert_eq!(score.total_matches, 2);
    assert!(events
        .borrow()
        .iter()
        .any(|e| matches!(e, SessionEvent::ScoreChanged(r) if r.score == 250)));

    // Play continues from the restored combo
    match_one_pair(&mut restored);
    assert_eq!(restored.score().score, 250 + 200);
}

#[test]
fn test_truncated_save_restores_prefix() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 4, 4, 21);
    session.start_new_game().unwrap();
    match_one_pair(&mut session);
    let mut blob = session.snapshot().unwrap();
    blob.cards.truncate(8);
    store.set_contents(Some(blob.to_bytes().unwrap()));

    let mut restored = session_with(&store, 4, 4, 0);
    assert_eq!(restored.load_game().unwrap(), LoadOutcome::Restored);
    let snapshot = restored.engine().unwrap().snapshot();
    assert_eq!(snapshot.len(), 16);
    assert_eq!(&snapshot[..8], &blob.cards[..]);
    assert!(restored.cards()[8..]
        .iter()
        .all(|c| c.visibility() == Visibility::FaceDown));
}

#[test]
fn test_missing_or_corrupt_save_starts_fresh() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 4, 4, 1);
    assert_eq!(session.load_game().unwrap(), LoadOutcome::NewGame);
    assert_eq!(session.state(), SessionState::Playing);

    store.set_contents(Some(b"{\"game_version\": 3".to_vec()));
    let mut session = session_with(&store, 4, 4, 2);
    assert_eq!(session.load_game().unwrap(), LoadOutcome::NewGame);
    assert_eq!(session.score().score, 0);
    assert_eq!(session.matched_pairs(), 0);

    store.set_contents(Some(Vec::new()));
    let mut session = session_with(&store, 4, 4, 3);
    assert_eq!(session.load_game().unwrap(), LoadOutcome::NewGame);
}

#[test]
fn test_other_version_warns_but_loads() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 4, 4, 5);
    session.start_new_game().unwrap();
    let mut blob: SaveBlob = session.save().unwrap();
    blob.game_version = "0.0.1".to_string();
    store.set_contents(Some(blob.to_bytes().unwrap()));

    let mut restored = session_with(&store, 4, 4, 6);
    let events = record(&mut restored);
    assert_eq!(restored.load_game().unwrap(), LoadOutcome::Restored);
    assert!(events
        .borrow()
        .iter()
        .any(|e| matches!(e, SessionEvent::CompatibilityWarning { message } if message.contains("0.0.1"))));
}

#[test]
fn test_cleared_save_is_not_resumed() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 2, 2, 8);
    session.start_new_game().unwrap();
    let mut blob = session.snapshot().unwrap();
    for card in blob.cards.iter_mut() {
        card.is_matched = true;
    }
    store.set_contents(Some(blob.to_bytes().unwrap()));

    let mut restored = session_with(&store, 2, 2, 9);
    assert_eq!(restored.load_game().unwrap(), LoadOutcome::NewGame);
    assert_eq!(restored.matched_pairs(), 0);
}

#[test]
fn test_autosave_after_each_match() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 4, 4, 13);
    session.start_new_game().unwrap();
    assert!(store.contents().is_none());

    match_one_pair(&mut session);
    let blob = SaveBlob::from_bytes(&store.contents().unwrap()).unwrap();
    assert_eq!(blob.matched_cards(), 2);
    assert_eq!(blob.score.score, 100);

    match_one_pair(&mut session);
    let blob = SaveBlob::from_bytes(&store.contents().unwrap()).unwrap();
    assert_eq!(blob.matched_cards(), 4);
}

#[test]
fn test_pause_freezes_everything() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 4, 4, 17);
    session.start_new_game().unwrap();
    let (a, b) = unmatched_pair(&session);
    session.request_flip(a).unwrap();
    session.request_flip(b).unwrap();

    assert!(session.pause());
    session.advance(60.0);
    assert_eq!(session.score().total_matches, 0);
    assert_eq!(session.request_flip(0), Err(FlipRejected::Suspended));

    assert!(session.resume());
    session.advance(FLIP_DURATION + GRACE_INTERVAL);
    assert_eq!(session.score().total_matches, 1);
}

#[test]
fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("game.json");

    let mut session = Session::new(settings(4, 4))
        .unwrap()
        .with_seed(3)
        .with_persistence(Persistence::new(FileStore::new(&path)));
    session.start_new_game().unwrap();
    match_one_pair(&mut session);
    assert!(path.exists());

    let mut restored = Session::new(settings(4, 4))
        .unwrap()
        .with_persistence(Persistence::new(FileStore::new(&path)));
    assert_eq!(restored.load_game().unwrap(), LoadOutcome::Restored);
    assert_eq!(restored.matched_pairs(), 1);
    assert_eq!(restored.score().score, 100);
}

#[test]
fn test_oversized_saved_board_starts_fresh() {
    let store = MemoryStore::new();
    let mut session = session_with(&store, 4, 4, 23);
    session.start_new_game().unwrap();
    let mut blob = session.snapshot().unwrap();
    blob.board_width = 70_000;
    blob.board_height = 70_001;
    store.set_contents(Some(blob.to_bytes().unwrap()));

    let mut restored = session_with(&store, 4, 4, 24);
    assert_eq!(restored.load_game().unwrap(), LoadOutcome::NewGame);
    assert_eq!((restored.board_width(), restored.board_height()), (4, 4));
    assert_eq!(restored.state(), SessionState::Playing);
}

#[test]
fn test_oversized_settings_rejected() {
    let mut s = settings(4, 4);
    s.board_width = 70_000;
    s.board_height = 70_001;
    assert!(matches!(
        Session::new(s),
        Err(memory_match::Error::InvalidConfiguration(_))
    ));
}

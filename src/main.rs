//! Memory Match demo entry point
//!
//! Runs a headless game driven by the auto-player, with settings, saves and
//! high scores persisted as JSON files.
//!
//! Usage: `memory-match [easy|medium|hard|expert|WxH] [seed]`
//!
//! Files live in `$MEMORY_MATCH_DIR` (default `.memory-match`).

use std::path::PathBuf;
use std::process::ExitCode;

use memory_match::autoplay::AutoPlayer;
use memory_match::cues::Cue;
use memory_match::persistence::{BlobStore, FileStore, Persistence};
use memory_match::platform::{LifecycleEvent, unix_timestamp_ms};
use memory_match::{
    Difficulty, Error, HighScores, LoadOutcome, Result, Session, SessionEvent, SessionState,
    Settings,
};

/// Simulation step (seconds)
const STEP: f64 = 1.0 / 60.0;
/// Give up after this many steps (one hour of board time)
const MAX_STEPS: usize = 60 * 60 * 60;

struct Args {
    difficulty: Option<Difficulty>,
    board: Option<(u32, u32)>,
    seed: u64,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        difficulty: None,
        board: None,
        seed: unix_timestamp_ms(),
    };
    for arg in std::env::args().skip(1) {
        if let Some(d) = Difficulty::from_str(&arg) {
            args.difficulty = Some(d);
        } else if let Some((w, h)) = arg.split_once('x') {
            let parse = |s: &str| {
                s.parse::<u32>()
                    .map_err(|_| Error::invalid_config(format!("bad board size '{}'", arg)))
            };
            args.board = Some((parse(w)?, parse(h)?));
        } else {
            args.seed = arg
                .parse()
                .map_err(|_| Error::invalid_config(format!("unrecognized argument '{}'", arg)))?;
        }
    }
    Ok(args)
}

fn data_dir() -> PathBuf {
    std::env::var_os("MEMORY_MATCH_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".memory-match"))
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let dir = data_dir();
    let mut settings_store = FileStore::new(dir.join("settings.json"));
    let mut scores_store = FileStore::new(dir.join("highscores.json"));

    let mut settings = Settings::load(&settings_store);
    if matches!(settings_store.read(), Ok(None)) {
        settings.save(&mut settings_store)?;
    }
    if let Some(d) = args.difficulty {
        settings.apply_preset(d);
    }
    if let Some((w, h)) = args.board {
        settings.board_width = w;
        settings.board_height = h;
        settings.image_count = (w.saturating_mul(h) / 2).max(1);
    }

    let mut session = Session::new(settings)?
        .with_seed(args.seed)
        .with_persistence(Persistence::new(FileStore::new(dir.join("save.json"))))
        .with_high_scores(HighScores::load(&scores_store));

    session.subscribe(|event: &SessionEvent| match event {
        SessionEvent::CardsMatched { card_id, .. } => log::info!("Matched card {}", card_id),
        SessionEvent::ScoreChanged(record) => log::debug!("Score {}", record.score),
        SessionEvent::Won { final_score } => log::info!("Won! Final score {}", final_score),
        SessionEvent::HighScore { rank } => log::info!("New high score, rank #{}", rank),
        SessionEvent::CompatibilityWarning { message } => log::warn!("{}", message),
        SessionEvent::SaveFailed { reason } => log::warn!("Save failed: {}", reason),
        _ => {}
    });
    session.set_cue_sink(Box::new(|cue: Cue| log::debug!("Cue {:?}", cue)));

    match session.load_game()? {
        LoadOutcome::Restored => log::info!(
            "Resuming saved game ({}/{} pairs)",
            session.matched_pairs(),
            session.total_pairs()
        ),
        LoadOutcome::NewGame => log::info!(
            "New {}x{} game",
            session.board_width(),
            session.board_height()
        ),
    }

    let mut player = AutoPlayer::new(args.seed);
    let steps = player.play(&mut session, STEP, MAX_STEPS);
    let record = session.score();
    log::info!(
        "Stopped after {} steps in {:?}: {} matches, {} mismatches, accuracy {:.0}%, {} cards still remembered",
        steps,
        session.state(),
        record.total_matches,
        record.total_mismatches,
        record.accuracy() * 100.0,
        player.known_cards()
    );

    if session.state() == SessionState::GameWon {
        session.high_scores().save(&mut scores_store)?;
        let board = (session.board_width(), session.board_height());
        if let Some(best) = session.high_scores().best_for(board) {
            log::info!("Best on {}x{}: {}", board.0, board.1, best.score);
        }
        if let Some(top) = session.high_scores().top_score() {
            log::info!("Best score so far: {}", top);
        }
    }
    session.handle_lifecycle(LifecycleEvent::Teardown);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Memory Match starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

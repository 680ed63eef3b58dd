//! Audio/visual cue notifications
//!
//! The core only says *what* happened; a sink decides how it sounds or looks.
//! A missing or muted sink is never an error.

/// Cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player flipped a card face up
    Flip,
    /// A set of cards matched
    Match,
    /// A set of cards did not match
    Mismatch,
    /// Board cleared
    Victory,
    /// Time ran out
    GameOver,
}

/// Receiver for cues (audio engine, particle system, haptics...)
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

impl<F: FnMut(Cue)> CueSink for F {
    fn play(&mut self, cue: Cue) {
        self(cue)
    }
}

/// Cue dispatcher owned by the session
#[derive(Default)]
pub struct CuePlayer {
    sink: Option<Box<dyn CueSink>>,
    muted: bool,
}

impl std::fmt::Debug for CuePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CuePlayer")
            .field("attached", &self.sink.is_some())
            .field("muted", &self.muted)
            .finish()
    }
}

impl CuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sink(&mut self, sink: Box<dyn CueSink>) {
        self.sink = Some(sink);
    }

    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Send a cue (no-op without a sink or when muted)
    pub fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        let Some(sink) = self.sink.as_mut() else { return };
        sink.play(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_play_without_sink_is_noop() {
        let mut player = CuePlayer::new();
        player.play(Cue::Flip);
    }

    #[test]
    fn test_mute_suppresses_cues() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let mut player = CuePlayer::new();
        let sink = heard.clone();
        player.set_sink(Box::new(move |cue: Cue| sink.borrow_mut().push(cue)));

        player.play(Cue::Match);
        player.set_muted(true);
        player.play(Cue::Mismatch);
        player.set_muted(false);
        player.play(Cue::Victory);

        assert_eq!(*heard.borrow(), vec![Cue::Match, Cue::Victory]);
    }
}

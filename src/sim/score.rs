//! Score engine
//!
//! Consumes match/mismatch outcomes and maintains the running [`ScoreRecord`].
//! Times are board-clock seconds supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    /// Points for every match
    pub base_score: u32,
    /// Extra points per combo step beyond the first
    pub combo_multiplier: u32,
    /// Combo ceiling
    pub max_combo: u32,
    /// Maximum bonus for a quick follow-up match (0 disables)
    pub time_bonus: u32,
    /// Seconds over which the follow-up bonus decays to zero
    pub time_bonus_decay: f64,
    /// Finishing faster than this earns a completion bonus
    pub par_time: f64,
    /// Completion bonus points per second under par
    pub completion_bonus_rate: f64,
    /// Accuracy above this earns a bonus
    pub accuracy_threshold: f64,
    /// Accuracy bonus points per unit of accuracy above the threshold
    pub accuracy_bonus_scale: f64,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            base_score: BASE_MATCH_SCORE,
            combo_multiplier: COMBO_MULTIPLIER,
            max_combo: MAX_COMBO,
            time_bonus: TIME_BONUS,
            time_bonus_decay: TIME_BONUS_DECAY,
            par_time: PAR_TIME,
            completion_bonus_rate: COMPLETION_BONUS_RATE,
            accuracy_threshold: ACCURACY_THRESHOLD,
            accuracy_bonus_scale: ACCURACY_BONUS_SCALE,
        }
    }
}

/// Snapshot of scoring progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u64,
    pub combo: u32,
    pub total_matches: u32,
    pub total_mismatches: u32,
    /// Seconds since the session started
    pub elapsed_time: f64,
}

impl ScoreRecord {
    /// matches / attempts, 1.0 before any attempt
    pub fn accuracy(&self) -> f64 {
        let attempts = self.total_matches + self.total_mismatches;
        if attempts == 0 {
            1.0
        } else {
            f64::from(self.total_matches) / f64::from(attempts)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreEngine {
    tuning: ScoreTuning,
    record: ScoreRecord,
    /// Board time the session started at
    origin: f64,
    last_match: Option<f64>,
}

impl ScoreEngine {
    pub fn new(tuning: ScoreTuning) -> Self {
        Self {
            tuning,
            record: ScoreRecord::default(),
            origin: 0.0,
            last_match: None,
        }
    }

    pub fn tuning(&self) -> &ScoreTuning {
        &self.tuning
    }

    /// Current record with `elapsed_time` brought up to `now`
    pub fn record(&self, now: f64) -> ScoreRecord {
        ScoreRecord {
            elapsed_time: self.elapsed(now),
            ..self.record
        }
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.origin).max(0.0)
    }

    /// Points a match at `now` is worth given the current combo
    fn match_award(&self, combo: u32, now: f64) -> u64 {
        let t = &self.tuning;
        let combo_bonus = u64::from(combo.saturating_sub(1)) * u64::from(t.combo_multiplier);

        let dt = self.last_match.map_or(0.0, |last| (now - last).max(0.0));
        let decay = if t.time_bonus_decay > 0.0 {
            (1.0 - dt / t.time_bonus_decay).max(0.0)
        } else {
            0.0
        };
        let time_bonus = (f64::from(t.time_bonus) * decay).round() as u64;

        u64::from(t.base_score) + combo_bonus + time_bonus
    }

    pub fn record_match(&mut self, now: f64) -> ScoreRecord {
        self.record.total_matches += 1;
        self.record.combo = (self.record.combo + 1).min(self.tuning.max_combo);
        let award = self.match_award(self.record.combo, now);
        self.record.score += award;
        self.last_match = Some(now);
        log::debug!(
            "Match +{} (combo {}, score {})",
            award,
            self.record.combo,
            self.record.score
        );
        self.record(now)
    }

    pub fn record_mismatch(&mut self, now: f64) -> ScoreRecord {
        self.record.total_mismatches += 1;
        self.record.combo = 0;
        self.record(now)
    }

    /// Running score plus completion-time and accuracy bonuses
    pub fn final_score(&self, now: f64) -> u64 {
        let t = &self.tuning;
        let record = self.record(now);

        let time_bonus = if record.elapsed_time < t.par_time {
            ((t.par_time - record.elapsed_time) * t.completion_bonus_rate).round() as u64
        } else {
            0
        };
        let accuracy = record.accuracy();
        let accuracy_bonus = if accuracy > t.accuracy_threshold {
            ((accuracy - t.accuracy_threshold) * t.accuracy_bonus_scale).round() as u64
        } else {
            0
        };

        record.score + time_bonus + accuracy_bonus
    }

    /// Zero every counter and restart the clock origin at `now`
    pub fn reset(&mut self, now: f64) -> ScoreRecord {
        self.record = ScoreRecord::default();
        self.origin = now;
        self.last_match = None;
        self.record(now)
    }

    /// Adopt a saved record; elapsed time continues from the saved value
    pub fn restore(&mut self, saved: ScoreRecord, now: f64) -> ScoreRecord {
        self.record = ScoreRecord {
            combo: saved.combo.min(self.tuning.max_combo),
            elapsed_time: 0.0,
            ..saved
        };
        self.origin = now - saved.elapsed_time.max(0.0);
        self.last_match = (saved.total_matches > 0).then_some(now);
        self.record(now)
    }
}

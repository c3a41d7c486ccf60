//! Mission results: summary, snapshot export and the count-up shown on the
//! results screen

use crate::data::{PerformanceTier, SessionState};
use crate::{GameError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything the results screen and the exported snapshot show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub score: u32,
    pub tier: PerformanceTier,
    pub accuracy: u8,
    pub waves_cleared: u32,
    pub total_waves: u32,
    pub duration: String,
    pub correct: u32,
    pub incorrect: u32,
    pub total_decisions: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub best_combo: u32,
}

impl ResultSummary {
    pub fn from_state(state: &SessionState, now: DateTime<Utc>) -> Self {
        Self {
            score: state.score,
            tier: state.tier(),
            accuracy: state.accuracy,
            waves_cleared: state.waves_cleared(),
            total_waves: state.total_waves,
            duration: state.duration_string(now),
            correct: state.correct,
            incorrect: state.incorrect,
            total_decisions: state.total_decisions(),
            false_positives: state.false_positives,
            false_negatives: state.false_negatives,
            best_combo: state.best_combo,
        }
    }

    /// Snapshot body, one stat per line.
    pub fn lines(&self) -> Vec<String> {
        vec![
            "GUARDRAIL OPS - MISSION COMPLETE".to_string(),
            self.tier.to_string(),
            String::new(),
            format!("Final Score: {}", self.score),
            format!("Accuracy: {}%", self.accuracy),
            format!("Waves: {}/{}", self.waves_cleared, self.total_waves),
            format!("Time: {}", self.duration),
            String::new(),
            "Decisions:".to_string(),
            format!("✓ Correct: {}", self.correct),
            format!("✗ Incorrect: {}", self.incorrect),
            format!("Total: {}", self.total_decisions),
            String::new(),
            "Error Analysis:".to_string(),
            format!("⚠ False Positives: {}", self.false_positives),
            format!("⚠ False Negatives: {}", self.false_negatives),
            format!("🔥 Best Combo: {}", self.best_combo),
        ]
    }

    /// `GuardrailOps_Result_<score>_<YYYYMMDD-HHMM>.txt`
    pub fn file_name(&self, at: DateTime<Utc>) -> String {
        format!(
            "GuardrailOps_Result_{}_{}.txt",
            self.score,
            at.format("%Y%m%d-%H%M")
        )
    }

    /// Write the snapshot into `dir`, returning the file written.
    pub fn export(&self, dir: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .map_err(|e| GameError::ExportFailed(format!("{}: {}", dir.display(), e)))?;
        let path = dir.join(self.file_name(at));
        let mut body = self.lines().join("\n");
        body.push('\n');
        std::fs::write(&path, body)
            .map_err(|e| GameError::ExportFailed(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), score = self.score, "result snapshot exported");
        Ok(path)
    }
}

/// Score and accuracy counting up from zero on the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    pub score: u32,
    pub accuracy: u8,
    target_score: u32,
    target_accuracy: u8,
}

impl CountUp {
    pub fn new(target_score: u32, target_accuracy: u8) -> Self {
        Self {
            score: 0,
            accuracy: 0,
            target_score,
            target_accuracy,
        }
    }

    /// Score climbs in thirtieths of the target, accuracy one point at a time.
    pub fn step(&mut self) {
        let increment = self.target_score.div_ceil(30).max(1);
        self.score = (self.score + increment).min(self.target_score);
        self.accuracy = (self.accuracy + 1).min(self.target_accuracy);
    }

    pub fn is_done(&self) -> bool {
        self.score >= self.target_score && self.accuracy >= self.target_accuracy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn count_up_reaches_targets_and_stops() {
        let mut count = CountUp::new(500, 80);
        count.step();
        assert_eq!(count.score, 17);
        assert_eq!(count.accuracy, 1);

        for _ in 0..100 {
            count.step();
        }
        assert!(count.is_done());
        assert_eq!((count.score, count.accuracy), (500, 80));
    }

    #[test]
    fn zero_targets_are_done_at_once() {
        let mut count = CountUp::new(0, 0);
        assert!(count.is_done());
        count.step();
        assert_eq!((count.score, count.accuracy), (0, 0));
    }

    #[test]
    fn summary_counts_waves_one_behind() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let state = SessionState::new(start).next_wave().next_wave().record_correct();
        let summary = ResultSummary::from_state(&state, start + chrono::Duration::seconds(42));

        assert_eq!(summary.waves_cleared, 2);
        assert_eq!(summary.duration, "0:42");
        assert_eq!(summary.tier, PerformanceTier::Excellent);
        assert!(summary.lines().contains(&"Waves: 2/5".to_string()));
    }
}

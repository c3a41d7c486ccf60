//! Session statistics, difficulty and end-of-mission tiers

use crate::GameError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const STARTING_LIVES: u8 = 3;
pub const TOTAL_WAVES: u32 = 5;
pub const POINTS_PER_CORRECT: u32 = 100;

/// Timer pressure. The only setting that outlives a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Casual,
    Pro,
}

impl Difficulty {
    /// Seconds on the clock for each request. Pro is 25% faster.
    pub fn max_time(&self) -> u32 {
        match self {
            Difficulty::Casual => 8,
            Difficulty::Pro => 6,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Casual => "Standard timer, good for learning",
            Difficulty::Pro => "25% faster timer, for experts",
        }
    }

    pub fn threat_level(&self) -> &'static str {
        match self {
            Difficulty::Casual => "CASUAL",
            Difficulty::Pro => "PRO",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "casual",
            Difficulty::Pro => "pro",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" => Ok(Difficulty::Casual),
            "pro" => Ok(Difficulty::Pro),
            other => Err(GameError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Which error tally an incorrect decision lands in, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorTally {
    FalsePositive,
    FalseNegative,
}

/// Everything that changes during one playthrough.
///
/// Updates never mutate in place: each decision produces the next snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub lives: u8,
    pub wave: u32,
    pub total_waves: u32,
    pub accuracy: u8,
    pub correct: u32,
    pub incorrect: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub best_combo: u32,
    pub current_combo: u32,
    pub started_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            wave: 1,
            total_waves: TOTAL_WAVES,
            accuracy: 0,
            correct: 0,
            incorrect: 0,
            false_positives: 0,
            false_negatives: 0,
            best_combo: 0,
            current_combo: 0,
            started_at,
        }
    }

    /// Snapshot after a correct decision.
    pub fn record_correct(&self) -> Self {
        let correct = self.correct + 1;
        let current_combo = self.current_combo + 1;
        Self {
            score: self.score + POINTS_PER_CORRECT,
            correct,
            current_combo,
            best_combo: self.best_combo.max(current_combo),
            accuracy: accuracy_percent(correct, self.incorrect),
            ..self.clone()
        }
    }

    /// Snapshot after an incorrect decision. Score is never deducted.
    pub fn record_incorrect(&self, tally: Option<ErrorTally>) -> Self {
        let incorrect = self.incorrect + 1;
        let mut next = Self {
            incorrect,
            lives: self.lives.saturating_sub(1),
            current_combo: 0,
            accuracy: accuracy_percent(self.correct, incorrect),
            ..self.clone()
        };
        match tally {
            Some(ErrorTally::FalsePositive) => next.false_positives += 1,
            Some(ErrorTally::FalseNegative) => next.false_negatives += 1,
            None => {}
        }
        next
    }

    /// Snapshot with the wave counter moved on by one.
    pub fn next_wave(&self) -> Self {
        Self {
            wave: self.wave + 1,
            ..self.clone()
        }
    }

    pub fn is_final_wave(&self) -> bool {
        self.wave >= self.total_waves
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    pub fn total_decisions(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Waves as shown on the results screen, one behind the live counter.
    pub fn waves_cleared(&self) -> u32 {
        self.wave.saturating_sub(1)
    }

    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_results(self.accuracy, self.score)
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.started_at).max(chrono::Duration::zero())
    }

    /// Elapsed play time as `m:ss`.
    pub fn duration_string(&self, now: DateTime<Utc>) -> String {
        let secs = self.elapsed(now).num_seconds();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

/// `round(correct / total * 100)`, or 0 before any decision.
pub fn accuracy_percent(correct: u32, incorrect: u32) -> u8 {
    let total = correct + incorrect;
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u8
}

/// End-of-mission rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceTier {
    Excellent,
    Good,
    NeedImprovement,
}

impl PerformanceTier {
    /// The score shortcut to EXCELLENT is checked before the GOOD threshold.
    pub fn from_results(accuracy: u8, score: u32) -> Self {
        if accuracy >= 90 || score >= 2000 {
            PerformanceTier::Excellent
        } else if accuracy >= 70 {
            PerformanceTier::Good
        } else {
            PerformanceTier::NeedImprovement
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceTier::Excellent => write!(f, "EXCELLENT"),
            PerformanceTier::Good => write!(f, "GOOD"),
            PerformanceTier::NeedImprovement => write!(f, "NEED IMPROVEMENT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(2, 1), 67);
        assert_eq!(accuracy_percent(1, 2), 33);
        assert_eq!(accuracy_percent(1, 7), 13);
    }

    #[test]
    fn score_shortcut_beats_accuracy() {
        assert_eq!(PerformanceTier::from_results(10, 2000), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_results(90, 0), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_results(70, 1999), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_results(69, 500), PerformanceTier::NeedImprovement);
    }

    #[test]
    fn duration_is_minutes_and_padded_seconds() {
        let state = SessionState::new(start());
        let later = start() + chrono::Duration::seconds(75);
        assert_eq!(state.duration_string(later), "1:15");
        assert_eq!(state.duration_string(start() - chrono::Duration::seconds(5)), "0:00");
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("PRO".parse::<Difficulty>().unwrap(), Difficulty::Pro);
        assert_eq!(" casual ".parse::<Difficulty>().unwrap(), Difficulty::Casual);
        assert!("hard".parse::<Difficulty>().is_err());
    }
}

//! GuardRail Ops
//!
//! An arcade terminal game about AI guardrails. Each wave puts one incoming
//! request on screen and the player has a few seconds to ALLOW it, REDACT
//! the sensitive parts, or BLOCK it.
//!
//! # Game Mechanics
//!
//! - **Waves**: five requests per mission, three lives
//! - **Time Pressure**: 8 seconds a round on casual, 6 on pro
//! - **Redaction**: preview the masked text before committing
//! - **Scoring**: 100 points per correct call, combos, accuracy tiers
//!
//! # Architecture
//!
//! - `data` - Requests, detections, session state and difficulty
//! - `game` - Redaction engine, evaluator, round lifecycle, screen flow
//! - `tui` - Terminal user interface with ratatui
//! - `config` / `preferences` - Environment config and saved difficulty

pub mod config;
pub mod data;
pub mod game;
pub mod preferences;
pub mod tui;

pub use game::Game;
pub use data::{
    Assessment, Confidence, Detection, Difficulty, PerformanceTier, Request, Risk, SessionState,
    ThreatTag, TrainingTopic,
};

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = anyhow::Result<T>;

/// Custom error types
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Preference file corrupted: {0}")]
    CorruptedPreference(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Invalid fixtures: {0}")]
    InvalidFixtures(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),
}

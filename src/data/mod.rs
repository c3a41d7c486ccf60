//! Data structures for the game world
//!
//! Defines inbound requests, session statistics, difficulty and the
//! training catalogue.

pub mod requests;
pub mod session;
pub mod training;

pub use requests::*;
pub use session::*;
pub use training::*;

use serde::{Deserialize, Serialize};

/// Risk rating attached to a request's ground-truth assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn symbol(&self) -> &'static str {
        match self {
            Risk::Low => "◆",
            Risk::Medium => "▲",
            Risk::High => "●",
        }
    }
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Risk::Low => write!(f, "LOW"),
            Risk::Medium => write!(f, "MEDIUM"),
            Risk::High => write!(f, "HIGH"),
        }
    }
}

/// How sure the redaction preview is that something needed masking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Three or more detections is HIGH, any detection at all is MEDIUM.
    pub fn from_detection_count(count: usize) -> Self {
        match count {
            n if n >= 3 => Confidence::High,
            n if n >= 1 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "LOW"),
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::High => write!(f, "HIGH"),
        }
    }
}

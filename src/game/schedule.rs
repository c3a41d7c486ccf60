//! Delayed effects
//!
//! Every timer the round lifecycle needs (countdown tick, feedback clear,
//! round advance, game over) is a pending entry here. The host loop passes
//! the current instant in; nothing reads the wall clock.

use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(1000);
pub const SETTLE_DELAY: Duration = Duration::from_millis(1500);
pub const GAME_OVER_DELAY: Duration = Duration::from_millis(2000);

/// Something the session does once its delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Tick,
    ClearFeedback,
    AdvanceRound,
    MissionComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub due: Instant,
    pub effect: Effect,
}

/// Pending effects, kept in due order
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pending: Vec<Pending>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `effect` to fire `delay` after `now`.
    pub fn after(&mut self, now: Instant, delay: Duration, effect: Effect) {
        let entry = Pending {
            due: now + delay,
            effect,
        };
        // Ties keep insertion order
        let pos = self
            .pending
            .iter()
            .position(|p| p.due > entry.due)
            .unwrap_or(self.pending.len());
        self.pending.insert(pos, entry);
    }

    /// Remove and return the earliest entry if it is due.
    pub fn pop_due(&mut self, now: Instant) -> Option<Pending> {
        match self.pending.first() {
            Some(p) if p.due <= now => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    pub fn cancel(&mut self, effect: Effect) {
        self.pending.retain(|p| p.effect != effect);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_scheduled(&self, effect: Effect) -> bool {
        self.pending.iter().any(|p| p.effect == effect)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.first().map(|p| p.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

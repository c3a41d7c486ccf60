//! Core game logic and screen flow

pub mod evaluator;
pub mod redaction;
pub mod report;
pub mod schedule;
pub mod session;

use crate::data::{Difficulty, Request, SessionState};
use crate::preferences::{self, PreferenceStore};
use crate::Result;
use chrono::{DateTime, Utc};
use evaluator::{Action, RedactionChoice};
use report::ResultSummary;
use session::{Session, SessionEvent};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

pub const AI_FEEDBACK_MESSAGE: &str = "AI feedback coming soon!";

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Game,
    Complete,
    Training,
}

/// A message to display to the player
#[derive(Debug, Clone)]
pub struct GameMessage {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub message: String,
}

impl GameMessage {
    pub fn info(source: &str, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.to_string(),
            message: message.to_string(),
        }
    }
}

/// Screen controller. Owns the running session and the difficulty preference.
pub struct Game {
    screen: Screen,
    difficulty: Difficulty,
    fixtures: Vec<Request>,
    session: Option<Session>,
    /// Final state of the last session, shown on the results screen
    results: Option<SessionState>,
    preferences: Box<dyn PreferenceStore>,
    pub message_log: Vec<GameMessage>,
}

impl Game {
    /// Starts on the home screen with the saved difficulty, casual if none.
    pub fn new(fixtures: Vec<Request>, preferences: Box<dyn PreferenceStore>) -> Self {
        let difficulty = preferences::load_or_default(preferences.as_ref());
        Self {
            screen: Screen::Home,
            difficulty,
            fixtures,
            session: None,
            results: None,
            preferences,
            message_log: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn fixtures(&self) -> &[Request] {
        &self.fixtures
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn results(&self) -> Option<&SessionState> {
        self.results.as_ref()
    }

    pub fn add_message(&mut self, message: GameMessage) {
        self.message_log.push(message);
    }

    pub fn last_message(&self) -> Option<&GameMessage> {
        self.message_log.last()
    }

    /// Pick a difficulty on the home screen and remember it.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.persist_difficulty();
    }

    fn persist_difficulty(&mut self) {
        if let Err(e) = self.preferences.save_difficulty(self.difficulty) {
            warn!(error = %e, difficulty = %self.difficulty, "could not save difficulty");
        }
    }

    /// Move to `screen`. Entering the game always starts a fresh session;
    /// passing a difficulty also saves it.
    pub fn navigate(
        &mut self,
        screen: Screen,
        difficulty: Option<Difficulty>,
        now: Instant,
    ) -> Result<()> {
        if let Some(difficulty) = difficulty {
            self.select_difficulty(difficulty);
        }

        if screen == Screen::Game {
            let session = Session::start(self.difficulty, self.fixtures.clone(), Utc::now(), now)?;
            self.session = Some(session);
            self.results = None;
        } else if let Some(session) = self.session.take() {
            // Leaving the game drops the session and every pending timer.
            // Only a finished mission leaves results behind.
            self.results = (screen == Screen::Complete).then(|| session.state().clone());
        }

        info!(from = ?self.screen, to = ?screen, "screen change");
        self.screen = screen;
        Ok(())
    }

    /// New mission with the current difficulty.
    pub fn replay(&mut self, now: Instant) -> Result<()> {
        self.navigate(Screen::Game, Some(self.difficulty), now)
    }

    /// Drive the session clock; moves to the results screen once it ends.
    pub fn tick(&mut self, now: Instant) -> Result<Vec<SessionEvent>> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Vec::new());
        };
        let events = session.tick(now);
        if session.is_complete() {
            self.navigate(Screen::Complete, None, now)?;
        }
        Ok(events)
    }

    pub fn submit(&mut self, action: Action, now: Instant) -> Vec<SessionEvent> {
        match self.session.as_mut() {
            Some(session) => session.submit(action, now),
            None => Vec::new(),
        }
    }

    pub fn confirm_redaction(&mut self, choice: RedactionChoice, now: Instant) -> Vec<SessionEvent> {
        match self.session.as_mut() {
            Some(session) => session.confirm_redaction(choice, now),
            None => Vec::new(),
        }
    }

    pub fn dismiss_redaction(&mut self) -> Vec<SessionEvent> {
        match self.session.as_mut() {
            Some(session) => session.dismiss_redaction(),
            None => Vec::new(),
        }
    }

    pub fn summary(&self, now: DateTime<Utc>) -> Option<ResultSummary> {
        self.results
            .as_ref()
            .map(|state| ResultSummary::from_state(state, now))
    }

    /// Write the last mission's snapshot into `dir`.
    pub fn export_results(&mut self, dir: &Path, at: DateTime<Utc>) -> Result<Option<PathBuf>> {
        let Some(summary) = self.summary(at) else {
            return Ok(None);
        };
        let path = summary.export(dir, at)?;
        self.add_message(GameMessage::info(
            "Export",
            &format!("Snapshot saved to {}", path.display()),
        ));
        Ok(Some(path))
    }

    pub fn request_ai_feedback(&mut self) {
        self.add_message(GameMessage::info("Feedback", AI_FEEDBACK_MESSAGE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_fixtures;
    use crate::preferences::MemoryPreferenceStore;

    fn game() -> (Game, MemoryPreferenceStore) {
        let store = MemoryPreferenceStore::new();
        (Game::new(default_fixtures(), Box::new(store.clone())), store)
    }

    #[test]
    fn starts_home_on_casual() {
        let (game, _) = game();
        assert_eq!(game.screen(), Screen::Home);
        assert_eq!(game.difficulty(), Difficulty::Casual);
        assert!(game.session().is_none());
    }

    #[test]
    fn entering_game_with_difficulty_persists_it() {
        let (mut game, store) = game();
        game.navigate(Screen::Game, Some(Difficulty::Pro), Instant::now())
            .unwrap();
        assert_eq!(store.load_difficulty().unwrap(), Some(Difficulty::Pro));
        assert_eq!(game.session().unwrap().max_time(), 6);
    }

    #[test]
    fn training_round_trip_leaves_no_session() {
        let (mut game, _) = game();
        let now = Instant::now();
        game.navigate(Screen::Training, None, now).unwrap();
        game.navigate(Screen::Home, None, now).unwrap();
        assert!(game.session().is_none());
        assert!(game.results().is_none());
    }

    #[test]
    fn ai_feedback_is_a_placeholder_message() {
        let (mut game, _) = game();
        game.request_ai_feedback();
        assert_eq!(game.last_message().unwrap().message, AI_FEEDBACK_MESSAGE);
    }
}

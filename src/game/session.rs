//! Round lifecycle for one playthrough
//!
//! ```text
//! AwaitingAction ──redact──▶ ConfirmingRedaction ──choice──┐
//!       │  ▲                        │ dismiss              │
//!       │  └────────────────────────┘                      ▼
//!       ├──allow/block────────────────────────────────▶ Locked ──1500ms──▶ next round
//!       └──timer hits 0──▶ Locked ──immediately──▶ next round      │
//!                                                                  └──▶ MissionComplete
//! ```
//!
//! Losing the last life schedules MissionComplete 2000ms out and no further
//! round is started.

use super::evaluator::{self, Action, FailureReason, RedactionChoice, Verdict};
use super::redaction::RedactionPreview;
use super::schedule::{
    Effect, Schedule, FEEDBACK_DURATION, GAME_OVER_DELAY, SETTLE_DELAY, TICK_INTERVAL,
};
use crate::data::{Difficulty, PerformanceTier, Request, SessionState};
use crate::{GameError, Result};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info};

/// Where the current round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingAction,
    ConfirmingRedaction,
    Locked,
    MissionComplete,
}

/// The transient "+100" / "-200" flash after a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: &'static str,
    pub verdict: Verdict,
}

impl Feedback {
    fn for_verdict(verdict: Verdict) -> Self {
        let text = if verdict.is_correct() { "+100" } else { "-200" };
        Self { text, verdict }
    }
}

/// What the session reports back to whoever drives it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted { wave: u32, request_id: String },
    TimerTicked { remaining: u32 },
    RedactionOpened,
    RedactionDismissed,
    Decided { request_id: String, verdict: Verdict },
    FeedbackCleared,
    MissionComplete { tier: PerformanceTier },
}

pub struct Session {
    state: SessionState,
    difficulty: Difficulty,
    fixtures: Vec<Request>,
    current: usize,
    phase: RoundPhase,
    time_remaining: u32,
    feedback: Option<Feedback>,
    last_verdict: Option<Verdict>,
    schedule: Schedule,
}

impl Session {
    /// Fresh state, first fixture up, countdown running from `now`.
    pub fn start(
        difficulty: Difficulty,
        fixtures: Vec<Request>,
        started_at: DateTime<Utc>,
        now: Instant,
    ) -> Result<Self> {
        if fixtures.is_empty() {
            return Err(GameError::InvalidFixtures("no requests to play".to_string()).into());
        }

        let mut schedule = Schedule::new();
        schedule.after(now, TICK_INTERVAL, Effect::Tick);

        info!(
            %difficulty,
            fixtures = fixtures.len(),
            max_time = difficulty.max_time(),
            "session started"
        );

        Ok(Self {
            state: SessionState::new(started_at),
            difficulty,
            fixtures,
            current: 0,
            phase: RoundPhase::AwaitingAction,
            time_remaining: difficulty.max_time(),
            feedback: None,
            last_verdict: None,
            schedule,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn current_request(&self) -> &Request {
        &self.fixtures[self.current]
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn max_time(&self) -> u32 {
        self.difficulty.max_time()
    }

    /// Share of the round's clock still left, 0.0 to 1.0.
    pub fn timer_ratio(&self) -> f64 {
        self.time_remaining as f64 / self.max_time() as f64
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    pub fn is_input_locked(&self) -> bool {
        matches!(self.phase, RoundPhase::Locked | RoundPhase::MissionComplete)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RoundPhase::MissionComplete
    }

    /// Preview for the open redaction confirmation.
    pub fn redaction_preview(&self) -> Option<RedactionPreview> {
        if self.phase != RoundPhase::ConfirmingRedaction {
            return None;
        }
        let request = self.current_request();
        Some(RedactionPreview::build(&request.content, &request.detected))
    }

    /// When the host loop next needs to call [`Session::tick`].
    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_due()
    }

    /// Submit a decision. Ignored unless the round is waiting for one.
    pub fn submit(&mut self, action: Action, now: Instant) -> Vec<SessionEvent> {
        if self.phase != RoundPhase::AwaitingAction {
            debug!(?action, phase = ?self.phase, "action ignored");
            return Vec::new();
        }

        if action == Action::Redact {
            self.phase = RoundPhase::ConfirmingRedaction;
            return vec![SessionEvent::RedactionOpened];
        }

        let verdict = evaluator::judge(action, &self.current_request().assessment);
        let mut events = Vec::new();
        self.resolve(verdict, now, &mut events);
        self.settle(now);
        events
    }

    /// Answer the redaction confirmation.
    pub fn confirm_redaction(&mut self, choice: RedactionChoice, now: Instant) -> Vec<SessionEvent> {
        if self.phase != RoundPhase::ConfirmingRedaction {
            debug!(?choice, phase = ?self.phase, "redaction choice ignored");
            return Vec::new();
        }

        let verdict = evaluator::judge_redaction(choice, &self.current_request().assessment);
        let mut events = Vec::new();
        self.resolve(verdict, now, &mut events);
        self.settle(now);
        events
    }

    /// Close the confirmation without deciding. The clock never stopped.
    pub fn dismiss_redaction(&mut self) -> Vec<SessionEvent> {
        if self.phase != RoundPhase::ConfirmingRedaction {
            return Vec::new();
        }
        self.phase = RoundPhase::AwaitingAction;
        vec![SessionEvent::RedactionDismissed]
    }

    /// Fire every effect due at or before `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        // One at a time: an effect may cancel or add others.
        while let Some(pending) = self.schedule.pop_due(now) {
            self.apply(pending.effect, pending.due, &mut events);
        }
        events
    }

    fn apply(&mut self, effect: Effect, at: Instant, events: &mut Vec<SessionEvent>) {
        match effect {
            Effect::Tick => self.count_down(at, events),
            Effect::ClearFeedback => {
                if self.feedback.take().is_some() {
                    events.push(SessionEvent::FeedbackCleared);
                }
            }
            Effect::AdvanceRound => {
                if self.phase == RoundPhase::Locked {
                    self.advance(at, events);
                }
            }
            Effect::MissionComplete => self.finish(events),
        }
    }

    fn count_down(&mut self, at: Instant, events: &mut Vec<SessionEvent>) {
        if !matches!(
            self.phase,
            RoundPhase::AwaitingAction | RoundPhase::ConfirmingRedaction
        ) {
            return;
        }

        if self.time_remaining <= 1 {
            self.time_remaining = 0;
            events.push(SessionEvent::TimerTicked { remaining: 0 });
            info!(request = %self.current_request().id, "time expired");
            self.resolve(Verdict::Incorrect(FailureReason::TimeExpired), at, events);
            if !self.schedule.is_scheduled(Effect::MissionComplete) {
                self.advance(at, events);
            }
            return;
        }

        self.time_remaining -= 1;
        events.push(SessionEvent::TimerTicked {
            remaining: self.time_remaining,
        });
        self.schedule.after(at, TICK_INTERVAL, Effect::Tick);
    }

    /// Lock the round and apply the verdict to the running totals, once.
    fn resolve(&mut self, verdict: Verdict, at: Instant, events: &mut Vec<SessionEvent>) {
        self.phase = RoundPhase::Locked;
        self.schedule.cancel(Effect::Tick);

        self.state = match verdict {
            Verdict::Correct => self.state.record_correct(),
            Verdict::Incorrect(reason) => self.state.record_incorrect(reason.error_tally()),
        };
        self.last_verdict = Some(verdict);

        self.feedback = Some(Feedback::for_verdict(verdict));
        self.schedule.cancel(Effect::ClearFeedback);
        self.schedule.after(at, FEEDBACK_DURATION, Effect::ClearFeedback);

        let request_id = self.current_request().id.clone();
        match verdict.reason() {
            None => info!(
                request = %request_id,
                score = self.state.score,
                combo = self.state.current_combo,
                "correct decision"
            ),
            Some(reason) => info!(
                request = %request_id,
                %reason,
                lives = self.state.lives,
                "incorrect decision"
            ),
        }
        events.push(SessionEvent::Decided { request_id, verdict });

        if !verdict.is_correct() && self.state.is_out_of_lives() {
            info!(wave = self.state.wave, "out of lives");
            self.schedule.cancel(Effect::AdvanceRound);
            self.schedule.after(at, GAME_OVER_DELAY, Effect::MissionComplete);
        }
    }

    /// After a player decision the next round waits for the settle delay.
    fn settle(&mut self, now: Instant) {
        if !self.schedule.is_scheduled(Effect::MissionComplete) {
            self.schedule.after(now, SETTLE_DELAY, Effect::AdvanceRound);
        }
    }

    fn advance(&mut self, at: Instant, events: &mut Vec<SessionEvent>) {
        if self.state.is_final_wave() {
            self.finish(events);
            return;
        }

        // Index from the wave before it is bumped: round two plays fixture 1.
        self.current = self.state.wave as usize % self.fixtures.len();
        self.state = self.state.next_wave();
        self.time_remaining = self.max_time();
        self.phase = RoundPhase::AwaitingAction;
        self.schedule.cancel(Effect::Tick);
        self.schedule.after(at, TICK_INTERVAL, Effect::Tick);

        let request_id = self.current_request().id.clone();
        debug!(wave = self.state.wave, request = %request_id, "round started");
        events.push(SessionEvent::RoundStarted {
            wave: self.state.wave,
            request_id,
        });
    }

    fn finish(&mut self, events: &mut Vec<SessionEvent>) {
        if self.phase == RoundPhase::MissionComplete {
            return;
        }
        self.phase = RoundPhase::MissionComplete;
        self.schedule.clear();

        let tier = self.state.tier();
        info!(
            %tier,
            score = self.state.score,
            accuracy = self.state.accuracy,
            wave = self.state.wave,
            "mission complete"
        );
        events.push(SessionEvent::MissionComplete { tier });
    }
}

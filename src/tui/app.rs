//! Main application state and rendering

use crate::data::{training_topics, Difficulty, TrainingTopic, TOTAL_WAVES};
use crate::game::evaluator::{Action, RedactionChoice};
use crate::game::report::CountUp;
use crate::game::session::{RoundPhase, Session};
use crate::game::{Game, Screen};
use crate::tui::widgets::{DemonMood, DramaticBox, ThreatChip, TimerBar};
use crate::tui::{
    centered_rect, create_content_layout, create_main_area_layout, create_main_layout,
    risk_color, styled_block, tier_color, Theme, HELP_TEXT, LOGO, SMALL_LOGO,
};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, warn};

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Where key presses are being routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Home { help_open: bool },
    Game { confirming: bool },
    Complete,
    Training,
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    SelectDifficulty(Difficulty),
    ToggleHelp,
    CloseHelp,
    OpenTraining,
    Quit,
    Act(Action),
    Redaction(RedactionChoice),
    DismissRedaction,
    Home,
    Replay,
    AiFeedback,
    Export,
    TrainingUp,
    TrainingDown,
    TrainingOpen,
}

/// Map a key to a command for the current screen.
pub fn key_command(context: KeyContext, key: KeyCode) -> Option<Command> {
    match context {
        KeyContext::Home { help_open } => match key {
            KeyCode::Esc if help_open => Some(Command::CloseHelp),
            KeyCode::Char('?') => Some(Command::ToggleHelp),
            KeyCode::Enter => Some(Command::Start),
            KeyCode::Char('1') => Some(Command::SelectDifficulty(Difficulty::Casual)),
            KeyCode::Char('2') => Some(Command::SelectDifficulty(Difficulty::Pro)),
            KeyCode::Char('t') => Some(Command::OpenTraining),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        },
        KeyContext::Game { confirming: true } => match key {
            KeyCode::Char('a') | KeyCode::Char('o') => {
                Some(Command::Redaction(RedactionChoice::AllowOriginal))
            }
            KeyCode::Enter | KeyCode::Char('c') => {
                Some(Command::Redaction(RedactionChoice::ConfirmRedaction))
            }
            KeyCode::Esc => Some(Command::DismissRedaction),
            _ => None,
        },
        KeyContext::Game { confirming: false } => match key {
            KeyCode::Char('a') => Some(Command::Act(Action::Allow)),
            KeyCode::Char('r') => Some(Command::Act(Action::Redact)),
            KeyCode::Char('b') => Some(Command::Act(Action::Block)),
            KeyCode::Esc => Some(Command::Home),
            _ => None,
        },
        KeyContext::Complete => match key {
            KeyCode::Enter => Some(Command::Replay),
            KeyCode::Char('f') => Some(Command::AiFeedback),
            KeyCode::Char('s') => Some(Command::Export),
            KeyCode::Esc => Some(Command::Home),
            _ => None,
        },
        KeyContext::Training => match key {
            KeyCode::Up => Some(Command::TrainingUp),
            KeyCode::Down => Some(Command::TrainingDown),
            KeyCode::Enter => Some(Command::TrainingOpen),
            KeyCode::Esc => Some(Command::Home),
            _ => None,
        },
    }
}

/// Application state
pub struct App {
    pub game: Game,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub training_state: ListState,
    pub status_line: Option<String>,
    export_dir: PathBuf,
    topics: Vec<TrainingTopic>,
    count_up: Option<CountUp>,
}

impl App {
    pub fn new(game: Game, export_dir: PathBuf) -> Self {
        let mut training_state = ListState::default();
        training_state.select(Some(0));

        Self {
            game,
            theme: Theme::default(),
            running: true,
            show_help: false,
            training_state,
            status_line: None,
            export_dir,
            topics: training_topics(),
            count_up: None,
        }
    }

    pub fn key_context(&self) -> KeyContext {
        match self.game.screen() {
            Screen::Home => KeyContext::Home {
                help_open: self.show_help,
            },
            Screen::Game => KeyContext::Game {
                confirming: self
                    .game
                    .session()
                    .is_some_and(|s| s.phase() == RoundPhase::ConfirmingRedaction),
            },
            Screen::Complete => KeyContext::Complete,
            Screen::Training => KeyContext::Training,
        }
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(true);
                }
                if let Some(command) = key_command(self.key_context(), key.code) {
                    self.dispatch(command, Instant::now());
                }
            }
        }
        Ok(self.running)
    }

    /// Run one command against the game.
    pub fn dispatch(&mut self, command: Command, now: Instant) {
        match command {
            Command::Start => {
                let difficulty = self.game.difficulty();
                self.go(Screen::Game, Some(difficulty), now);
            }
            Command::SelectDifficulty(difficulty) => self.game.select_difficulty(difficulty),
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::CloseHelp => self.show_help = false,
            Command::OpenTraining => self.go(Screen::Training, None, now),
            Command::Quit => self.running = false,
            Command::Act(action) => {
                self.game.submit(action, now);
            }
            Command::Redaction(choice) => {
                self.game.confirm_redaction(choice, now);
            }
            Command::DismissRedaction => {
                self.game.dismiss_redaction();
            }
            Command::Home => self.go(Screen::Home, None, now),
            Command::Replay => {
                if let Err(e) = self.game.replay(now) {
                    self.report_error("could not restart the mission", &e);
                }
                self.count_up = None;
                self.status_line = None;
            }
            Command::AiFeedback => {
                self.game.request_ai_feedback();
                self.status_line = self.game.last_message().map(|m| m.message.clone());
            }
            Command::Export => match self.game.export_results(&self.export_dir, Utc::now()) {
                Ok(Some(path)) => {
                    self.status_line = Some(format!("Snapshot saved to {}", path.display()));
                }
                Ok(None) => warn!("export requested with no results"),
                Err(e) => self.report_error("export failed", &e),
            },
            Command::TrainingUp => {
                let i = self.training_state.selected().unwrap_or(0);
                self.training_state.select(Some(i.saturating_sub(1)));
            }
            Command::TrainingDown => {
                let i = self.training_state.selected().unwrap_or(0);
                let last = self.topics.len().saturating_sub(1);
                self.training_state.select(Some((i + 1).min(last)));
            }
            Command::TrainingOpen => {
                if let Some(topic) = self.selected_topic() {
                    self.status_line = Some(topic.launch_message());
                }
            }
        }
    }

    fn go(&mut self, screen: Screen, difficulty: Option<Difficulty>, now: Instant) {
        if let Err(e) = self.game.navigate(screen, difficulty, now) {
            self.report_error("could not change screen", &e);
            return;
        }
        self.show_help = false;
        self.status_line = None;
        self.count_up = None;
    }

    fn report_error(&mut self, context: &str, e: &anyhow::Error) {
        error!(error = %e, "{}", context);
        self.status_line = Some(format!("{}: {}", context, e));
    }

    pub fn selected_topic(&self) -> Option<&TrainingTopic> {
        self.training_state.selected().and_then(|i| self.topics.get(i))
    }

    /// Advance timers and the results animation.
    pub fn on_tick(&mut self, now: Instant) {
        if let Err(e) = self.game.tick(now) {
            self.report_error("session error", &e);
        }

        if self.game.screen() == Screen::Complete {
            if self.count_up.is_none() {
                self.count_up = self
                    .game
                    .results()
                    .map(|state| CountUp::new(state.score, state.accuracy));
            }
            if let Some(count_up) = self.count_up.as_mut() {
                count_up.step();
            }
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&mut self, frame: &mut Frame) {
        match self.game.screen() {
            Screen::Home => self.render_home(frame),
            Screen::Game => self.render_game(frame),
            Screen::Complete => self.render_complete(frame),
            Screen::Training => self.render_training(frame),
        }

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_home(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.bg)),
            area,
        );

        let logo_height = LOGO.lines().count() as u16;
        let show_logo = area.height >= logo_height + 14;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(if show_logo { logo_height } else { 3 }),
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        if show_logo {
            let logo = Paragraph::new(LOGO)
                .style(Style::default().fg(self.theme.accent))
                .alignment(Alignment::Center);
            frame.render_widget(logo, chunks[0]);
        } else {
            let title = Paragraph::new(vec![
                Line::from(Span::styled(
                    "═══ GUARDRAIL OPS ═══",
                    Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Defend the model. Mind the data.",
                    Style::default().fg(self.theme.header),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(title, chunks[0]);
        }

        let difficulty = self.game.difficulty();
        let threat = Paragraph::new(Line::from(vec![
            Span::raw("THREAT LEVEL: "),
            Span::styled(
                difficulty.threat_level(),
                Style::default()
                    .fg(match difficulty {
                        Difficulty::Casual => self.theme.warning,
                        Difficulty::Pro => self.theme.alert,
                    })
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(threat, chunks[1]);

        let option = |key: &str, d: Difficulty| {
            let selected = d == difficulty;
            let style = if selected {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(self.theme.fg)
            };
            Line::from(vec![
                Span::styled(format!(" [{}] {:<7}", key, d.as_str().to_uppercase()), style),
                Span::styled(
                    format!("  {}s per request - {}", d.max_time(), d.description()),
                    Style::default().fg(self.theme.border),
                ),
            ])
        };
        let picker = Paragraph::new(vec![
            option("1", Difficulty::Casual),
            option("2", Difficulty::Pro),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} waves, 3 lives. Press Enter to deploy.", TOTAL_WAVES),
                Style::default().fg(self.theme.success),
            )),
        ])
        .block(styled_block("Difficulty", &self.theme));
        let picker_area = centered_rect(chunks[2], 64, chunks[2].height);
        frame.render_widget(picker, picker_area);

        let footer = Paragraph::new("Enter start | 1/2 difficulty | t training | ? help | q quit")
            .style(Style::default().fg(self.theme.border))
            .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[4]);
    }

    fn render_game(&self, frame: &mut Frame) {
        let Some(session) = self.game.session() else {
            return;
        };
        let area = frame.area();
        let layout = create_main_layout(area);

        self.render_hud(frame, layout[0], session);

        let content = create_content_layout(layout[1]);
        self.render_demon_panel(frame, content[0], session);

        let main = create_main_area_layout(content[1]);
        self.render_request(frame, main[0], session);
        self.render_detections(frame, main[1], session);

        let timer = TimerBar::new(session.time_remaining(), session.max_time());
        let timer_area = Rect::new(
            layout[2].x + 1,
            layout[2].y,
            layout[2].width.saturating_sub(2),
            layout[2].height.min(2),
        );
        frame.render_widget(timer, timer_area);

        if session.phase() == RoundPhase::ConfirmingRedaction {
            self.render_redaction_modal(frame, session);
        }
    }

    fn render_hud(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let state = session.state();
        let hud = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(17),
                Constraint::Min(20),
                Constraint::Length(34),
            ])
            .split(area);

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(logo, hud[0]);

        let mut score = vec![
            Span::raw("SCORE "),
            Span::styled(
                state.score.to_string(),
                Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(feedback) = session.feedback() {
            let color = if feedback.verdict.is_correct() {
                self.theme.success
            } else {
                self.theme.alert
            };
            score.push(Span::styled(
                format!("  {}", feedback.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        score.push(Span::raw(format!(
            "   WAVE {}/{}   COMBO x{}",
            state.wave, state.total_waves, state.current_combo
        )));
        let middle = Paragraph::new(Line::from(score))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(middle, hud[1]);

        let hearts: String = (0..crate::data::STARTING_LIVES)
            .map(|i| if i < state.lives { '♥' } else { '♡' })
            .collect();
        let right = Paragraph::new(Line::from(vec![
            Span::styled(hearts, Style::default().fg(self.theme.alert)),
            Span::raw(format!("  ACC {:.1}%  ", state.accuracy as f64)),
            Span::styled(
                session.difficulty().threat_level(),
                Style::default().fg(self.theme.warning),
            ),
        ]))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(right, hud[2]);
    }

    fn render_demon_panel(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let request = session.current_request();
        let block = styled_block("Guardrail", &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mood = DemonMood::for_request(request);
        let face_area = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(1), inner.height.min(4));
        frame.render_widget(mood, face_area);

        let risk = request.assessment.risk;
        let mut lines = vec![
            Line::from(vec![
                Span::raw("RISK "),
                Span::styled(
                    format!("{} {}", risk.symbol(), risk),
                    Style::default().fg(risk_color(risk)).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(format!("BEST COMBO {}", session.state().best_combo)),
        ];
        if let Some(reason) = session.last_verdict().and_then(|v| v.reason()) {
            if session.feedback().is_some() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    reason.message(),
                    Style::default().fg(self.theme.alert),
                )));
            }
        }
        let info_y = face_area.y + face_area.height + 1;
        if info_y < inner.y + inner.height {
            let info_area = Rect::new(inner.x, info_y, inner.width, inner.y + inner.height - info_y);
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), info_area);
        }
    }

    fn render_request(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let request = session.current_request();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("SOURCE ", Style::default().fg(self.theme.border)),
                Span::styled(request.source.clone(), Style::default().fg(self.theme.accent)),
                Span::styled("   USER ", Style::default().fg(self.theme.border)),
                Span::raw(request.user.clone().unwrap_or_else(|| "anonymous".to_string())),
            ]),
            Line::from(""),
        ];
        lines.extend(request.content.lines().map(|l| Line::from(l.to_string())));

        let title = format!("Incoming Request #{}", request.id);
        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(styled_block(&title, &self.theme));
        frame.render_widget(body, area);
    }

    fn render_detections(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let block = styled_block("Detections", &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let request = session.current_request();
        let mut x = inner.x;
        for detection in &request.detected {
            let chip = ThreatChip::new(detection);
            let width = chip.width();
            if x + width > inner.x + inner.width {
                break;
            }
            frame.render_widget(chip, Rect::new(x, inner.y, width, 1));
            x += width + 1;
        }
        if request.detected.is_empty() {
            frame.render_widget(
                Paragraph::new("No detections").style(Style::default().fg(self.theme.border)),
                Rect::new(inner.x, inner.y, inner.width, inner.height.min(1)),
            );
        }

        if inner.height >= 3 {
            let legend_style = if session.is_input_locked() {
                Style::default().fg(self.theme.border)
            } else {
                Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD)
            };
            let legend = Paragraph::new(Line::from(vec![
                Span::styled("[A] ", legend_style),
                Span::styled(Action::Allow.label(), Style::default().fg(self.theme.success)),
                Span::styled("   [R] ", legend_style),
                Span::styled(Action::Redact.label(), Style::default().fg(self.theme.warning)),
                Span::styled("   [B] ", legend_style),
                Span::styled(Action::Block.label(), Style::default().fg(self.theme.alert)),
                Span::styled("   [Esc] Home", Style::default().fg(self.theme.border)),
            ]));
            frame.render_widget(legend, Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1));
        }
    }

    fn render_redaction_modal(&self, frame: &mut Frame, session: &Session) {
        let Some(preview) = session.redaction_preview() else {
            return;
        };
        let area = centered_rect(frame.area(), 72, 18);
        frame.render_widget(Clear, area);

        let chips = if preview.chips.is_empty() {
            "none".to_string()
        } else {
            preview.chips.join("  ")
        };
        let text = vec![
            Line::from(Span::styled("ORIGINAL", Style::default().fg(self.theme.border))),
            Line::from(preview.original.clone()),
            Line::from(""),
            Line::from(Span::styled("REDACTED", Style::default().fg(self.theme.border))),
            Line::from(Span::styled(preview.redacted.clone(), Style::default().fg(self.theme.success))),
            Line::from(""),
            Line::from(vec![
                Span::raw("Confidence: "),
                Span::styled(preview.confidence.to_string(), Style::default().fg(self.theme.accent)),
                Span::raw(format!("   Detected: {}", chips)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter/C] Confirm redaction   [A/O] Allow original   [Esc] Back",
                Style::default().fg(self.theme.warning),
            )),
        ];
        let modal = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.warning))
                    .title(format!(" Redaction Preview - {}s left ", session.time_remaining())),
            );
        frame.render_widget(modal, area);
    }

    fn render_complete(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let Some(summary) = self.game.summary(Utc::now()) else {
            return;
        };
        let (score, accuracy) = self
            .count_up
            .map(|c| (c.score, c.accuracy))
            .unwrap_or((0, 0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(5), Constraint::Min(16), Constraint::Length(2)])
            .split(area);

        let mood = DemonMood::for_tier(summary.tier);
        frame.render_widget(mood, centered_rect(chunks[0], 8, 4));

        let mut lines = vec![
            format!("{}", summary.tier),
            String::new(),
            format!("Final Score: {}", score),
            format!("Accuracy: {}%", accuracy),
            format!("Waves: {}/{}", summary.waves_cleared, summary.total_waves),
            format!("Time: {}", summary.duration),
            String::new(),
        ];
        // The breakdown is the exported text minus its heading block.
        lines.extend(summary.lines().into_iter().skip(8));

        let results = DramaticBox::new("MISSION COMPLETE")
            .content(lines)
            .border_color(tier_color(summary.tier));
        frame.render_widget(results, centered_rect(chunks[1], 48, 20));

        let footer = match &self.status_line {
            Some(status) => status.clone(),
            None => "Enter replay | s save snapshot | f AI feedback | Esc home".to_string(),
        };
        frame.render_widget(
            Paragraph::new(footer)
                .style(Style::default().fg(self.theme.border))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_training(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(2)])
            .split(area);

        let title = Paragraph::new(Span::styled(
            "TRAINING ACADEMY",
            Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = self
            .topics
            .iter()
            .map(|topic| {
                let status_color = if topic.available {
                    self.theme.success
                } else {
                    self.theme.border
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("  {}", topic.title),
                            Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!("  [{}]", topic.status()), Style::default().fg(status_color)),
                        Span::styled(format!("  {}", topic.level), Style::default().fg(self.theme.header)),
                    ]),
                    Line::from(Span::styled(
                        format!("    {}", topic.description),
                        Style::default().fg(self.theme.border),
                    )),
                    Line::from(""),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(styled_block("Modules", &self.theme))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[1], &mut self.training_state);

        let footer = match &self.status_line {
            Some(status) => status.clone(),
            None => "↑/↓ select | Enter open | Esc home".to_string(),
        };
        frame.render_widget(
            Paragraph::new(footer)
                .style(Style::default().fg(self.theme.border))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(frame.area(), 70, 25);
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.accent)));
        frame.render_widget(help, popup_area);
    }
}

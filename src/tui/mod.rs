//! Terminal User Interface
//!
//! Arcade front end for GuardRail Ops using ratatui

pub mod app;
pub mod widgets;

pub use app::App;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use crate::data::{PerformanceTier, Risk};

/// Color scheme for the game
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
    pub border: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Cyan,
            alert: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            info: Color::Blue,
            border: Color::DarkGray,
            header: Color::Magenta,
        }
    }
}

/// Get color for a risk rating
pub fn risk_color(risk: Risk) -> Color {
    match risk {
        Risk::Low => Color::Green,
        Risk::Medium => Color::Yellow,
        Risk::High => Color::Red,
    }
}

pub fn tier_color(tier: PerformanceTier) -> Color {
    match tier {
        PerformanceTier::Excellent => Color::Green,
        PerformanceTier::Good => Color::Yellow,
        PerformanceTier::NeedImprovement => Color::Red,
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// ASCII art logo
pub const LOGO: &str = r#"
  ██████╗ ██╗   ██╗ █████╗ ██████╗ ██████╗ ██████╗  █████╗ ██╗██╗
 ██╔════╝ ██║   ██║██╔══██╗██╔══██╗██╔══██╗██╔══██╗██╔══██╗██║██║
 ██║  ███╗██║   ██║███████║██████╔╝██║  ██║██████╔╝███████║██║██║
 ██║   ██║██║   ██║██╔══██║██╔══██╗██║  ██║██╔══██╗██╔══██║██║██║
 ╚██████╔╝╚██████╔╝██║  ██║██║  ██║██████╔╝██║  ██║██║  ██║██║███████╗
  ╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝╚══════╝
                      ██████╗ ██████╗ ███████╗
                     ██╔═══██╗██╔══██╗██╔════╝
                     ██║   ██║██████╔╝███████╗
                     ██║   ██║██╔═══╝ ╚════██║
                     ╚██████╔╝██║     ███████║
                      ╚═════╝ ╚═╝     ╚══════╝
"#;

/// Smaller logo for header
pub const SMALL_LOGO: &str = " GUARDRAIL OPS ";

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════════════════════╗
║                        HOW TO PLAY                            ║
╠═══════════════════════════════════════════════════════════════╣
║  Each wave a request hits the guardrail. Decide before the    ║
║  timer runs out:                                              ║
║                                                               ║
║  a   ALLOW   safe content, nothing sensitive                  ║
║  r   REDACT  preview and mask emails, phones, keys, tokens    ║
║  b   BLOCK   malicious input (injection, XSS, toxicity)       ║
╠═══════════════════════════════════════════════════════════════╣
║                     REDACTION PREVIEW                         ║
╠═══════════════════════════════════════════════════════════════╣
║  Enter/c  Confirm redaction                                   ║
║  a/o      Allow original text                                 ║
║  Esc      Back to the request (the clock keeps running)       ║
╠═══════════════════════════════════════════════════════════════╣
║  1/2   Casual (8s) / Pro (6s)     Enter  Start mission        ║
║  t     Training                   q      Quit                 ║
║  ?     Toggle this help           Esc    Close / Home         ║
╚═══════════════════════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // HUD
            Constraint::Min(10),     // Main content
            Constraint::Length(3),   // Timer
        ])
        .split(area)
        .to_vec()
}

/// Create the game content layout (demon panel + request)
pub fn create_content_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),  // Demon / assessment
            Constraint::Percentage(75),  // Request
        ])
        .split(area)
        .to_vec()
}

/// Create the request area layout (content + chips/actions)
pub fn create_main_area_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(65),  // Request content
            Constraint::Percentage(35),  // Detections and actions
        ])
        .split(area)
        .to_vec()
}

/// A popup of at most `width` x `height` centered in `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_stays_inside_small_terminals() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect(area, 70, 25);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
        assert_eq!(popup.x, (area.width - popup.width) / 2);
    }

    #[test]
    fn high_risk_is_red() {
        assert_eq!(risk_color(Risk::High), Color::Red);
        assert_eq!(tier_color(PerformanceTier::Excellent), Color::Green);
    }
}

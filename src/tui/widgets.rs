//! Custom widgets for the game UI

use crate::data::{Detection, PerformanceTier, Request, Risk};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Countdown bar for the round timer
pub struct TimerBar {
    remaining: u32,
    max: u32,
    color: Color,
    warning_threshold: u32,
    danger_threshold: u32,
}

impl TimerBar {
    pub fn new(remaining: u32, max: u32) -> Self {
        Self {
            remaining,
            max: max.max(1),
            color: Color::Green,
            warning_threshold: 4,
            danger_threshold: 2,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn warning_threshold(mut self, seconds: u32) -> Self {
        self.warning_threshold = seconds;
        self
    }

    pub fn danger_threshold(mut self, seconds: u32) -> Self {
        self.danger_threshold = seconds;
        self
    }
}

impl Widget for TimerBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        // Color shifts as the clock runs down
        let color = if self.remaining <= self.danger_threshold {
            Color::Red
        } else if self.remaining <= self.warning_threshold {
            Color::Yellow
        } else {
            self.color
        };

        let label = format!("TIME {}s", self.remaining);
        buf.set_string(area.x, area.y, &label, Style::default().fg(color));

        if area.height > 1 {
            let inner = area.width - 2;
            let filled = (self.remaining.min(self.max) as u64 * inner as u64 / self.max as u64) as u16;
            let bar_y = area.y + 1;
            buf.set_string(area.x, bar_y, "[", Style::default());
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default());

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", Style::default().fg(color));
            }
            for x in filled..inner {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(Color::DarkGray));
            }
        }
    }
}

/// One detection chip, e.g. `[EMAIL ×2]`
pub struct ThreatChip {
    label: String,
    redactable: bool,
}

impl ThreatChip {
    pub fn new(detection: &Detection) -> Self {
        Self {
            label: detection.chip_label(),
            redactable: detection.tag.is_redactable(),
        }
    }

    /// Cells the chip takes up, brackets included.
    pub fn width(&self) -> u16 {
        self.label.chars().count() as u16 + 2
    }
}

impl Widget for ThreatChip {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = if self.redactable { Color::Yellow } else { Color::Red };
        let text = format!("[{}]", self.label);
        buf.set_stringn(
            area.x,
            area.y,
            &text,
            area.width as usize,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }
}

/// The guardrail demon's expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemonMood {
    Rage,
    Alert,
    Idle,
    Cheer,
    Glitch,
}

impl DemonMood {
    /// Mood while a request is on screen.
    pub fn for_request(request: &Request) -> Self {
        if request.assessment.malicious || request.assessment.risk == Risk::High {
            DemonMood::Rage
        } else if request.assessment.risk == Risk::Medium {
            DemonMood::Alert
        } else {
            DemonMood::Idle
        }
    }

    /// Mood on the results screen.
    pub fn for_tier(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::Excellent | PerformanceTier::Good => DemonMood::Cheer,
            PerformanceTier::NeedImprovement => DemonMood::Glitch,
        }
    }

    pub fn face(&self) -> [&'static str; 4] {
        match self {
            DemonMood::Rage => [r" /\_/\ ", r"( >_< )", r" \ ^ / ", "  RAGE "],
            DemonMood::Alert => [r" /\_/\ ", r"( O_O )", r" \ - / ", " ALERT "],
            DemonMood::Idle => [r" /\_/\ ", r"( -_- )", r" \ _ / ", "  idle "],
            DemonMood::Cheer => [r" /\_/\ ", r"( ^o^ )", r" \ v / ", " CHEER "],
            DemonMood::Glitch => [r" /\#/\ ", r"( x_# )", r" \ ~ / ", " GL!TCH"],
        }
    }

    pub fn color(&self) -> Color {
        match self {
            DemonMood::Rage => Color::Red,
            DemonMood::Alert => Color::Yellow,
            DemonMood::Idle => Color::DarkGray,
            DemonMood::Cheer => Color::Green,
            DemonMood::Glitch => Color::Magenta,
        }
    }
}

impl Widget for DemonMood {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.color()).add_modifier(Modifier::BOLD);
        for (i, line) in self.face().iter().enumerate() {
            if (i as u16) < area.height {
                buf.set_stringn(area.x, area.y + i as u16, line, area.width as usize, style);
            }
        }
    }
}

/// ASCII art box for the mission results
pub struct DramaticBox {
    title: String,
    content: Vec<String>,
    border_color: Color,
}

impl DramaticBox {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
            border_color: Color::Red,
        }
    }

    pub fn content(mut self, lines: Vec<String>) -> Self {
        self.content = lines;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }
}

impl Widget for DramaticBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 2 {
            return;
        }
        let style = Style::default().fg(self.border_color);
        let bottom = area.y + area.height - 1;
        let right = area.x + area.width - 1;

        buf.set_string(area.x, area.y, "╔", style);
        buf.set_string(area.x, bottom, "╚", style);
        for x in 1..area.width - 1 {
            buf.set_string(area.x + x, area.y, "═", style);
            buf.set_string(area.x + x, bottom, "═", style);
        }
        buf.set_string(right, area.y, "╗", style);
        buf.set_string(right, bottom, "╝", style);

        let title = format!(" {} ", self.title);
        let title_len = title.chars().count() as u16;
        if title_len < area.width {
            buf.set_string(area.x + (area.width - title_len) / 2, area.y, &title, style);
        }

        for y in 1..area.height - 1 {
            buf.set_string(area.x, area.y + y, "║", style);
            buf.set_string(right, area.y + y, "║", style);
        }

        let text_width = area.width.saturating_sub(4) as usize;
        for (i, line) in self.content.iter().enumerate() {
            if i as u16 + 1 < area.height - 1 {
                buf.set_stringn(
                    area.x + 2,
                    area.y + 1 + i as u16,
                    line,
                    text_width,
                    Style::default().fg(Color::White),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{default_fixtures, ThreatTag};

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn timer_bar_fills_in_proportion() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        TimerBar::new(4, 8).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("TIME 4s"));
        assert_eq!(row(&buf, 1), "[████░░░░]");
    }

    #[test]
    fn chip_shows_repeat_count() {
        let chip = ThreatChip::new(&Detection::with_count(ThreatTag::Email, 3));
        assert_eq!(chip.width(), "[EMAIL ×3]".chars().count() as u16);
    }

    #[test]
    fn demon_rages_at_malicious_requests() {
        let fixtures = default_fixtures();
        let sqli = fixtures.iter().find(|r| r.assessment.malicious).unwrap();
        assert_eq!(DemonMood::for_request(sqli), DemonMood::Rage);
        assert_eq!(DemonMood::for_tier(PerformanceTier::NeedImprovement), DemonMood::Glitch);
    }

    #[test]
    fn dramatic_box_tolerates_tiny_areas() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        DramaticBox::new("RESULTS").render(area, &mut buf);
    }
}

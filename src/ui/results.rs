use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

use crate::session::SessionSummary;

const POPUP_WIDTH: u16 = 44;
const POPUP_HEIGHT: u16 = 13;

/// Centered rectangle of at most `width` x `height` inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(vertical);
    rect
}

/// Modal summary shown when a session ends
pub struct ResultsPopup<'a> {
    summary: &'a SessionSummary,
}

impl<'a> ResultsPopup<'a> {
    pub fn new(summary: &'a SessionSummary) -> Self {
        Self { summary }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let s = self.summary;
        let label = Style::default().add_modifier(Modifier::DIM);
        let row = |name: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{name:<12}"), label),
                Span::raw(value),
            ])
        };

        vec![
            row("player", s.name.clone()),
            row("level", s.tier.clone()),
            row("duration", format!("{}s", s.duration_secs)),
            row("passages", s.words.to_string()),
            row("accuracy", format!("{}%", s.accuracy)),
            row("kpm", s.kpm.to_string()),
            row("cpm", s.cpm.to_string()),
            Line::from(Span::styled(
                format!("score {}", s.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            row("date", s.date()),
            Line::from(Span::styled(
                "rates use the full session length",
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            )),
        ]
    }
}

impl Widget for ResultsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
        Clear.render(popup, buf);

        Paragraph::new(self.lines())
            .block(
                Block::bordered()
                    .title(" Session results ")
                    .title_bottom(" (enter) close "),
            )
            .render(popup, buf);
    }
}

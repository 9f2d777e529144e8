use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Cell, Paragraph, Row, Table, Widget},
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::leaderboard::{Leaderboard, LeaderboardEntry};

/// "3 minutes ago" style age of an entry
pub fn relative_age(completed_at: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed = (now - completed_at).to_std().unwrap_or_default();
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}

pub fn entry_cells(rank: usize, entry: &LeaderboardEntry, now: DateTime<Local>) -> [String; 7] {
    [
        format!("{}", rank + 1),
        entry.name.clone(),
        entry.score.to_string(),
        entry.words.to_string(),
        format!("{}%", entry.accuracy),
        entry.cpm.to_string(),
        format!("{} · {}", entry.tier, relative_age(entry.completed_at, now)),
    ]
}

/// Ranked table of recorded sessions
pub struct LeaderboardView<'a> {
    board: &'a Leaderboard,
}

impl<'a> LeaderboardView<'a> {
    pub fn new(board: &'a Leaderboard) -> Self {
        Self { board }
    }
}

impl Widget for LeaderboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(" leaderboard ");

        if self.board.is_empty() {
            Paragraph::new("no sessions recorded yet")
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(block)
                .render(area, buf);
            return;
        }

        let now = Local::now();
        let header = Row::new(["#", "name", "score", "words", "acc", "cpm", "level"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self
            .board
            .entries()
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                let style = if rank == 0 {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Row::new(entry_cells(rank, entry, now).map(Cell::from)).style(style)
            });

        let widths = [
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(18),
        ];

        Table::new(rows, widths)
            .header(header)
            .block(block)
            .render(area, buf);
    }
}
